//! In-process broker client for tests, demos, and doc examples
//!
//! A [`LoopbackBroker`] routes every produced record to every connected,
//! subscribed, consuming client, assigning offsets per topic-partition.
//! No network, no external broker.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::{BrokerClient, ClientEvent, EventReceiver, EventSender, RawRecord};
use crate::error::SimplemqError;

#[derive(Default)]
struct BrokerInner {
    next_client_id: usize,
    // Next offset per (topic, partition)
    offsets: HashMap<(String, u32), u64>,
    subscribers: HashMap<usize, Subscriber>,
}

struct Subscriber {
    events: EventSender,
    topics: Vec<String>,
    consuming: bool,
}

/// Shared in-process message bus; cheap to clone
#[derive(Clone, Default)]
pub struct LoopbackBroker {
    inner: Arc<Mutex<BrokerInner>>,
}

impl LoopbackBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a client handle attached to this broker
    pub fn client(&self) -> LoopbackClient {
        let mut inner = self.inner.lock();
        let id = inner.next_client_id;
        inner.next_client_id += 1;
        LoopbackClient {
            inner: Arc::clone(&self.inner),
            id,
        }
    }

    /// Drop every connection, delivering a `Disconnected` event first.
    /// Offsets survive, so reconnecting clients continue where the topic
    /// left off.
    pub fn disconnect_all(&self) {
        let mut inner = self.inner.lock();
        for subscriber in inner.subscribers.values() {
            let _ = subscriber.events.send(ClientEvent::Disconnected);
        }
        inner.subscribers.clear();
    }
}

/// One client handle on a [`LoopbackBroker`]
pub struct LoopbackClient {
    inner: Arc<Mutex<BrokerInner>>,
    id: usize,
}

impl BrokerClient for LoopbackClient {
    fn connect(&mut self) -> Result<EventReceiver, SimplemqError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        inner.subscribers.insert(
            self.id,
            Subscriber {
                events: tx.clone(),
                topics: Vec::new(),
                consuming: false,
            },
        );
        // In-process connections are ready as soon as they exist.
        let _ = tx.send(ClientEvent::Ready);
        Ok(rx)
    }

    fn subscribe(&mut self, topics: &[String]) -> Result<(), SimplemqError> {
        let mut inner = self.inner.lock();
        let subscriber = inner
            .subscribers
            .get_mut(&self.id)
            .ok_or_else(|| SimplemqError::connection("subscribe before connect"))?;
        subscriber.topics = topics.to_vec();
        Ok(())
    }

    fn consume(&mut self) -> Result<(), SimplemqError> {
        let mut inner = self.inner.lock();
        let subscriber = inner
            .subscribers
            .get_mut(&self.id)
            .ok_or_else(|| SimplemqError::connection("consume before connect"))?;
        subscriber.consuming = true;
        Ok(())
    }

    fn produce(
        &mut self,
        topic: &str,
        partition: Option<u32>,
        payload: Bytes,
        key: Option<Bytes>,
    ) -> Result<(), SimplemqError> {
        let mut inner = self.inner.lock();
        if !inner.subscribers.contains_key(&self.id) {
            return Err(SimplemqError::connection("produce before connect"));
        }

        let partition = partition.unwrap_or(0);
        let offset = inner
            .offsets
            .entry((topic.to_string(), partition))
            .or_insert(0);
        let record = RawRecord {
            topic: topic.to_string(),
            partition,
            offset: *offset,
            key,
            size: payload.len(),
            payload,
        };
        *offset += 1;

        let mut delivered = 0usize;
        for subscriber in inner.subscribers.values() {
            if subscriber.consuming
                && subscriber.topics.iter().any(|t| t == topic)
                && subscriber.events.send(ClientEvent::Data(record.clone())).is_ok()
            {
                delivered += 1;
            }
        }
        debug!(topic, offset = record.offset, delivered, "loopback record routed");
        Ok(())
    }
}
