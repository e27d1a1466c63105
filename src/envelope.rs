//! Typed message envelope handed to consumer handlers

use bytes::Bytes;

use crate::client::RawRecord;

/// Broker-assigned metadata attached to an envelope once delivery
/// details are known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryMetadata {
    /// Size of the payload, in bytes
    pub size: usize,
    /// Partition the message was on
    pub partition: u32,
    /// Offset the message was read from
    pub offset: u64,
}

/// Normalized in-process representation of a broker-delivered message.
///
/// The core fields (`topic`, `key`, `payload`) are fixed at construction;
/// delivery metadata is attached by the delivering lifecycle once the
/// underlying client reports it. An envelope is created per raw message
/// and each handler invocation receives its own clone; `Bytes` keeps the
/// clone cheap.
#[derive(Debug, Clone)]
pub struct MessageEnvelope {
    topic: String,
    key: Option<Bytes>,
    payload: Bytes,
    delivery: Option<DeliveryMetadata>,
}

impl MessageEnvelope {
    /// Create an envelope from the core fields; no validation beyond shape
    pub fn new<T, P>(topic: T, key: Option<Bytes>, payload: P) -> Self
    where
        T: Into<String>,
        P: Into<Bytes>,
    {
        Self {
            topic: topic.into(),
            key,
            payload: payload.into(),
            delivery: None,
        }
    }

    /// Attach broker-assigned delivery metadata, chainable
    pub fn with_delivery(mut self, delivery: DeliveryMetadata) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Attach broker-assigned delivery metadata in place
    pub fn set_delivery(&mut self, delivery: DeliveryMetadata) {
        self.delivery = Some(delivery);
    }

    /// Topic the message comes from
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Client-supplied key, if any
    pub fn key(&self) -> Option<&Bytes> {
        self.key.as_ref()
    }

    /// Message payload
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Full delivery metadata, if attached
    pub fn delivery(&self) -> Option<&DeliveryMetadata> {
        self.delivery.as_ref()
    }

    /// Payload size in bytes, once known
    pub fn size(&self) -> Option<usize> {
        self.delivery.map(|d| d.size)
    }

    /// Partition the message was on, once known
    pub fn partition(&self) -> Option<u32> {
        self.delivery.map(|d| d.partition)
    }

    /// Offset the message was read from, once known
    pub fn offset(&self) -> Option<u64> {
        self.delivery.map(|d| d.offset)
    }
}

impl From<RawRecord> for MessageEnvelope {
    fn from(record: RawRecord) -> Self {
        let delivery = DeliveryMetadata {
            size: record.size,
            partition: record.partition,
            offset: record.offset,
        };
        MessageEnvelope::new(record.topic, record.key, record.payload).with_delivery(delivery)
    }
}
