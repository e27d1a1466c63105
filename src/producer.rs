//! Producer lifecycle: connect on demand, send exactly once

use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{BrokerClient, ClientEvent, EventReceiver};
use crate::config::ProducerConfig;
use crate::error::SimplemqError;
use crate::metrics::ClientMetrics;
use crate::sink::{ErrorSink, TracingErrorSink};
use crate::state::{ConnectionState, StateCell};

/// Owns one producer connection and an optional default topic.
///
/// Unlike the consumer, `connect()` is idempotent on success: producers
/// tolerate redundant calls because [`send`](Producer::send) connects
/// implicitly when needed.
pub struct Producer<C> {
    client: C,
    config: ProducerConfig,
    topic: Option<String>,
    state: Arc<StateCell>,
    error_sink: Arc<dyn ErrorSink>,
    metrics: Arc<ClientMetrics>,
    _dispatch: Option<JoinHandle<()>>,
}

impl<C> std::fmt::Debug for Producer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("config", &self.config)
            .field("topic", &self.topic)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl<C: BrokerClient> Producer<C> {
    /// Build the underlying client handle from the config's native
    /// mapping. No network activity.
    pub fn create<F>(make_client: F, config: ProducerConfig) -> Self
    where
        F: FnOnce(std::collections::HashMap<String, String>) -> C,
    {
        let client = make_client(config.to_native());
        Self {
            client,
            config,
            topic: None,
            state: StateCell::new(),
            error_sink: Arc::new(TracingErrorSink),
            metrics: Arc::new(ClientMetrics::default()),
            _dispatch: None,
        }
    }

    /// Replace the default error sink. Takes effect for connections
    /// established after the call.
    pub fn set_error_sink(&mut self, sink: Arc<dyn ErrorSink>) -> &mut Self {
        self.error_sink = sink;
        self
    }

    /// Default topic for `send`; wins over the call-site argument
    pub fn set_topic<S: Into<String>>(&mut self, topic: S) -> &mut Self {
        self.topic = Some(topic.into());
        self
    }

    /// The default topic, if set
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Connect if not already connected.
    ///
    /// Resolves immediately while connected, without touching the
    /// client's connect path. Otherwise awaits readiness: an error before
    /// the first readiness event fails this call exactly once; errors
    /// after readiness are routed to the error sink out-of-band.
    pub async fn connect(&mut self) -> Result<&mut Self, SimplemqError> {
        match self.state.get() {
            ConnectionState::Connected => return Ok(self),
            ConnectionState::Connecting => return Err(SimplemqError::ConnectInFlight),
            ConnectionState::Idle => {}
        }

        self.state.set(ConnectionState::Connecting);
        let mut events = match self.client.connect() {
            Ok(events) => events,
            Err(err) => {
                self.state.set(ConnectionState::Idle);
                self.metrics.record_connect_failure();
                return Err(err);
            }
        };

        loop {
            match events.recv().await {
                Some(ClientEvent::Ready) => break,
                Some(ClientEvent::Error(err)) => {
                    self.state.set(ConnectionState::Idle);
                    self.metrics.record_connect_failure();
                    return Err(err);
                }
                Some(ClientEvent::Data(record)) => {
                    debug!(topic = %record.topic, "unexpected record on producer connection");
                }
                Some(ClientEvent::Disconnected) | None => {
                    self.state.set(ConnectionState::Idle);
                    self.metrics.record_connect_failure();
                    return Err(SimplemqError::ConnectionClosed);
                }
            }
        }

        self.state.set(ConnectionState::Connected);
        self.metrics.record_connection_established();
        self.spawn_dispatch(events);
        info!(servers = %self.config.bootstrap_servers(), "producer connected");
        Ok(self)
    }

    /// Send one record, connecting first when necessary.
    ///
    /// The effective topic is the instance default if set, else `topic`;
    /// neither present is [`SimplemqError::MissingTopic`]. When not yet
    /// connected the record is deferred behind the connect and forwarded
    /// to the client exactly once after readiness, never twice.
    pub async fn send<K, V>(
        &mut self,
        key: K,
        value: V,
        topic: Option<&str>,
    ) -> Result<&mut Self, SimplemqError>
    where
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        let topic = match self.topic.as_deref().or(topic) {
            Some(topic) => topic.to_string(),
            None => return Err(SimplemqError::MissingTopic),
        };

        if !self.state.is_connected() {
            self.connect().await?;
        }

        let payload = value.into();
        let size = payload.len() as u64;
        self.client
            .produce(&topic, None, payload, Some(key.into()))?;
        self.metrics.record_send(size);
        debug!(topic = %topic, bytes = size, "record forwarded");
        Ok(self)
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// The configuration this producer was created with
    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    /// Counters for this instance
    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Routes post-ready errors to the sink and resets state when the
    /// broker reports disconnection.
    fn spawn_dispatch(&mut self, mut events: EventReceiver) {
        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.error_sink);
        let metrics = Arc::clone(&self.metrics);

        self._dispatch = Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    ClientEvent::Error(err) => {
                        metrics.record_runtime_error();
                        sink.report(&err);
                    }
                    ClientEvent::Disconnected => {
                        warn!("producer connection lost");
                        state.set(ConnectionState::Idle);
                    }
                    ClientEvent::Ready | ClientEvent::Data(_) => {}
                }
            }
            debug!("producer event stream ended");
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{EventReceiver, EventSender};
    use tokio::sync::mpsc;

    struct NullClient;

    impl BrokerClient for NullClient {
        fn connect(&mut self) -> Result<EventReceiver, SimplemqError> {
            let (_tx, rx): (EventSender, EventReceiver) = mpsc::unbounded_channel();
            Ok(rx)
        }
        fn subscribe(&mut self, _topics: &[String]) -> Result<(), SimplemqError> {
            Ok(())
        }
        fn consume(&mut self) -> Result<(), SimplemqError> {
            Ok(())
        }
        fn produce(
            &mut self,
            _topic: &str,
            _partition: Option<u32>,
            _payload: Bytes,
            _key: Option<Bytes>,
        ) -> Result<(), SimplemqError> {
            Ok(())
        }
    }

    fn test_config() -> ProducerConfig {
        ProducerConfig::from_host_port("localhost", 9092).unwrap()
    }

    #[test]
    fn test_create_starts_idle_with_no_topic() {
        let producer = Producer::create(|_| NullClient, test_config());
        assert_eq!(producer.state(), ConnectionState::Idle);
        assert!(producer.topic().is_none());
    }

    #[test]
    fn test_set_topic() {
        let mut producer = Producer::create(|_| NullClient, test_config());
        producer.set_topic("events");
        assert_eq!(producer.topic(), Some("events"));
    }

    #[tokio::test]
    async fn test_send_without_any_topic_fails_before_connecting() {
        let mut producer = Producer::create(|_| NullClient, test_config());

        let err = producer.send("k", "v", None).await.unwrap_err();
        assert!(matches!(err, SimplemqError::MissingTopic));
        // No implicit connect was attempted for an unroutable record.
        assert_eq!(producer.state(), ConnectionState::Idle);
    }
}
