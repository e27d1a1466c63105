//! Consumer lifecycle: connect, subscribe, dispatch to handlers

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{BrokerClient, ClientEvent, EventReceiver};
use crate::config::ConsumerConfig;
use crate::envelope::MessageEnvelope;
use crate::error::SimplemqError;
use crate::metrics::ClientMetrics;
use crate::sink::{ErrorSink, TracingErrorSink};
use crate::state::{ConnectionState, StateCell};

/// Outcome of one handler invocation
pub type HandlerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Callback invoked for every message delivered on a consumer's
/// subscriptions. Closures of the matching shape implement it.
pub trait MessageHandler: Send + Sync {
    fn handle(&self, message: MessageEnvelope) -> HandlerResult;
}

impl<F> MessageHandler for F
where
    F: Fn(MessageEnvelope) -> HandlerResult + Send + Sync,
{
    fn handle(&self, message: MessageEnvelope) -> HandlerResult {
        self(message)
    }
}

type DisconnectHook = Arc<dyn Fn() + Send + Sync>;

/// Owns one consumer connection, its subscription set, and the
/// registered message handlers.
///
/// State machine: `Idle → Connecting → Connected`, back to `Idle` on
/// disconnect, with the error transition reachable from `Connecting` and
/// `Connected`. Calling [`connect`](Consumer::connect) while connected is
/// an error, not a no-op.
pub struct Consumer<C> {
    client: C,
    config: ConsumerConfig,
    topics: Vec<String>,
    handlers: Arc<RwLock<Vec<Arc<dyn MessageHandler>>>>,
    disconnect_hooks: Arc<RwLock<Vec<DisconnectHook>>>,
    state: Arc<StateCell>,
    error_sink: Arc<dyn ErrorSink>,
    metrics: Arc<ClientMetrics>,
    _dispatch: Option<JoinHandle<()>>,
}

impl<C> std::fmt::Debug for Consumer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("config", &self.config)
            .field("topics", &self.topics)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

impl<C: BrokerClient> Consumer<C> {
    /// Build the underlying client handle from the config's native
    /// mapping and record the topic list. No I/O happens here.
    pub fn create<F>(make_client: F, topics: Vec<String>, config: ConsumerConfig) -> Self
    where
        F: FnOnce(std::collections::HashMap<String, String>) -> C,
    {
        let client = make_client(config.to_native());
        Self {
            client,
            config,
            topics,
            handlers: Arc::new(RwLock::new(Vec::new())),
            disconnect_hooks: Arc::new(RwLock::new(Vec::new())),
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

    /// Register a handler in the ordered handler set; effective
    /// immediately, including on an already-established connection.
    pub fn on_message<H>(&mut self, handler: H) -> &mut Self
    where
        H: MessageHandler + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
        self
    }

    /// Register a callback invoked when the client reports
    /// disconnection. The lifecycle also resets to `Idle`, so a later
    /// `connect()` is legal.
    pub fn on_disconnect<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.disconnect_hooks.write().push(Arc::new(callback));
        self
    }

    /// Pull-based alternative to handler registration: a stream of every
    /// envelope delivered from this point on.
    pub fn stream(&mut self) -> MessageStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.on_message(move |message: MessageEnvelope| -> HandlerResult {
            // A dropped stream must not affect the other handlers.
            let _ = tx.send(message);
            Ok(())
        });
        MessageStream { receiver: rx }
    }

    /// Connect, then subscribe to all recorded topics and begin
    /// consuming.
    ///
    /// Single-shot: resolves with the lifecycle once the client signals
    /// readiness. Fails with [`SimplemqError::AlreadyConnected`] while
    /// connected and [`SimplemqError::ConnectInFlight`] while another
    /// attempt is pending. A broker error observed before readiness fails
    /// this call exactly once; errors after readiness go to the error
    /// sink instead.
    pub async fn connect(&mut self) -> Result<&mut Self, SimplemqError> {
        match self.state.get() {
            ConnectionState::Connected => return Err(SimplemqError::AlreadyConnected),
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
                    debug!(topic = %record.topic, "record before readiness dropped");
                }
                Some(ClientEvent::Disconnected) | None => {
                    self.state.set(ConnectionState::Idle);
                    self.metrics.record_connect_failure();
                    return Err(SimplemqError::ConnectionClosed);
                }
            }
        }

        self.state.set(ConnectionState::Connected);
        if let Err(err) = self
            .client
            .subscribe(&self.topics)
            .and_then(|_| self.client.consume())
        {
            self.state.set(ConnectionState::Idle);
            self.metrics.record_connect_failure();
            return Err(err);
        }

        self.metrics.record_connection_established();
        self.spawn_dispatch(events);
        info!(
            servers = %self.config.bootstrap_servers(),
            group = self.config.group_id(),
            topics = ?self.topics,
            "consumer connected"
        );
        Ok(self)
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Recorded subscription topics, in subscription order
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// The configuration this consumer was created with
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Counters for this instance
    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Owns the event receiver for the lifetime of one connection:
    /// wraps records into envelopes and fans them out to the handlers,
    /// routes errors to the sink, resets state on disconnect.
    fn spawn_dispatch(&mut self, mut events: EventReceiver) {
        let handlers = Arc::clone(&self.handlers);
        let hooks = Arc::clone(&self.disconnect_hooks);
        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.error_sink);
        let metrics = Arc::clone(&self.metrics);

        self._dispatch = Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    ClientEvent::Data(record) => {
                        let size = record.size;
                        let envelope = MessageEnvelope::from(record);
                        debug!(
                            topic = envelope.topic(),
                            offset = envelope.offset(),
                            "dispatching record"
                        );
                        // Snapshot so a handler registering another
                        // handler cannot deadlock the list.
                        let current: Vec<_> = handlers.read().clone();
                        for handler in &current {
                            if let Err(err) = handler.handle(envelope.clone()) {
                                metrics.record_handler_error();
                                sink.report(&SimplemqError::handler(err.to_string()));
                            }
                        }
                        metrics.record_dispatched(size as u64);
                    }
                    ClientEvent::Error(err) => {
                        metrics.record_runtime_error();
                        sink.report(&err);
                    }
                    ClientEvent::Disconnected => {
                        warn!("consumer connection lost");
                        state.set(ConnectionState::Idle);
                        let current: Vec<_> = hooks.read().clone();
                        for hook in &current {
                            hook();
                        }
                    }
                    ClientEvent::Ready => {}
                }
            }
            debug!("consumer event stream ended");
        }));
    }
}

/// Stream of delivered envelopes, produced by [`Consumer::stream`]
pub struct MessageStream {
    receiver: mpsc::UnboundedReceiver<MessageEnvelope>,
}

impl Stream for MessageStream {
    type Item = MessageEnvelope;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
