//! Capability boundary for the underlying broker client
//!
//! Everything below this trait (wire protocol, partition assignment,
//! batching, transport retries) belongs to the concrete client. The
//! lifecycles only ever see typed [`ClientEvent`]s on the receiver a
//! [`connect`](BrokerClient::connect) call hands back.

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::SimplemqError;

/// Receiving half of a connection's event stream
pub type EventReceiver = mpsc::UnboundedReceiver<ClientEvent>;
/// Sending half, held by the concrete client
pub type EventSender = mpsc::UnboundedSender<ClientEvent>;

/// Raw broker-delivered record, before envelope wrapping
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Topic the record comes from
    pub topic: String,
    /// Partition the record was on
    pub partition: u32,
    /// Offset the record was read from
    pub offset: u64,
    /// Client-supplied key, if any
    pub key: Option<Bytes>,
    /// Record payload
    pub payload: Bytes,
    /// Size of the payload, in bytes
    pub size: usize,
}

/// Events a connected client delivers asynchronously.
///
/// `Ready` fires once per successful connection attempt; `Error` before
/// readiness fails the pending connect, after readiness it is routed to
/// the error sink. `Data` only flows on consumer connections after
/// subscribe/consume.
#[derive(Debug)]
pub enum ClientEvent {
    /// Connection established and usable
    Ready,
    /// Broker-level error
    Error(SimplemqError),
    /// A delivered record
    Data(RawRecord),
    /// The broker reported disconnection
    Disconnected,
}

/// Narrow structural interface any concrete broker client satisfies.
///
/// `connect` begins a connection attempt: immediate failures return
/// `Err`, everything asynchronous (readiness, errors, data,
/// disconnection) arrives as events on the returned receiver. A client
/// may be connected again after a disconnect; each attempt yields a
/// fresh receiver.
pub trait BrokerClient: Send + 'static {
    /// Begin a connection attempt
    fn connect(&mut self) -> Result<EventReceiver, SimplemqError>;

    /// Register interest in the given topics
    fn subscribe(&mut self, topics: &[String]) -> Result<(), SimplemqError>;

    /// Start the flow of `Data` events for subscribed topics
    fn consume(&mut self) -> Result<(), SimplemqError>;

    /// Forward an outbound record; `partition` of `None` delegates
    /// assignment to the client
    fn produce(
        &mut self,
        topic: &str,
        partition: Option<u32>,
        payload: Bytes,
        key: Option<Bytes>,
    ) -> Result<(), SimplemqError>;
}
