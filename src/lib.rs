//! # simplemq
//!
//! A thin lifecycle and typing facade over pluggable message-broker
//! clients.
//!
//! ## Features
//!
//! - **Uniform lifecycle**: one `idle → connecting → connected` state
//!   machine shared by producers and consumers, with explicit error and
//!   disconnect transitions
//! - **Config Normalization**: host+port, address lists, and pre-joined
//!   strings all become one canonical `bootstrap.servers` mapping
//! - **Typed Envelopes**: every delivered record is wrapped in a
//!   [`MessageEnvelope`] regardless of which client produced it
//! - **Pluggable Clients**: anything implementing [`BrokerClient`] plugs
//!   in; wire protocol, batching, and partition assignment stay the
//!   client's concern
//! - **Injected Observability**: out-of-band errors go to an
//!   [`ErrorSink`] capability, `tracing` by default
//!
//! ## Quick Start
//!
//! ### Producer Example
//!
//! ```rust,no_run
//! use simplemq::{LoopbackBroker, Producer, ProducerConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let broker = LoopbackBroker::new();
//!
//!     let config = ProducerConfig::from_host_port("localhost", 9092)?;
//!     let mut producer = Producer::create(|_native| broker.client(), config);
//!     producer.set_topic("events");
//!
//!     // Connects implicitly on first send, then delivers exactly once.
//!     producer.send("user-123", "Hello simplemq!", None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Consumer Example
//!
//! ```rust,no_run
//! use simplemq::{Consumer, ConsumerConfig, HandlerResult, LoopbackBroker, MessageEnvelope, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let broker = LoopbackBroker::new();
//!
//!     let config = ConsumerConfig::from_host_port("localhost", 9092, "my-group")?;
//!     let mut consumer = Consumer::create(
//!         |_native| broker.client(),
//!         vec!["events".to_string()],
//!         config,
//!     );
//!
//!     consumer.on_message(|message: MessageEnvelope| -> HandlerResult {
//!         println!("{}: {:?}", message.topic(), message.payload());
//!         Ok(())
//!     });
//!
//!     // Resolves once the client signals readiness; subscription and
//!     // consumption start before this returns.
//!     consumer.connect().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod consumer;
pub mod envelope;
pub mod error;
pub mod loopback;
pub mod metrics;
pub mod producer;
pub mod sink;
pub mod state;

pub use client::*;
pub use config::*;
pub use consumer::*;
pub use envelope::*;
pub use error::*;
pub use loopback::*;
pub use metrics::*;
pub use producer::*;
pub use sink::*;
pub use state::*;

/// Crate result type
pub type Result<T> = std::result::Result<T, SimplemqError>;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
