//! Connection lifecycle state shared with the dispatch task

use std::sync::Arc;

use parking_lot::RwLock;

/// Lifecycle state of a producer or consumer connection.
///
/// A single enum rather than separate `connecting`/`connected` flags, so
/// the two can never both be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection and no attempt in flight
    #[default]
    Idle,
    /// A connect attempt is in flight
    Connecting,
    /// Connection established
    Connected,
}

/// Shared cell holding the current state.
///
/// The owning lifecycle and its dispatch task both hold an `Arc` to the
/// cell; the dispatch task resets it to `Idle` on disconnection.
#[derive(Debug, Default)]
pub(crate) struct StateCell(RwLock<ConnectionState>);

impl StateCell {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn get(&self) -> ConnectionState {
        *self.0.read()
    }

    pub(crate) fn set(&self, state: ConnectionState) {
        *self.0.write() = state;
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), ConnectionState::Idle);
        assert!(!cell.is_connected());

        cell.set(ConnectionState::Connecting);
        assert_eq!(cell.get(), ConnectionState::Connecting);

        cell.set(ConnectionState::Connected);
        assert!(cell.is_connected());

        cell.set(ConnectionState::Idle);
        assert!(!cell.is_connected());
    }
}
