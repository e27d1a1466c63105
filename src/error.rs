//! Error types for the simplemq facade

/// Main error type for lifecycle and configuration operations
#[derive(Debug, thiserror::Error)]
pub enum SimplemqError {
    /// Invalid or incomplete configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Connection-level failure before readiness
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// `connect()` called on an already-connected consumer
    #[error("Already connected")]
    AlreadyConnected,

    /// A connect attempt is already in flight on this instance
    #[error("Connect attempt already in flight")]
    ConnectInFlight,

    /// The client's event stream ended before readiness was signaled
    #[error("Connection closed before readiness")]
    ConnectionClosed,

    /// Error surfaced by the underlying broker client
    #[error("Client error: {message}")]
    Client { message: String },

    /// `send()` with no instance topic and no call-site topic
    #[error("No topic configured and none supplied to send")]
    MissingTopic,

    /// Failure while forwarding a record to the underlying client
    #[error("Produce error: {message}")]
    Produce { message: String },

    /// A registered message handler returned an error
    #[error("Handler error: {message}")]
    Handler { message: String },
}

impl SimplemqError {
    /// Create a new invalid config error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a new client error
    pub fn client<S: Into<String>>(message: S) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Create a new produce error
    pub fn produce<S: Into<String>>(message: S) -> Self {
        Self::Produce {
            message: message.into(),
        }
    }

    /// Create a new handler error
    pub fn handler<S: Into<String>>(message: S) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }

    /// Check if this error was raised at configuration time
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Check if this error relates to the connection lifecycle
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::AlreadyConnected
                | Self::ConnectInFlight
                | Self::ConnectionClosed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimplemqError::invalid_config("group id must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: group id must not be empty"
        );
        assert_eq!(
            SimplemqError::AlreadyConnected.to_string(),
            "Already connected"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(SimplemqError::invalid_config("x").is_config_error());
        assert!(!SimplemqError::invalid_config("x").is_connection_error());
        assert!(SimplemqError::AlreadyConnected.is_connection_error());
        assert!(SimplemqError::connection("refused").is_connection_error());
        assert!(!SimplemqError::client("broker said no").is_connection_error());
    }
}
