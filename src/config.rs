//! Connection configuration for producers and consumers
//!
//! Heterogeneous constructor inputs (host+port, a pre-joined address
//! string, an explicit address list) all normalize into one canonical
//! [`BootstrapServers`] value, which the configs convert on demand into
//! the key/value mapping the underlying client expects.

use std::collections::HashMap;
use std::fmt;

use crate::error::SimplemqError;

/// Native config key for the broker address list
pub const BOOTSTRAP_SERVERS_KEY: &str = "bootstrap.servers";
/// Native config key for the consumer group
pub const GROUP_ID_KEY: &str = "group.id";

/// Canonical, never-empty broker address list as a comma-joined string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapServers(String);

impl BootstrapServers {
    /// Normalize a pre-joined `"host1:port1,host2:port2"` string
    pub fn new<S: Into<String>>(joined: S) -> Result<Self, SimplemqError> {
        let joined = joined.into();
        if joined.trim().is_empty() {
            return Err(SimplemqError::invalid_config(
                "bootstrap servers must not be empty",
            ));
        }
        Ok(Self(joined))
    }

    /// Normalize a single `host` + `port` pair into `"host:port"`
    pub fn from_host_port<S: Into<String>>(host: S, port: u16) -> Result<Self, SimplemqError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(SimplemqError::invalid_config("host must not be empty"));
        }
        Ok(Self(format!("{}:{}", host, port)))
    }

    /// Normalize an explicit address list, order preserved
    pub fn from_servers<I, S>(servers: I) -> Result<Self, SimplemqError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let servers: Vec<String> = servers.into_iter().map(|s| s.into()).collect();
        if servers.is_empty() {
            return Err(SimplemqError::invalid_config(
                "bootstrap server list must not be empty",
            ));
        }
        if servers.iter().any(|s| s.trim().is_empty()) {
            return Err(SimplemqError::invalid_config(
                "bootstrap server entries must not be empty",
            ));
        }
        Ok(Self(servers.join(",")))
    }

    /// The canonical comma-joined form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BootstrapServers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Producer-side connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    bootstrap_servers: BootstrapServers,
}

impl ProducerConfig {
    /// Create a config from an already-normalized address list
    pub fn new(bootstrap_servers: BootstrapServers) -> Self {
        Self { bootstrap_servers }
    }

    /// Create a config from a single `host` + `port` pair
    pub fn from_host_port<S: Into<String>>(host: S, port: u16) -> Result<Self, SimplemqError> {
        Ok(Self::new(BootstrapServers::from_host_port(host, port)?))
    }

    /// Create a config from an explicit address list
    pub fn from_servers<I, S>(servers: I) -> Result<Self, SimplemqError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(BootstrapServers::from_servers(servers)?))
    }

    /// The normalized broker addresses
    pub fn bootstrap_servers(&self) -> &BootstrapServers {
        &self.bootstrap_servers
    }

    /// Convert into the underlying client's native key/value mapping
    pub fn to_native(&self) -> HashMap<String, String> {
        HashMap::from([(
            BOOTSTRAP_SERVERS_KEY.to_string(),
            self.bootstrap_servers.as_str().to_string(),
        )])
    }
}

/// Consumer-side connection configuration; requires a non-empty group id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    bootstrap_servers: BootstrapServers,
    group_id: String,
}

impl ConsumerConfig {
    /// Create a config from an already-normalized address list and group id
    pub fn new<S: Into<String>>(
        bootstrap_servers: BootstrapServers,
        group_id: S,
    ) -> Result<Self, SimplemqError> {
        let group_id = group_id.into();
        if group_id.trim().is_empty() {
            return Err(SimplemqError::invalid_config(
                "consumer group id must not be empty",
            ));
        }
        Ok(Self {
            bootstrap_servers,
            group_id,
        })
    }

    /// Create a config from a single `host` + `port` pair
    pub fn from_host_port<S, G>(host: S, port: u16, group_id: G) -> Result<Self, SimplemqError>
    where
        S: Into<String>,
        G: Into<String>,
    {
        Self::new(BootstrapServers::from_host_port(host, port)?, group_id)
    }

    /// Create a config from an explicit address list
    pub fn from_servers<I, S, G>(servers: I, group_id: G) -> Result<Self, SimplemqError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        G: Into<String>,
    {
        Self::new(BootstrapServers::from_servers(servers)?, group_id)
    }

    /// The normalized broker addresses
    pub fn bootstrap_servers(&self) -> &BootstrapServers {
        &self.bootstrap_servers
    }

    /// The consumer group id
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Convert into the underlying client's native key/value mapping
    pub fn to_native(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                BOOTSTRAP_SERVERS_KEY.to_string(),
                self.bootstrap_servers.as_str().to_string(),
            ),
            (GROUP_ID_KEY.to_string(), self.group_id.clone()),
        ])
    }
}

/// Builder for ProducerConfig
#[derive(Debug, Default)]
pub struct ProducerConfigBuilder {
    brokers: Vec<String>,
}

impl ProducerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brokers<I, S>(mut self, brokers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brokers = brokers.into_iter().map(|s| s.into()).collect();
        self
    }

    pub fn broker<S: Into<String>>(mut self, host: S, port: u16) -> Self {
        self.brokers.push(format!("{}:{}", host.into(), port));
        self
    }

    pub fn build(self) -> Result<ProducerConfig, SimplemqError> {
        ProducerConfig::from_servers(self.brokers)
    }
}

/// Builder for ConsumerConfig
#[derive(Debug, Default)]
pub struct ConsumerConfigBuilder {
    brokers: Vec<String>,
    group_id: Option<String>,
}

impl ConsumerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brokers<I, S>(mut self, brokers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brokers = brokers.into_iter().map(|s| s.into()).collect();
        self
    }

    pub fn broker<S: Into<String>>(mut self, host: S, port: u16) -> Self {
        self.brokers.push(format!("{}:{}", host.into(), port));
        self
    }

    pub fn group_id<S: Into<String>>(mut self, group_id: S) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn build(self) -> Result<ConsumerConfig, SimplemqError> {
        let group_id = self.group_id.ok_or_else(|| {
            SimplemqError::invalid_config("consumer group id is required")
        })?;
        ConsumerConfig::from_servers(self.brokers, group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_port_normalization() {
        let config = ConsumerConfig::from_host_port("localhost", 9092, "workers").unwrap();
        let native = config.to_native();

        assert_eq!(
            native.get(BOOTSTRAP_SERVERS_KEY),
            Some(&"localhost:9092".to_string())
        );
        assert_eq!(native.get(GROUP_ID_KEY), Some(&"workers".to_string()));
    }

    #[test]
    fn test_server_list_order_preserved() {
        let config =
            ProducerConfig::from_servers(vec!["b2:9092", "a1:9092", "c3:9092"]).unwrap();

        assert_eq!(config.bootstrap_servers().as_str(), "b2:9092,a1:9092,c3:9092");
        assert_eq!(
            config.to_native().get(BOOTSTRAP_SERVERS_KEY),
            Some(&"b2:9092,a1:9092,c3:9092".to_string())
        );
    }

    #[test]
    fn test_prejoined_string_kept_verbatim() {
        let servers = BootstrapServers::new("a:1,b:2").unwrap();
        assert_eq!(servers.as_str(), "a:1,b:2");
    }

    #[test]
    fn test_producer_native_has_no_group_id() {
        let config = ProducerConfig::from_host_port("localhost", 9092).unwrap();
        let native = config.to_native();

        assert_eq!(native.len(), 1);
        assert!(!native.contains_key(GROUP_ID_KEY));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(BootstrapServers::new("").is_err());
        assert!(BootstrapServers::from_host_port("", 9092).is_err());
        assert!(BootstrapServers::from_servers(Vec::<String>::new()).is_err());
        assert!(BootstrapServers::from_servers(vec!["a:1", ""]).is_err());
    }

    #[test]
    fn test_empty_group_id_rejected_at_construction() {
        let err = ConsumerConfig::from_host_port("localhost", 9092, "").unwrap_err();
        assert!(err.is_config_error());

        let err = ConsumerConfigBuilder::new()
            .broker("localhost", 9092)
            .build()
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_builders() {
        let config = ConsumerConfigBuilder::new()
            .brokers(vec!["broker1:9092", "broker2:9092"])
            .group_id("test-group")
            .build()
            .unwrap();

        assert_eq!(config.bootstrap_servers().as_str(), "broker1:9092,broker2:9092");
        assert_eq!(config.group_id(), "test-group");

        let config = ProducerConfigBuilder::new()
            .broker("localhost", 9092)
            .build()
            .unwrap();
        assert_eq!(config.bootstrap_servers().as_str(), "localhost:9092");
    }
}
