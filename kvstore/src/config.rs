// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 6379;

/// Where and how to connect a store client.
///
/// Every field besides the endpoint is library specific; the defaults are
/// the values that leave the corresponding behavior switched off, so a
/// client that does not understand a field can ignore it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    /// connect timeout, 0 means wait forever.
    pub timeout_ms: u64,
    /// reuse a named persistent connection.
    pub persistent_id: Option<String>,
    /// delay between reconnect attempts, 0 disables them.
    pub retry_interval_ms: u64,
    /// per-command read timeout, 0 means wait forever.
    pub read_timeout_ms: u64,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        ConnectOptions {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_ms: 0,
            persistent_id: None,
            retry_interval_ms: 0,
            read_timeout_ms: 0,
        }
    }
}

impl ConnectOptions {
    pub fn new<S: Into<String>>(host: S) -> Self {
        ConnectOptions {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Construction parameters of a prefixed client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    pub prefix: String,
    pub prefer_unlink: bool,
}

impl PrefixConfig {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        PrefixConfig {
            prefix: prefix.into(),
            prefer_unlink: false,
        }
    }
}
