// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

//! prefixed introduces a client shim which confines a connection to the keys
//! starting with a fixed prefix, so several tenants can share one store.
//!
//! The prefix is handed to the wrapped client's native prefix option right
//! after connecting and can not be changed afterwards. The destructive
//! flushes are redirected to delete only the keys owned by the prefix.
//! # For example:
//!
//! ```
//! use kvstore::{ConnectOptions, MemoryClient, MemoryServer, PrefixedClient, StoreClient};
//!
//! let server = MemoryServer::default();
//! let mut other = PrefixedClient::new(MemoryClient::new(server.clone()), "other.", false);
//! other.connect(&ConnectOptions::default()).unwrap();
//! other.set("x", "z").unwrap();
//!
//! let mut client = PrefixedClient::new(MemoryClient::new(server.clone()), "test.", false);
//! client.connect(&ConnectOptions::default()).unwrap();
//! client.set("a1", "c").unwrap(); // stored as "test.a1"
//! assert_eq!(client.list_owned_keys().unwrap(), vec!["a1".to_string()]);
//!
//! assert!(client.flush_db().unwrap());
//! assert_eq!(client.get("a1").unwrap(), None);
//! assert_eq!(other.get("x").unwrap(), Some("z".to_string()));
//! ```

use log::{debug, info, warn};

use crate::client::{OptionKind, ServerInfo, StoreClient, StoreOption, VERSION_FIELD};
use crate::config::{ConnectOptions, PrefixConfig};
use crate::error::*;
use crate::version::{ServerVersion, UNLINK_MIN_VERSION};

pub const LOG_TARGET: &str = "prefixed";

/// Matches every key below the native prefix.
const ALL_KEYS: &str = "*";

/// A [`StoreClient`] whose keys all live under one prefix.
///
/// `flush_db` and `flush_all` never flush: they delete the keys owned by
/// the prefix and report success even when there was nothing to delete.
///
/// Not synchronized, one owner drives one connection.
pub struct PrefixedClient<C: StoreClient> {
    client: C,
    prefix: String,
    /// requested by the caller and offered by the client.
    prefer_unlink: bool,
    /// `prefer_unlink` checked against the server at the last connect.
    use_unlink: bool,
}

impl<C: StoreClient> PrefixedClient<C> {
    pub fn new<S: Into<String>>(client: C, prefix: S, prefer_unlink: bool) -> Self {
        let prefer_unlink = prefer_unlink && client.supports_unlink();
        PrefixedClient {
            client,
            prefix: prefix.into(),
            prefer_unlink,
            use_unlink: prefer_unlink,
        }
    }

    pub fn from_config(client: C, config: &PrefixConfig) -> Self {
        Self::new(client, config.prefix.clone(), config.prefer_unlink)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether bulk deletes go through `unlink`.
    pub fn is_unlink_enabled(&self) -> bool {
        self.use_unlink
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// Deletes every key owned by the prefix in one bulk command.
    ///
    /// Enumerating and deleting are two round trips, a key written by
    /// someone else in between is not deleted.
    pub fn delete_all_owned_keys(&self) -> Result<usize> {
        let keys = self.list_owned_keys()?;
        if keys.is_empty() {
            return Ok(0);
        }
        let removed = if self.use_unlink {
            self.client.unlink(&keys)?
        } else {
            self.client.del(&keys)?
        };
        debug!(
            target: LOG_TARGET,
            "deleted {} of {} keys under {:?}",
            removed,
            keys.len(),
            self.prefix
        );
        Ok(removed)
    }

    /// Keys owned by the prefix, with the prefix removed.
    pub fn list_owned_keys(&self) -> Result<Vec<String>> {
        // the client applies its native prefix to the pattern, but hands the
        // matches back with the prefix attached
        let keys = self.client.keys(ALL_KEYS)?;
        debug!(
            target: LOG_TARGET,
            "found {} keys under {:?}",
            keys.len(),
            self.prefix
        );
        Ok(keys
            .into_iter()
            .map(|k| {
                if k.starts_with(&self.prefix) {
                    return k[self.prefix.len()..].to_string();
                }
                warn!(
                    target: LOG_TARGET,
                    "key {:?} does not start with {:?}", k, self.prefix
                );
                k.chars().skip(self.prefix.chars().count()).collect()
            })
            .collect())
    }

    /// Whether the server behind the connection is recent enough for
    /// `unlink`.
    fn resolve_unlink_capability(&self) -> Result<bool> {
        let server = self.client.info("server")?;
        let version = server.get(VERSION_FIELD).map(String::as_str).unwrap_or("");
        let supported = version
            .parse::<ServerVersion>()
            .map(|v| v >= UNLINK_MIN_VERSION)
            .unwrap_or(false);
        if !supported {
            info!(
                target: LOG_TARGET,
                "server version {:?} has no unlink, falling back to del", version
            );
        }
        Ok(supported)
    }
}

impl<C: StoreClient> StoreClient for PrefixedClient<C> {
    /// Connects the wrapped client, then binds it to the prefix.
    ///
    /// The prefix is applied whatever the outcome of the connect, some
    /// clients only accept it once connected.
    fn connect(&mut self, options: &ConnectOptions) -> Result<bool> {
        let connected = self.client.connect(options)?;
        self.client.set_option(StoreOption::Prefix(self.prefix.clone()))?;
        self.use_unlink = false;
        if self.prefer_unlink && connected {
            self.use_unlink = self.resolve_unlink_capability()?;
        }
        debug!(
            target: LOG_TARGET,
            "connect to {} under {:?}: {}, unlink: {}",
            options.endpoint(),
            self.prefix,
            connected,
            self.use_unlink
        );
        Ok(connected)
    }

    /// Re-asserting the current prefix is a no-op, any other prefix is
    /// rejected. Other options go straight to the wrapped client.
    fn set_option(&mut self, option: StoreOption) -> Result<bool> {
        match option {
            StoreOption::Prefix(ref prefix) if *prefix == self.prefix => Ok(true),
            StoreOption::Prefix(prefix) => {
                warn!(
                    target: LOG_TARGET,
                    "refusing to change prefix {:?} to {:?}", self.prefix, prefix
                );
                Err(StoreError::InvalidConfiguration(format!(
                    "the prefix {:?} can not be changed to {:?}",
                    self.prefix, prefix
                )))
            }
            other => self.client.set_option(other),
        }
    }

    fn get_option(&self, kind: OptionKind) -> Option<StoreOption> {
        self.client.get_option(kind)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.client.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<bool> {
        self.client.set(key, value)
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        self.client.del(keys)
    }

    fn supports_unlink(&self) -> bool {
        self.client.supports_unlink()
    }

    fn unlink(&self, keys: &[String]) -> Result<usize> {
        self.client.unlink(keys)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.client.keys(pattern)
    }

    fn info(&self, section: &str) -> Result<ServerInfo> {
        self.client.info(section)
    }

    /// Deletes the keys owned by the prefix, always reports success.
    fn flush_db(&self) -> Result<bool> {
        self.delete_all_owned_keys()?;
        Ok(true)
    }

    /// Deletes the keys owned by the prefix, always reports success.
    fn flush_all(&self) -> Result<bool> {
        self.delete_all_owned_keys()?;
        Ok(true)
    }
}
