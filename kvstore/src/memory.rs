// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

//! An in-process store server and the client talking to it.
//!
//! Cloning a [`MemoryServer`] hands out another handle to the same data, so
//! several clients connected to one server share the physical keyspace the
//! same way several connections to one remote server do.
//!
//! The client mimics the native prefix option of common store clients,
//! including its enumeration quirk: `keys` applies the prefix to the pattern
//! but returns the stored keys with the prefix still attached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::client::{OptionKind, ServerInfo, StoreClient, StoreOption, VERSION_FIELD};
use crate::config::{ConnectOptions, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::*;
use crate::pattern::Pattern;
use crate::version::{ServerVersion, UNLINK_MIN_VERSION};

pub const LOG_TARGET: &str = "memory";

/// Version reported by a server unless configured otherwise.
pub const DEFAULT_VERSION: &str = "7.2.4";

#[derive(Debug)]
struct ServerState {
    host: String,
    port: u16,
    version: String,
    available: bool,
    data: HashMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct MemoryServer {
    inner: Arc<RwLock<ServerState>>,
}

impl Default for MemoryServer {
    fn default() -> Self {
        MemoryServer::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl MemoryServer {
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        let state = ServerState {
            host: host.into(),
            port,
            version: DEFAULT_VERSION.to_string(),
            available: true,
            data: HashMap::new(),
        };
        MemoryServer {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Reported in the "server" info section, an empty version is left out.
    pub fn with_version<S: Into<String>>(self, version: S) -> Self {
        self.set_version(version);
        self
    }

    pub fn set_version<S: Into<String>>(&self, version: S) {
        self.write().version = version.into();
    }

    /// An unavailable server refuses connections and fails every command.
    pub fn set_available(&self, available: bool) {
        self.write().available = available;
    }

    pub fn version(&self) -> String {
        self.read().version.clone()
    }

    pub fn len(&self) -> usize {
        self.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().data.is_empty()
    }

    /// Stored keys as they are, sorted.
    pub fn raw_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().data.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn raw_get(&self, key: &str) -> Option<String> {
        self.read().data.get(key).cloned()
    }

    fn read(&self) -> RwLockReadGuard<ServerState> {
        self.inner.read()
    }

    fn write(&self) -> RwLockWriteGuard<ServerState> {
        self.inner.write()
    }

    fn accepts(&self, options: &ConnectOptions) -> bool {
        let state = self.read();
        state.available && state.host == options.host && state.port == options.port
    }
}

pub struct MemoryClient {
    server: MemoryServer,
    endpoint: Option<String>,
    unlink: bool,
    prefix: Option<String>,
    read_timeout: Duration,
    max_retries: u32,
}

impl MemoryClient {
    pub fn new(server: MemoryServer) -> Self {
        MemoryClient {
            server,
            endpoint: None,
            unlink: true,
            prefix: None,
            read_timeout: Duration::default(),
            max_retries: 0,
        }
    }

    /// Declares or hides the `unlink` primitive.
    pub fn with_unlink(mut self, unlink: bool) -> Self {
        self.unlink = unlink;
        self
    }

    pub fn server(&self) -> &MemoryServer {
        &self.server
    }

    pub fn is_connected(&self) -> bool {
        self.endpoint.is_some()
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn check(&self) -> Result<()> {
        let endpoint = self.endpoint.as_ref().ok_or(StoreError::NotConnected)?;
        if !self.server.read().available {
            return Err(StoreError::ConnectionFailure(format!(
                "{} went away",
                endpoint
            )));
        }
        Ok(())
    }

    fn state(&self) -> Result<RwLockReadGuard<ServerState>> {
        self.check()?;
        Ok(self.server.read())
    }

    fn state_mut(&self) -> Result<RwLockWriteGuard<ServerState>> {
        self.check()?;
        Ok(self.server.write())
    }

    fn remove(&self, keys: &[String]) -> Result<usize> {
        let mut state = self.state_mut()?;
        let removed = keys
            .iter()
            .filter(|k| state.data.remove(&self.full_key(k)).is_some())
            .count();
        Ok(removed)
    }
}

impl StoreClient for MemoryClient {
    fn connect(&mut self, options: &ConnectOptions) -> Result<bool> {
        if !self.server.accepts(options) {
            debug!(target: LOG_TARGET, "connection to {} refused", options.endpoint());
            self.endpoint = None;
            return Ok(false);
        }
        self.read_timeout = Duration::from_millis(options.read_timeout_ms);
        self.endpoint = Some(options.endpoint());
        debug!(target: LOG_TARGET, "connected to {}", options.endpoint());
        Ok(true)
    }

    fn set_option(&mut self, option: StoreOption) -> Result<bool> {
        if !self.is_connected() {
            return Ok(false);
        }
        match option {
            StoreOption::Prefix(prefix) if prefix.is_empty() => self.prefix = None,
            StoreOption::Prefix(prefix) => self.prefix = Some(prefix),
            StoreOption::ReadTimeout(timeout) => self.read_timeout = timeout,
            StoreOption::MaxRetries(retries) => self.max_retries = retries,
        }
        Ok(true)
    }

    fn get_option(&self, kind: OptionKind) -> Option<StoreOption> {
        match kind {
            OptionKind::Prefix => self.prefix.clone().map(StoreOption::Prefix),
            OptionKind::ReadTimeout => Some(StoreOption::ReadTimeout(self.read_timeout)),
            OptionKind::MaxRetries => Some(StoreOption::MaxRetries(self.max_retries)),
        }
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let state = self.state()?;
        Ok(state.data.get(&self.full_key(key)).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<bool> {
        let mut state = self.state_mut()?;
        state.data.insert(self.full_key(key), value.to_string());
        Ok(true)
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        self.remove(keys)
    }

    fn supports_unlink(&self) -> bool {
        self.unlink
    }

    fn unlink(&self, keys: &[String]) -> Result<usize> {
        if !self.unlink {
            return Err(StoreError::Unsupported("unlink"));
        }
        let recent = self
            .state()?
            .version
            .parse::<ServerVersion>()
            .map(|v| v >= UNLINK_MIN_VERSION)
            .unwrap_or(false);
        if !recent {
            return Err(StoreError::Unsupported("unlink"));
        }
        self.remove(keys)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = Pattern::new(&self.full_key(pattern))?;
        let state = self.state()?;
        let mut keys: Vec<String> = state
            .data
            .keys()
            .filter(|k| pattern.matches(k))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn info(&self, section: &str) -> Result<ServerInfo> {
        let state = self.state()?;
        let mut info = ServerInfo::new();
        if section.eq_ignore_ascii_case("server") {
            if !state.version.is_empty() {
                info.insert(VERSION_FIELD.to_string(), state.version.clone());
            }
            info.insert("redis_mode".to_string(), "standalone".to_string());
            info.insert("tcp_port".to_string(), state.port.to_string());
        }
        Ok(info)
    }

    fn flush_db(&self) -> Result<bool> {
        self.state_mut()?.data.clear();
        Ok(true)
    }

    fn flush_all(&self) -> Result<bool> {
        self.state_mut()?.data.clear();
        Ok(true)
    }
}
