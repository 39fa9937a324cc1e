// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

use std::io;

use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::Rng;

use super::*;

pub const PREFIX: &str = "test.";
pub const OTHER_PREFIX: &str = "other.";

pub fn random_key(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .collect()
}

pub fn connected_memory(server: &MemoryServer) -> MemoryClient {
    let mut client = MemoryClient::new(server.clone());
    assert!(client.connect(&ConnectOptions::default()).unwrap());
    client
}

/// A prefixed client connected to `server`, panics if it can't connect.
pub fn prefixed(
    server: &MemoryServer,
    prefix: &str,
    prefer_unlink: bool,
) -> PrefixedClient<MemoryClient> {
    let inner = MemoryClient::new(server.clone());
    let mut client = PrefixedClient::new(inner, prefix, prefer_unlink);
    if !client.connect(&ConnectOptions::default()).unwrap() {
        panic!("could not connect to {:?}", server);
    }
    client
}

/// Wraps a memory client, records every command and can fail one of them.
pub struct RecordingClient {
    inner: MemoryClient,
    calls: Mutex<Vec<&'static str>>,
    fail_on: Option<&'static str>,
}

impl RecordingClient {
    pub fn new(inner: MemoryClient) -> Self {
        RecordingClient {
            inner,
            calls: Mutex::new(vec![]),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, command: &'static str) -> Self {
        self.fail_on = Some(command);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == command).count()
    }

    fn record(&self, command: &'static str) -> Result<()> {
        self.calls.lock().push(command);
        if self.fail_on == Some(command) {
            let err = io::Error::new(io::ErrorKind::ConnectionReset, command);
            return Err(StoreError::Io(err));
        }
        Ok(())
    }
}

impl StoreClient for RecordingClient {
    fn connect(&mut self, options: &ConnectOptions) -> Result<bool> {
        self.record("connect")?;
        self.inner.connect(options)
    }

    fn set_option(&mut self, option: StoreOption) -> Result<bool> {
        self.record("set_option")?;
        self.inner.set_option(option)
    }

    fn get_option(&self, kind: OptionKind) -> Option<StoreOption> {
        self.inner.get_option(kind)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.record("get")?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<bool> {
        self.record("set")?;
        self.inner.set(key, value)
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        self.record("del")?;
        self.inner.del(keys)
    }

    fn supports_unlink(&self) -> bool {
        self.inner.supports_unlink()
    }

    fn unlink(&self, keys: &[String]) -> Result<usize> {
        self.record("unlink")?;
        self.inner.unlink(keys)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.record("keys")?;
        self.inner.keys(pattern)
    }

    fn info(&self, section: &str) -> Result<ServerInfo> {
        self.record("info")?;
        self.inner.info(section)
    }

    fn flush_db(&self) -> Result<bool> {
        self.record("flush_db")?;
        self.inner.flush_db()
    }

    fn flush_all(&self) -> Result<bool> {
        self.record("flush_all")?;
        self.inner.flush_all()
    }
}

/// Lets another writer store `late_key` right after every enumeration.
pub struct RacingClient {
    inner: MemoryClient,
    writer: PrefixedClient<MemoryClient>,
    late_key: String,
}

impl RacingClient {
    pub fn new(
        inner: MemoryClient,
        writer: PrefixedClient<MemoryClient>,
        late_key: &str,
    ) -> Self {
        RacingClient {
            inner,
            writer,
            late_key: late_key.to_string(),
        }
    }
}

impl StoreClient for RacingClient {
    fn connect(&mut self, options: &ConnectOptions) -> Result<bool> {
        self.inner.connect(options)
    }

    fn set_option(&mut self, option: StoreOption) -> Result<bool> {
        self.inner.set_option(option)
    }

    fn get_option(&self, kind: OptionKind) -> Option<StoreOption> {
        self.inner.get_option(kind)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<bool> {
        self.inner.set(key, value)
    }

    fn del(&self, keys: &[String]) -> Result<usize> {
        self.inner.del(keys)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let keys = self.inner.keys(pattern)?;
        self.writer.set(&self.late_key, "late")?;
        Ok(keys)
    }

    fn info(&self, section: &str) -> Result<ServerInfo> {
        self.inner.info(section)
    }

    fn flush_db(&self) -> Result<bool> {
        self.inner.flush_db()
    }

    fn flush_all(&self) -> Result<bool> {
        self.inner.flush_all()
    }
}
