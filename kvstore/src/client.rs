// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::ConnectOptions;
use crate::error::*;

/// Metadata returned by `info`, one field per entry.
pub type ServerInfo = BTreeMap<String, String>;

/// Field of the "server" info section carrying the semantic version.
pub const VERSION_FIELD: &str = "redis_version";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Prefix,
    ReadTimeout,
    MaxRetries,
}

/// A client side setting together with its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreOption {
    /// automatic key prefixing, applied to every key the client sends.
    Prefix(String),
    ReadTimeout(Duration),
    MaxRetries(u32),
}

impl StoreOption {
    pub fn kind(&self) -> OptionKind {
        match self {
            StoreOption::Prefix(_) => OptionKind::Prefix,
            StoreOption::ReadTimeout(_) => OptionKind::ReadTimeout,
            StoreOption::MaxRetries(_) => OptionKind::MaxRetries,
        }
    }
}

/// The operations a key-value store client has to offer.
///
/// Keys and values are opaque strings. Implementations with a native prefix
/// option apply it to `get`, `set`, `del` and `unlink`, and to the pattern of
/// `keys`, but may hand back the enumerated keys with the prefix attached.
pub trait StoreClient {
    /// Returns `Ok(false)` if the endpoint could not be reached.
    fn connect(&mut self, options: &ConnectOptions) -> Result<bool>;

    fn set_option(&mut self, option: StoreOption) -> Result<bool>;
    fn get_option(&self, kind: OptionKind) -> Option<StoreOption>;

    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<bool>;
    /// Blocking delete, returns the number of keys removed.
    fn del(&self, keys: &[String]) -> Result<usize>;

    /// Whether `unlink` is available on this client at all.
    fn supports_unlink(&self) -> bool {
        false
    }

    /// Non-blocking delete, the memory is reclaimed in the background.
    fn unlink(&self, _keys: &[String]) -> Result<usize> {
        Err(StoreError::Unsupported("unlink"))
    }

    /// All keys matching the glob `pattern`.
    fn keys(&self, pattern: &str) -> Result<Vec<String>>;
    fn info(&self, section: &str) -> Result<ServerInfo>;

    /// Removes every key of the current database.
    fn flush_db(&self) -> Result<bool>;
    /// Removes every key of every database.
    fn flush_all(&self) -> Result<bool>;
}
