// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

//! Key-value store clients sharing one physical store between tenants.
//!
//! [`PrefixedClient`] wraps any [`StoreClient`] and keeps every key it
//! touches under a fixed prefix. [`MemoryServer`]/[`MemoryClient`] provide an
//! in-process store speaking the same client contract.

mod client;
mod config;
mod error;
#[cfg(test)]
mod tests;

pub mod memory;
pub mod pattern;
pub mod prefixed;
pub mod version;

pub use self::client::*;
pub use self::config::*;
pub use self::error::{Result, StoreError};
pub use self::memory::{MemoryClient, MemoryServer};
pub use self::prefixed::PrefixedClient;
