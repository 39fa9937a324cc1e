// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

use thiserror::Error;

use std::io;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("client is not connected")]
    NotConnected,

    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    #[error("unsupported command: {0}")]
    Unsupported(&'static str),

    #[error("invalid server version: {0:?}")]
    InvalidVersion(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("store io error: {0}")]
    Io(#[from] io::Error),

    #[error("other err: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
