//! guidechat-api: Typed client for the question-answering backend
//!
//! This crate provides the `Gateway` abstraction over the three backend
//! endpoints (primary ask, FAQ answer, external search) and an HTTP
//! implementation of it.

pub mod error;
pub mod gateway;
pub mod types;

pub use error::{Error, Result};
pub use gateway::{DEFAULT_TIMEOUT, Gateway, HttpGateway};
pub use types::*;
