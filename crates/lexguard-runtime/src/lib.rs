//! # lexguard-runtime
//!
//! Concurrent, cached validation for lexguard.
//!
//! ## Important
//!
//! This crate is OPTIONAL. `lexguard-core` validates synchronously and
//! deterministically on its own. This crate runs the same checks on the
//! tokio blocking pool and produces the same result, ignoring
//! `validated_at`.
//!
//! Use this crate when:
//! - Validation sits inside an async service
//! - Identical answers are validated repeatedly
//! - The caller needs a deadline on the whole call
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lexguard_core::KnowledgeBase;
//! use lexguard_runtime::{RuntimeConfig, RuntimeValidator};
//!
//! let knowledge = Arc::new(KnowledgeBase::builtin()?);
//! let validator = RuntimeValidator::new(knowledge, RuntimeConfig::from_env()?);
//!
//! let result = validator.validate(query, answer).await;
//! ```

pub mod cache;
pub mod config;
pub mod orchestrator;

pub use cache::{CacheKey, ValidationCache};
pub use config::RuntimeConfig;
pub use orchestrator::RuntimeValidator;

use std::time::Duration;
use thiserror::Error;

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Validation did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Invalid runtime configuration: {0}")]
    InvalidConfig(String),
}
