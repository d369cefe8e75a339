//! Interception layer wiring the pruning engine into a host's query path
//!
//! The engine itself is a pure function; everything environmental lives
//! here: the per-thread field-context hand-off, the statement-kind gate,
//! the fail-closed fallback to the original SQL, a bounded rewrite cache,
//! configuration, and logging setup.

pub mod cache;
pub mod config;
pub mod context;
pub mod interceptor;
pub mod logging;

pub use config::{Config, ConfigError};
pub use context::{ContextGuard, FieldContext};
pub use interceptor::{SqlInterceptor, StatementKind};
