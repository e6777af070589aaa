//! # Pipeline Runtime
//!
//! Ambient infrastructure for the publishing pipeline: configuration
//! assembly with fail-fast validation, and logging initialization.
//!
//! The pipeline core never reaches for process-wide singletons; every
//! component receives its HTTP transport and token source through
//! [`PipelineConfig`](config::PipelineConfig), built here.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
