pub mod app;
pub mod common;
pub mod config;
pub mod domain;
pub mod infra;
pub mod logging;
pub mod pipeline;

pub use common::error::{IngestError, Result};
