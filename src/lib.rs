pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;

pub use domain::EntityDocument;
pub use error::{EtlError, Result};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{MessageSource, SmsMessage};
