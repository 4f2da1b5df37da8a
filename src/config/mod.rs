//! Configuration loading and validation
//!
//! Jobs can be configured either programmatically through [`crate::job::JobSpec`]
//! or from a TOML file that supplies per-job defaults.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, CrawlerConfig, OutputConfig};
pub use validation::{validate, validate_spec};
