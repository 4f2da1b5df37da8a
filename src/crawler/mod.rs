//! Crawler module: the concurrent crawl engine
//!
//! This module contains the core crawling logic:
//! - Same-origin URL resolution
//! - The frontier (visited set + visitation budget)
//! - HTTP fetching and page extraction
//! - The bounded worker pool
//! - Job lifecycle orchestration

mod controller;
mod fetcher;
mod frontier;
mod parser;
mod pool;
mod resolver;

pub use controller::JobController;
pub use fetcher::{build_http_client, Fetcher, PageData};
pub use frontier::Frontier;
pub use parser::{parse_page, ParsedPage};
pub use resolver::{host_of, resolve};
