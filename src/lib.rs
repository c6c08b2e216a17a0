pub mod config;
pub mod error;
pub mod fetcher;
pub mod input;
pub mod model;
pub mod output;
pub mod processor;
pub mod resolver;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{CheckResult, Outcome, RepoRef, ScorecardRecord};
pub use processor::Processor;
pub use resolver::PurlResolver;
