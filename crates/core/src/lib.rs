pub mod config;
pub mod document;
pub mod error;
pub mod flow;
pub mod workflow;

pub use config::Config;
pub use document::*;
pub use error::*;
pub use flow::AnalysisFlow;
pub use workflow::{Approval, ReviewedSummary};
