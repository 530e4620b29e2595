pub mod analysis;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use analysis::Analyzer;
pub use prompt::build_prompt;
pub use provider::{LlmError, LlmProvider, Message, Role};
