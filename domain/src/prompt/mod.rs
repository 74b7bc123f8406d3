//! Prompt domain
//!
//! Templates for the prompts the mixture builds itself.

mod template;

pub use template::PromptTemplate;
