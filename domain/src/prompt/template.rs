//! Prompt templates for the mixture flow

use crate::orchestration::combiner::combine_results;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Instruction placed before the combined iteration outputs
    pub fn aggregation_instruction() -> &'static str {
        "Synthesise these responses into a single, high-quality response:"
    }

    /// Aggregation prompt embedding already-combined text verbatim
    pub fn aggregation_prompt(combined: &str) -> String {
        format!("{}\n\n{}", Self::aggregation_instruction(), combined)
    }

    /// Combine iteration outputs and wrap them in the aggregation prompt
    pub fn aggregation_prompt_for<S: AsRef<str>>(iteration_outputs: &[S]) -> String {
        Self::aggregation_prompt(&combine_results(iteration_outputs))
    }
}
