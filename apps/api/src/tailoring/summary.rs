//! Job description summary — a standalone invocation, not part of the tailoring pipeline.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::render;
use crate::llm_client::schema::{Field, Schema};
use crate::llm_client::StructuredPrompt;
use crate::tailoring::prompts::SUMMARIZE_JOB_DESCRIPTION_TEMPLATE;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionInput {
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptionSummary {
    pub summary: String,
}

pub struct SummarizeJobDescription;

impl StructuredPrompt for SummarizeJobDescription {
    const NAME: &'static str = "jobDescriptionSummary";
    const INPUT_SCHEMA: Schema = Schema::new(&[Field::required_string(
        "jobDescription",
        "The full text of the job description.",
    )]);
    const OUTPUT_SCHEMA: Schema = Schema::new(&[Field::required_string(
        "summary",
        "A concise summary of the key qualifications, skills, and experience required by the job description.",
    )]);

    type Input = JobDescriptionInput;
    type Output = JobDescriptionSummary;

    fn render(input: &JobDescriptionInput) -> String {
        render(
            SUMMARIZE_JOB_DESCRIPTION_TEMPLATE,
            &[("jobDescription", &input.job_description)],
        )
    }
}
