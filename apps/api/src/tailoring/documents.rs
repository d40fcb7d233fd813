//! Document tailoring invocation: rewrites resume and cover letter against a job description.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::render;
use crate::llm_client::schema::{Field, Schema};
use crate::llm_client::StructuredPrompt;
use crate::tailoring::prompts::TAILOR_DOCUMENTS_TEMPLATE;

/// Documents are opaque data URIs, forwarded to the model without being decoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorDocumentsInput {
    pub resume_document: String,
    pub cover_letter_document: String,
    pub job_description: String,
}

/// Both documents, rewritten in full. Never partially populated: a response missing
/// either field fails schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoringResult {
    #[serde(alias = "tailoredResume")]
    pub tailored_resume: String,
    #[serde(alias = "tailoredCoverLetter")]
    pub tailored_cover_letter: String,
}

pub struct TailorDocuments;

impl StructuredPrompt for TailorDocuments {
    const NAME: &'static str = "tailorResumeAndCoverLetter";
    const INPUT_SCHEMA: Schema = Schema::new(&[
        Field::required_string(
            "resumeDocument",
            "The resume as a data URI with a MIME type and base64 data.",
        ),
        Field::required_string(
            "coverLetterDocument",
            "The cover letter as a data URI with a MIME type and base64 data.",
        ),
        Field::required_string(
            "jobDescription",
            "The job description to tailor the documents to.",
        ),
    ]);
    const OUTPUT_SCHEMA: Schema = Schema::new(&[
        Field::required_string("tailoredResume", "The full tailored resume."),
        Field::required_string("tailoredCoverLetter", "The full tailored cover letter."),
    ]);

    type Input = TailorDocumentsInput;
    type Output = TailoringResult;

    fn render(input: &TailorDocumentsInput) -> String {
        render(
            TAILOR_DOCUMENTS_TEMPLATE,
            &[
                ("resumeDocument", &input.resume_document),
                ("coverLetterDocument", &input.cover_letter_document),
                ("jobDescription", &input.job_description),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_all_three_inputs_verbatim() {
        let prompt = TailorDocuments::render(&TailorDocumentsInput {
            resume_document: "data:text/plain;base64,UmVzdW1l".into(),
            cover_letter_document: "data:text/plain;base64,TGV0dGVy".into(),
            job_description: "We are looking for a software engineer".into(),
        });
        assert!(prompt.contains("data:text/plain;base64,UmVzdW1l"));
        assert!(prompt.contains("data:text/plain;base64,TGV0dGVy"));
        assert!(prompt.contains("We are looking for a software engineer"));
    }

    #[test]
    fn test_result_reads_model_field_names_and_writes_snake_case() {
        let result: TailoringResult = serde_json::from_str(
            r#"{"tailoredResume": "Resume text", "tailoredCoverLetter": "Letter text"}"#,
        )
        .unwrap();
        assert_eq!(result.tailored_resume, "Resume text");

        let out = serde_json::to_value(&result).unwrap();
        assert_eq!(out["tailored_cover_letter"], "Letter text");
    }

    #[test]
    fn test_output_schema_requires_both_documents() {
        let value = serde_json::json!({"tailoredResume": "Resume text"});
        assert!(TailorDocuments::OUTPUT_SCHEMA.validate(&value).is_err());
    }
}
