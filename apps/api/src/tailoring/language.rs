//! Language detection invocation and the translation branch rule.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::render;
use crate::llm_client::schema::{Field, Schema};
use crate::llm_client::StructuredPrompt;
use crate::tailoring::prompts::DETECT_LANGUAGE_TEMPLATE;

/// Language code that triggers translation before tailoring.
pub const TRANSLATED_LANGUAGE_CODE: &str = "de";

#[derive(Debug, Clone, Serialize)]
pub struct DetectLanguageInput {
    pub text: String,
}

/// Whatever code the model returns is trusted as-is; it is not checked against
/// a list of known languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetectionResult {
    pub language_code: String,
}

pub struct DetectLanguage;

impl StructuredPrompt for DetectLanguage {
    const NAME: &'static str = "detectLanguage";
    const INPUT_SCHEMA: Schema = Schema::new(&[Field::required_string(
        "text",
        "The text to detect the language of.",
    )]);
    const OUTPUT_SCHEMA: Schema = Schema::new(&[Field::required_string(
        "languageCode",
        "The detected language code (e.g., \"en\", \"de\").",
    )]);

    type Input = DetectLanguageInput;
    type Output = LanguageDetectionResult;

    fn render(input: &DetectLanguageInput) -> String {
        render(DETECT_LANGUAGE_TEMPLATE, &[("text", &input.text)])
    }
}

/// Only German job descriptions are translated; every other code, including other
/// non-English languages, passes through untouched.
pub fn needs_translation(language_code: &str) -> bool {
    language_code
        .trim()
        .eq_ignore_ascii_case(TRANSLATED_LANGUAGE_CODE)
}
