//! Translation invocation. The contract accepts any target language; the
//! pipeline only ever asks for English.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::render;
use crate::llm_client::schema::{Field, Schema};
use crate::llm_client::StructuredPrompt;
use crate::tailoring::prompts::TRANSLATE_TEMPLATE;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextInput {
    pub text: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
}

pub struct TranslateText;

impl StructuredPrompt for TranslateText {
    const NAME: &'static str = "translateText";
    const INPUT_SCHEMA: Schema = Schema::new(&[
        Field::required_string("text", "The text to be translated."),
        Field::required_string(
            "targetLanguage",
            "The target language to translate the text into (e.g., \"English\").",
        ),
    ]);
    const OUTPUT_SCHEMA: Schema = Schema::new(&[Field::required_string(
        "translatedText",
        "The translated text.",
    )]);

    type Input = TranslateTextInput;
    type Output = TranslationResult;

    fn render(input: &TranslateTextInput) -> String {
        render(
            TRANSLATE_TEMPLATE,
            &[
                ("text", &input.text),
                ("targetLanguage", &input.target_language),
            ],
        )
    }
}
