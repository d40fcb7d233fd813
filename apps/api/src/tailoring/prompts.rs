// All LLM prompt templates for the tailoring module.
// Placeholders use `{name}` and are filled by `llm_client::prompts::render`.

/// Language detection. Replace `{text}`.
pub const DETECT_LANGUAGE_TEMPLATE: &str = r#"Detect the language of the following text and return its BCP-47 language code.

Text:
{text}

Respond with only the language code in the "languageCode" field, no surrounding prose.
For example, if the text is in English, respond with "en". If it is German, respond with "de"."#;

/// Translation. Replace `{text}`, `{targetLanguage}`.
pub const TRANSLATE_TEMPLATE: &str = r#"Translate the following text to {targetLanguage}.

Translate the text in full. Do not summarise, shorten, or comment on it.
Return only the translated text in the "translatedText" field.

Text:
{text}"#;

/// Resume + cover letter tailoring.
/// Replace `{resumeDocument}`, `{coverLetterDocument}`, `{jobDescription}`.
pub const TAILOR_DOCUMENTS_TEMPLATE: &str = r#"You are an expert resume and cover letter editor.

You will be provided with a resume, a cover letter, and a job description.
Your goal is to rewrite the resume and the cover letter so they match the requirements described in the job description.

The resume and cover letter are supplied as data URIs (MIME type followed by base64 content).

Here is the resume:
{resumeDocument}

Here is the cover letter:
{coverLetterDocument}

Here is the job description:
{jobDescription}

Highlight the qualifications and experiences that are most relevant to the job description.
Do NOT invent experience, employers, dates, or credentials that are not in the original documents.

Return BOTH documents rewritten IN FULL as plain text:
- "tailoredResume": the complete tailored resume
- "tailoredCoverLetter": the complete tailored cover letter
Never return diffs, summaries, or placeholders in place of a full document."#;

/// Job description summary. Replace `{jobDescription}`.
pub const SUMMARIZE_JOB_DESCRIPTION_TEMPLATE: &str = r#"You are an expert recruiter summarizing job descriptions to identify the most important qualifications.

Based on the following job description, provide a concise summary (no more than 150 words) of the key skills, experience, and qualifications required for the role.
Return it in the "summary" field.

Job Description:
{jobDescription}"#;
