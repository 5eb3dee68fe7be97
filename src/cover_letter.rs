//! Cover letter drafting
//!
//! One fixed instruction prompt, the approved posting and the user's own
//! words, sent as a single tool-less model call.

use crate::llm::{ContentBlock, LlmError, LlmMessage, LlmRequest, MessageRole, SystemContent};
use crate::runtime::LlmClient;
use chrono::NaiveDate;

const COVER_LETTER_PROMPT: &str = r"You are an expert cover letter writer. Using the job details and the candidate's background you are given:
1. Write a compelling, personalized cover letter.
2. Focus on the skills and experience relevant to this role.
3. Keep it concise: no more than 300 words.
4. Use a professional but engaging tone.
5. Follow the standard cover letter format, with the date, addresses and a proper salutation.
6. Point out the specific parts of the job that match the candidate's background.

Always produce a cover letter for the job you are given, even if the requirements and the candidate's experience do not line up well.";

const MAX_LETTER_TOKENS: u32 = 1024;

/// Build the drafting request
pub fn build_request(job_details: &str, background: &str, today: NaiveDate) -> LlmRequest {
    let date = today.format("%B %-d, %Y");
    let user_text = format!(
        "Please write a cover letter for this job: '''{job_details}'''\n\nUser background: '''{background}'''\n\nToday's date: {date}"
    );

    LlmRequest {
        system: vec![SystemContent::new(COVER_LETTER_PROMPT)],
        messages: vec![LlmMessage {
            role: MessageRole::User,
            content: vec![ContentBlock::text(user_text)],
        }],
        tools: vec![],
        max_tokens: Some(MAX_LETTER_TOKENS),
    }
}

/// Draft a cover letter. Output length and content are not validated.
pub async fn draft_cover_letter<L>(
    llm: &L,
    job_details: &str,
    background: &str,
    today: NaiveDate,
) -> Result<String, LlmError>
where
    L: LlmClient + ?Sized,
{
    let request = build_request(job_details, background, today);
    let response = llm.complete(&request).await?;
    let letter = response.text().trim().to_string();
    tracing::info!(chars = letter.len(), "Cover letter drafted");
    Ok(letter)
}
