use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::letters::dto::{FormData, GenerateLetterRequest};
use crate::letters::repo::Letter;
use crate::state::AppState;

const SYSTEM_PROMPT: &str = "You are a professional legal letter writer and paralegal assistant. \
Generate formal, professional, and legally appropriate letters based on the provided information.\n\n\
Guidelines:\n\
- Use formal business letter format with proper headers and structure\n\
- Include sender and recipient information when provided\n\
- Be direct, professional, and clear in communication\n\
- Use appropriate legal language where applicable\n\
- Include relevant dates and specific details\n\
- Ensure the letter achieves the stated objective\n\
- Maintain a professional but firm tone when appropriate\n\
- Sign letters as coming from the Lawletter legal team";

fn push_line(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(v) = value {
        if !v.is_empty() {
            out.push_str(label);
            out.push_str(": ");
            out.push_str(v);
            out.push('\n');
        }
    }
}

pub fn build_user_prompt(
    letter_type: &str,
    prompt: &str,
    form: &FormData,
    urgency_level: &str,
) -> String {
    let mut out = format!(
        "Generate a professional {letter_type} letter with the following details:\n\n{prompt}\n\n"
    );
    push_line(&mut out, "Sender", &form.full_name);
    push_line(&mut out, "Sender Address", &form.your_address);
    push_line(&mut out, "Recipient", &form.recipient_name);
    push_line(&mut out, "Recipient Address", &form.recipient_address);
    push_line(&mut out, "Situation", &form.brief_description);
    push_line(&mut out, "Details", &form.detailed_information);
    push_line(&mut out, "Desired Outcome", &form.what_to_achieve);
    if urgency_level != "standard" {
        out.push_str("Urgency: ");
        out.push_str(urgency_level);
        out.push('\n');
    }
    out.push_str("\nPlease format this as a complete, professional letter ready to send.");
    out
}

/// Calls the injected generator once and persists the result. Generator
/// failure surfaces as an upstream error with nothing stored.
pub async fn generate_letter(
    state: &AppState,
    user_id: Uuid,
    req: GenerateLetterRequest,
) -> Result<Letter, ApiError> {
    let user_prompt = build_user_prompt(
        &req.letter_type,
        &req.prompt,
        &req.form_data,
        &req.urgency_level,
    );

    let content = state
        .generator
        .generate(SYSTEM_PROMPT, &user_prompt)
        .await
        .map_err(ApiError::Upstream)?;

    let form_data = serde_json::to_value(&req.form_data)
        .map_err(|e| ApiError::Internal(e.into()))?;

    let letter = Letter::insert(
        &state.db,
        user_id,
        &req.title,
        &content,
        &req.letter_type,
        &form_data,
        &req.urgency_level,
        req.total_price,
    )
    .await?;

    info!(letter_id = %letter.id, user_id = %user_id, letter_type = %letter.letter_type, "letter generated");
    Ok(letter)
}
