use serde::{Deserialize, Serialize};

use crate::letters::repo::Letter;

/// Structured intake fields forwarded into the prompt and stored alongside
/// the letter. All optional; field names follow the web client.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub full_name: Option<String>,
    pub your_address: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_address: Option<String>,
    pub brief_description: Option<String>,
    pub detailed_information: Option<String>,
    pub what_to_achieve: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateLetterRequest {
    pub title: String,
    pub prompt: String,
    #[serde(default = "default_letter_type")]
    pub letter_type: String,
    #[serde(default)]
    pub form_data: FormData,
    #[serde(default = "default_urgency_level")]
    pub urgency_level: String,
    #[serde(default = "default_total_price")]
    pub total_price: f64,
}

fn default_letter_type() -> String {
    "general".into()
}

fn default_urgency_level() -> String {
    "standard".into()
}

fn default_total_price() -> f64 {
    49.00
}

#[derive(Debug, Serialize)]
pub struct LetterResponse {
    pub letter: Letter,
}

#[derive(Debug, Serialize)]
pub struct LetterListResponse {
    pub letters: Vec<Letter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_fills_defaults() {
        let req: GenerateLetterRequest =
            serde_json::from_str(r#"{"title":"Demand","prompt":"Unpaid invoice"}"#).unwrap();
        assert_eq!(req.letter_type, "general");
        assert_eq!(req.urgency_level, "standard");
        assert_eq!(req.total_price, 49.00);
        assert!(req.form_data.full_name.is_none());
    }

    #[test]
    fn form_data_uses_camel_case() {
        let fd: FormData = serde_json::from_str(
            r#"{"fullName":"Ada Lovelace","whatToAchieve":"Full refund"}"#,
        )
        .unwrap();
        assert_eq!(fd.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(fd.what_to_achieve.as_deref(), Some("Full refund"));
    }
}
