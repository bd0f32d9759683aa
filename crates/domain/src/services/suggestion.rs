//! AI message suggestions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::InvitationData;

/// Prompt sent when the user has not typed one.
pub const DEFAULT_PROMPT: &str = "कृपया एक पारंपरिक आणि सुंदर संदेश तयार करा.";

pub const FAILURE_TITLE: &str = "AI मदत अयशस्वी";
pub const FAILURE_MESSAGE: &str = "सामग्री जुळवून घेण्यात एक त्रुटी आली. कृपया पुन्हा प्रयत्न करा.";
pub const SUCCESS_TITLE: &str = "AI सूचना लागू केली";
pub const SUCCESS_MESSAGE: &str = "AI ने सुचवलेली सामग्री तुमच्या आमंत्रणात जोडली आहे.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub bride_name: String,
    pub groom_name: String,
    pub main_date: String,
    pub venue_name: String,
    pub user_prompt: String,
}

impl SuggestionRequest {
    pub fn for_invitation(data: &InvitationData, prompt: Option<&str>) -> Self {
        Self {
            bride_name: data.bride_name.clone(),
            groom_name: data.groom_name.clone(),
            main_date: data.date_line(),
            venue_name: data.venue_name.clone(),
            user_prompt: prompt
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or(DEFAULT_PROMPT)
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub suggested_message: String,
    #[serde(default)]
    pub design_adjustments: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("Suggestion service is disabled")]
    Disabled,

    #[error("Suggestion service unreachable: {0}")]
    Unreachable(String),

    #[error("Suggestion service returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl SuggestionError {
    /// Localized (title, message) pair shown to the user.
    pub fn localized(&self) -> (&'static str, &'static str) {
        (FAILURE_TITLE, FAILURE_MESSAGE)
    }
}

/// Text-suggestion backend.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Suggestion, SuggestionError>;
}

/// Offline suggestion service for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockSuggestionService {
    pub simulate_failure: bool,
}

impl MockSuggestionService {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait]
impl SuggestionService for MockSuggestionService {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Suggestion, SuggestionError> {
        if self.simulate_failure {
            tracing::warn!(
                bride = %request.bride_name,
                groom = %request.groom_name,
                "Mock suggestion service simulating failure"
            );
            return Err(SuggestionError::Unreachable("Simulated failure".to_string()));
        }

        Ok(Suggestion {
            suggested_message: format!(
                "{} व {} यांच्या शुभविवाहास {} रोजी {} येथे आपली उपस्थिती प्रार्थनीय आहे.",
                request.bride_name, request.groom_name, request.main_date, request.venue_name
            ),
            design_adjustments: "Keep the classic maroon palette with gold accents.".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_invitation() {
        let data = InvitationData::initial();
        let request = SuggestionRequest::for_invitation(&data, None);
        assert_eq!(request.main_date, "रविवार, २६ २०२६");
        assert_eq!(request.user_prompt, DEFAULT_PROMPT);

        let request = SuggestionRequest::for_invitation(&data, Some("  short and sweet "));
        assert_eq!(request.user_prompt, "short and sweet");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["brideName"], "प्रेरणा पाटील");
        assert_eq!(json["venueName"], "सिद्धिविनायक लॉन");
    }

    #[test]
    fn test_suggestion_wire_format() {
        let s: Suggestion =
            serde_json::from_str(r#"{"suggestedMessage":"नमस्कार","designAdjustments":"gold"}"#)
                .unwrap();
        assert_eq!(s.suggested_message, "नमस्कार");
        let s: Suggestion = serde_json::from_str(r#"{"suggestedMessage":"x"}"#).unwrap();
        assert_eq!(s.design_adjustments, "");
    }

    #[tokio::test]
    async fn test_mock_service() {
        let request = SuggestionRequest::for_invitation(&InvitationData::initial(), None);
        let ok = MockSuggestionService::new().suggest(&request).await.unwrap();
        assert!(ok.suggested_message.contains("प्रेरणा पाटील"));

        let err = MockSuggestionService::failing()
            .suggest(&request)
            .await
            .unwrap_err();
        assert_eq!(err.localized(), (FAILURE_TITLE, FAILURE_MESSAGE));
    }
}
