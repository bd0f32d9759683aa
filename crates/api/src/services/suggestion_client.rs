//! HTTP client for the AI suggestion backend.

use async_trait::async_trait;
use domain::services::{Suggestion, SuggestionError, SuggestionRequest, SuggestionService};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::SuggestionsConfig;

/// Posts a [`SuggestionRequest`] as camelCase JSON and expects a
/// [`Suggestion`] back.
pub struct HttpSuggestionService {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpSuggestionService {
    pub fn new(config: &SuggestionsConfig) -> Result<Self, SuggestionError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SuggestionError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl SuggestionService for HttpSuggestionService {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Suggestion, SuggestionError> {
        let mut call = self.client.post(&self.url).json(request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await.map_err(|e| {
            warn!(error = %e, "Suggestion backend unreachable");
            SuggestionError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Suggestion backend returned an error");
            return Err(SuggestionError::Unreachable(format!("HTTP {}", status)));
        }

        let suggestion: Suggestion = response
            .json()
            .await
            .map_err(|e| SuggestionError::InvalidResponse(e.to_string()))?;
        if suggestion.suggested_message.trim().is_empty() {
            return Err(SuggestionError::InvalidResponse(
                "empty suggestedMessage".to_string(),
            ));
        }

        debug!(chars = suggestion.suggested_message.chars().count(), "Suggestion received");
        Ok(suggestion)
    }
}

/// Stand-in used when suggestions are switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSuggestionService;

#[async_trait]
impl SuggestionService for DisabledSuggestionService {
    async fn suggest(&self, _request: &SuggestionRequest) -> Result<Suggestion, SuggestionError> {
        Err(SuggestionError::Disabled)
    }
}
