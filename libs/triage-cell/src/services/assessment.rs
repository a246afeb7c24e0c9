use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{TriageAssessment, TriageError};

const SYSTEM_PROMPT: &str = r#"You are an AI-powered medical assistant analyzing patient symptoms. Provide a structured JSON response with:

- **severity** (integer, 1-10): Numerical severity level.
- **response** (string): the potential problems and first aid advice for the patient.
- **category** (string): Medical category (e.g., 'cardio', 'muscular', 'bones', 'neurological').
- **betterPrompt** (string): A detailed structured query for locating an appropriate hospital."#;

/// One call to the hosted language model: symptom text in, structured
/// severity/category assessment out. Never part of the booking transaction.
pub struct TriageService {
    http_client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl TriageService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http_client: Client::new(),
            api_url: config.triage_api_url.clone(),
            api_key: config.triage_api_key.clone(),
            model: config.triage_model.clone(),
        }
    }

    pub async fn assess(&self, symptoms: &str) -> Result<TriageAssessment, TriageError> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(TriageError::Validation(
                "Symptom description is required".to_string(),
            ));
        }
        if self.api_url.is_empty() || self.api_key.is_empty() {
            return Err(TriageError::NotConfigured);
        }

        debug!("Requesting triage assessment from {}", self.api_url);

        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": symptoms }
            ],
            "temperature": 1,
            "max_completion_tokens": 1024,
            "response_format": { "type": "json_object" }
        });

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TriageError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Triage API error ({}): {}", status, error_text);
            return Err(TriageError::Upstream(format!("{}: {}", status, error_text)));
        }

        let completion: Value = response
            .json()
            .await
            .map_err(|e| TriageError::InvalidResponse(e.to_string()))?;

        let content = completion["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                TriageError::InvalidResponse("missing completion content".to_string())
            })?;

        let assessment: TriageAssessment = serde_json::from_str(content)
            .map_err(|e| TriageError::InvalidResponse(e.to_string()))?;

        debug!(
            "Triage assessment: severity {} category {}",
            assessment.severity, assessment.category
        );
        Ok(assessment)
    }
}
