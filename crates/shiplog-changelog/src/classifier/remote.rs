//! Remote classification service client
//!
//! The service receives locally pre-classified batches and may override
//! the category or clean up the description. Every failure path falls
//! back to the local results; the service can only ever improve a run,
//! never break one.

use std::time::Duration;

use serde::Deserialize;
use sha2::{Digest, Sha224};
use tracing::{debug, warn};

use shiplog_core::config::ClassifyConfig;
use shiplog_core::error::ClassifyError;

use super::{Classification, Classifier, LocalClassifier};
use crate::types::ChangeCategory;

/// Default classification service base URL
pub const DEFAULT_SERVICE_URL: &str = "https://api.shiplog.dev/v1";

/// Commits are sent to the service in batches of this size
const BATCH_SIZE: usize = 25;

/// HTTP client for the classification service
pub struct ClassifyClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    /// Hashed project title, sent for usage logging only
    project: String,
}

/// Service response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    message: T,
}

impl ClassifyClient {
    /// Create a client for the configured service
    pub fn new(
        api_key: impl Into<String>,
        project_title: &str,
        config: &ClassifyConfig,
    ) -> Result<Self, ClassifyError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let project = format!("{:x}", Sha224::digest(project_title.as_bytes()));

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            project,
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// Check the API key against the service. Any failure reads as
    /// "not valid": the caller then stays in local mode.
    pub fn validate_key(&self) -> bool {
        match self.request_validation() {
            Ok(valid) => valid,
            Err(err) => {
                debug!(error = %err, "API key validation failed");
                false
            }
        }
    }

    fn request_validation(&self) -> Result<bool, ClassifyError> {
        let response = self
            .http
            .get(self.endpoint("validate"))
            .query(&[("project", self.project.as_str())])
            .header("x-api-key", &self.api_key)
            .send()?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(ClassifyError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ClassifyError::InvalidResponse(format!(
                "validate returned {}",
                response.status()
            )));
        }

        let envelope: Envelope<bool> = response
            .json()
            .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;
        Ok(envelope.message)
    }

    /// Classify one batch of (local category, message) pairs.
    ///
    /// The response must hold one `(category, description)` pair per
    /// input, with `null` for dropped commits.
    pub fn classify_batch(
        &self,
        batch: &[(Option<ChangeCategory>, String)],
    ) -> Result<Vec<Option<Classification>>, ClassifyError> {
        let payload: Vec<(Option<&str>, &str)> = batch
            .iter()
            .map(|(category, message)| (category.as_ref().map(|c| c.title()), message.as_str()))
            .collect();

        let response = self
            .http
            .post(self.endpoint("classify"))
            .query(&[("project", self.project.as_str())])
            .header("x-api-key", &self.api_key)
            .json(&payload)
            .send()?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(ClassifyError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ClassifyError::InvalidResponse(format!(
                "classify returned {}",
                response.status()
            )));
        }

        let envelope: Envelope<Vec<(Option<String>, String)>> = response
            .json()
            .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;

        if envelope.message.len() != batch.len() {
            return Err(ClassifyError::InvalidResponse(format!(
                "expected {} results, got {}",
                batch.len(),
                envelope.message.len()
            )));
        }

        Ok(envelope
            .message
            .into_iter()
            .map(|(category, description)| {
                category
                    .as_deref()
                    .and_then(ChangeCategory::from_title)
                    .map(|category| Classification {
                        category,
                        description,
                    })
            })
            .collect())
    }
}

/// Classifier that delegates to the remote service and falls back to
/// the local verb table when the service misbehaves.
pub struct RemoteClassifier {
    local: LocalClassifier,
    client: ClassifyClient,
}

impl RemoteClassifier {
    /// Create a remote classifier over a connected client
    pub fn new(client: ClassifyClient) -> Self {
        Self {
            local: LocalClassifier::new(),
            client,
        }
    }
}

impl Classifier for RemoteClassifier {
    fn classify(&self, message: &str) -> Option<Classification> {
        self.classify_all(&[message.to_string()]).pop().flatten()
    }

    fn classify_all(&self, messages: &[String]) -> Vec<Option<Classification>> {
        let mut results = Vec::with_capacity(messages.len());

        for chunk in messages.chunks(BATCH_SIZE) {
            let local: Vec<Option<Classification>> =
                chunk.iter().map(|m| self.local.classify(m)).collect();

            let batch: Vec<(Option<ChangeCategory>, String)> = chunk
                .iter()
                .zip(&local)
                .map(|(message, classification)| {
                    (
                        classification.as_ref().map(|c| c.category),
                        message.clone(),
                    )
                })
                .collect();

            match self.client.classify_batch(&batch) {
                Ok(remote) => results.extend(remote),
                Err(err) => {
                    warn!(error = %err, "classification service failed, keeping local results");
                    results.extend(local);
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> ClassifyClient {
        let config = ClassifyConfig {
            remote: true,
            // Nothing listens here; connections are refused immediately.
            url: Some("http://127.0.0.1:9".to_string()),
            timeout_secs: 1,
        };
        ClassifyClient::new("test-key", "demo", &config).unwrap()
    }

    #[test]
    fn test_unreachable_service_falls_back_to_local() {
        let classifier = RemoteClassifier::new(unreachable_client());

        let results = classifier.classify_all(&[
            "Add login page".to_string(),
            "xyz random message".to_string(),
        ]);

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].as_ref().unwrap().category,
            ChangeCategory::Added
        );
        assert!(results[1].is_none());
    }

    #[test]
    fn test_unreachable_service_invalidates_key() {
        assert!(!unreachable_client().validate_key());
    }

    #[test]
    fn test_envelope_mapping() {
        let body = r#"{"message": [["Fixed", "Fix crash on startup"], [null, "noise"]]}"#;
        let envelope: Envelope<Vec<(Option<String>, String)>> =
            serde_json::from_str(body).unwrap();

        assert_eq!(envelope.message.len(), 2);
        assert_eq!(envelope.message[0].0.as_deref(), Some("Fixed"));
        assert!(envelope.message[1].0.is_none());
    }
}
