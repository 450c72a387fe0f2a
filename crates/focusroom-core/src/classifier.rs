//! Focus classifier clients.
//!
//! [`HttpClassifier`] posts the sample window to a prediction service:
//!
//! ```text
//! POST <endpoint>  {"eeg_data": [[f32; 320]; 6]}
//! 200              {"success": true, "result": "focused" | "unfocused"}
//! ```
//!
//! `success: false` counts as a rejection. [`Offline`] stands in when no
//! endpoint is configured and always fails, which routes the timer to its
//! random fallback verdict.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::ports::FocusClassifier;
use crate::session::FocusVerdict;
use crate::signal::SignalWindow;
use crate::storage::ClassifierConfig;

const SERVICE: &str = "focus classifier";

#[derive(Serialize)]
struct PredictionRequest<'a> {
    eeg_data: &'a SignalWindow,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    success: bool,
    #[serde(default)]
    result: Option<FocusVerdict>,
    #[serde(default)]
    message: Option<String>,
}

pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpClassifier {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AdapterError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FocusClassifier for HttpClassifier {
    async fn classify(&self, sample: &SignalWindow) -> Result<FocusVerdict, AdapterError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PredictionRequest { eeg_data: sample })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::rejected(SERVICE, format!("HTTP {status}")));
        }

        let body: PredictionResponse =
            response.json().await.map_err(|e| AdapterError::Malformed {
                service: SERVICE.to_string(),
                message: e.to_string(),
            })?;

        match body {
            PredictionResponse {
                success: true,
                result: Some(verdict),
                ..
            } => Ok(verdict),
            PredictionResponse {
                success: true,
                result: None,
                ..
            } => Err(AdapterError::Malformed {
                service: SERVICE.to_string(),
                message: "missing result".into(),
            }),
            PredictionResponse {
                success: false,
                message,
                ..
            } => Err(AdapterError::rejected(
                SERVICE,
                message.unwrap_or_else(|| "prediction failed".into()),
            )),
        }
    }
}

impl HttpClassifier {
    fn transport_error(&self, e: reqwest::Error) -> AdapterError {
        if e.is_timeout() {
            AdapterError::Timeout {
                service: SERVICE.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            AdapterError::unavailable(SERVICE, e.to_string())
        } else {
            AdapterError::Http(e)
        }
    }
}

/// Classifier used when no prediction service is configured.
pub struct Offline;

#[async_trait]
impl FocusClassifier for Offline {
    async fn classify(&self, _sample: &SignalWindow) -> Result<FocusVerdict, AdapterError> {
        Err(AdapterError::unavailable(SERVICE, "no endpoint configured"))
    }
}

/// Pick the classifier described by `config`.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn from_config(config: &ClassifierConfig) -> Result<Arc<dyn FocusClassifier>, AdapterError> {
    match config.endpoint.as_deref() {
        Some(endpoint) if !endpoint.trim().is_empty() => Ok(Arc::new(HttpClassifier::new(
            endpoint.trim(),
            Duration::from_secs(config.timeout_secs),
        )?)),
        _ => Ok(Arc::new(Offline)),
    }
}
