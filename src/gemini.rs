//! Analysis-service client.
//!
//! One operation matters here: send the assembled prompt to the external
//! model with the response schema attached as a structural constraint, and
//! bring back a validated [`AnalysisResult`] or exactly one classified
//! [`AnalysisError`]. The service handle is process-wide, built lazily on
//! first use, and only stored when construction succeeds, so a missing
//! credential today does not wedge the process after the operator fixes
//! the environment.

use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};

use crate::config::{SkyscanConfig, API_KEY_ENV};
use crate::error::AnalysisError;
use crate::schema::{parse_analysis_payload, response_schema};
use crate::AnalysisResult;

const LOG_BODY_LIMIT: usize = 512;

// -------------------- Transport Seam --------------------

/// Raw reply from the transport: HTTP status plus body text. Non-success
/// statuses come back as a reply, not an `Err`, so the caller can log the
/// body before classifying.
#[derive(Clone, Debug)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

/// Seam between the client and the network. The real implementation is
/// [`UreqTransport`]; tests substitute a scripted double and count calls.
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `url` with the service credential attached.
    /// `Err` means the request produced no HTTP reply at all.
    fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<TransportReply>;
}

/// Blocking HTTP transport. No retries and no client-imposed timeout beyond
/// ureq's defaults.
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<TransportReply> {
        let response = ureq::post(url)
            .set("x-goog-api-key", api_key)
            .set("Content-Type", "application/json")
            .send_string(&body.to_string());
        match response {
            Ok(response) => {
                let status = response.status();
                let body = response
                    .into_string()
                    .context("read analysis response body")?;
                Ok(TransportReply { status, body })
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Ok(TransportReply { status, body })
            }
            Err(e) => Err(anyhow!(e).context("send analysis request")),
        }
    }
}

// -------------------- Shared Handle --------------------

/// Process-wide lazy slot for a shared handle. The builder runs under the
/// write lock and the slot is only written on success, so a failed
/// construction (say, credential not yet exported) leaves the slot empty
/// for the next attempt, and racing first uses all observe one handle.
pub struct LazyHandle<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> LazyHandle<T> {
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Current handle if one was ever built.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Return the shared handle, building it on first successful use.
    /// Callers that lose the construction race pick up the winner's handle
    /// instead of building their own.
    pub fn get_or_init<E>(
        &self,
        build: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<Arc<T>, E> {
        if let Some(handle) = self.get() {
            return Ok(handle);
        }
        let mut slot = self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }
        let handle = Arc::new(build()?);
        *slot = Some(handle.clone());
        Ok(handle)
    }
}

impl<T> Default for LazyHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -------------------- Client --------------------

/// Handle to the external analysis service: resolved endpoint, credential,
/// transport. Stateless between calls; every invocation is independent,
/// with no retries and no caching.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl GeminiClient {
    /// Build a client over the real HTTP transport.
    pub fn new(config: &SkyscanConfig) -> std::result::Result<Self, AnalysisError> {
        Self::with_transport(config, Arc::new(UreqTransport))
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// Fails with a configuration error when the credential is absent; the
    /// transport is never touched in that case.
    pub fn with_transport(
        config: &SkyscanConfig,
        transport: Arc<dyn Transport>,
    ) -> std::result::Result<Self, AnalysisError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AnalysisError::Configuration(format!("credential missing: set {}", API_KEY_ENV))
            })?
            .to_string();
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            endpoint,
            api_key,
            transport,
        })
    }

    fn from_env() -> std::result::Result<Self, AnalysisError> {
        let config =
            SkyscanConfig::load().map_err(|e| AnalysisError::Configuration(format!("{e:#}")))?;
        Self::new(&config)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one analysis invocation: assemble the prompt, call the model
    /// with the response schema attached, validate the reply.
    pub fn generate_report(
        &self,
        prompt_template: &str,
        video_file_name: &str,
    ) -> std::result::Result<AnalysisResult, AnalysisError> {
        let prompt = assemble_prompt(prompt_template, video_file_name);
        let request = json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        });

        log::debug!("sending analysis request to {}", self.endpoint);
        let reply = self
            .transport
            .post_json(&self.endpoint, &self.api_key, &request)
            .map_err(|e| {
                log::error!("analysis request failed: {:#}", e);
                AnalysisError::Transport(format!("{e:#}"))
            })?;

        if !(200..300).contains(&reply.status) {
            log::error!(
                "analysis service returned {}: {}",
                reply.status,
                truncate(&reply.body, LOG_BODY_LIMIT)
            );
            return Err(AnalysisError::Transport(format!(
                "service returned status {}",
                reply.status
            )));
        }

        let text = extract_text_payload(&reply.body).map_err(|e| {
            log::error!("unusable analysis reply envelope: {:#}", e);
            AnalysisError::MalformedResponse(format!("{e:#}"))
        })?;
        let Some(text) = text else {
            log::warn!("analysis service answered with no text payload");
            return Err(AnalysisError::EmptyResponse);
        };

        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            log::error!("analysis payload is not valid JSON: {}", e);
            AnalysisError::MalformedResponse(format!("payload is not valid JSON: {}", e))
        })?;
        let result = parse_analysis_payload(&payload).map_err(|e| {
            log::error!("analysis payload failed validation: {:#}", e);
            AnalysisError::MalformedResponse(format!("{e:#}"))
        })?;

        log::debug!(
            "analysis reply validated: {} metrics, {} events",
            result.metrics.len(),
            result.events.len()
        );
        Ok(result)
    }
}

// -------------------- Entry Point --------------------

static SHARED_CLIENT: LazyHandle<GeminiClient> = LazyHandle::new();

/// Generate a structured analysis report for a named video file.
///
/// The sole entry point consumers call. The first successful call builds
/// the process-wide client from the environment; later calls reuse it.
/// Only the file *name* is referenced in the prompt; video bytes never
/// leave the machine.
pub fn generate_analysis_report(
    prompt_template: &str,
    video_file_name: &str,
) -> std::result::Result<AnalysisResult, AnalysisError> {
    let client = SHARED_CLIENT.get_or_init(GeminiClient::from_env)?;
    client.generate_report(prompt_template, video_file_name)
}

/// Full request text: the scenario template plus a trailing sentence
/// identifying the uploaded file by display name.
pub fn assemble_prompt(prompt_template: &str, video_file_name: &str) -> String {
    format!(
        "{}\n\nThe video file being analyzed is named: \"{}\".",
        prompt_template, video_file_name
    )
}

/// Pull the text payload out of the generateContent reply envelope:
/// `candidates[0].content.parts[*].text` concatenated. `Ok(None)` means
/// the service answered but produced no usable text (no candidates, no
/// parts, or blank text only).
fn extract_text_payload(body: &str) -> Result<Option<String>> {
    let envelope: Value =
        serde_json::from_str(body).context("reply envelope is not valid JSON")?;
    let parts = match envelope
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
    {
        Some(parts) => parts,
        None => return Ok(None),
    };
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(text))
}

fn truncate(body: &str, limit: usize) -> &str {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
