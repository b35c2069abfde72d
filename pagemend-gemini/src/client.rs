//! Gemini completion client
//!
//! Talks to the `generateContent` endpoint with round-robin key
//! rotation: a key that fails is blacklisted and the call is retried
//! with the next key, up to the retry budget.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use pagemend_core::config::CompletionConfig;
use pagemend_core::Completer;

use crate::error::{Error, Result};
use crate::keys::KeyRing;

/// Public Gemini API host
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default retry budget per completion call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Client for the Gemini `generateContent` API.
///
/// Keys live behind a mutex so a shared client can rotate them from
/// concurrent pipeline runs.
#[derive(Debug)]
pub struct GeminiCompleter {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    keys: Mutex<KeyRing>,
    max_retries: u32,
}

impl GeminiCompleter {
    /// Creates a client for the public endpoint with default settings.
    ///
    /// Fails with [`Error::NoKeys`] when the ring is empty, so callers
    /// can fall back to running without a completion service.
    pub fn new(model: impl Into<String>, keys: KeyRing) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::NoKeys);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint: Url::parse(DEFAULT_ENDPOINT)?,
            model: model.into(),
            keys: Mutex::new(keys),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Creates a client from configuration.
    ///
    /// Configured keys take priority; when none are configured the
    /// ring is loaded from `GEMINI_API_KEY1`..`GEMINI_API_KEY5`.
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let keys = if config.api_keys.is_empty() {
            KeyRing::from_env()
        } else {
            KeyRing::new(config.api_keys.clone())
        }
        .with_window(config.blacklist_window);
        if keys.is_empty() {
            return Err(Error::NoKeys);
        }

        let endpoint = match &config.endpoint {
            Some(endpoint) => Url::parse(endpoint)?,
            None => Url::parse(DEFAULT_ENDPOINT)?,
        };
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            keys: Mutex::new(keys),
            max_retries: config.max_retries,
        })
    }

    /// Overrides the endpoint, e.g. for a local proxy.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Url::parse(endpoint)?;
        Ok(self)
    }

    /// Overrides the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Requests a completion, rotating keys on failure.
    ///
    /// Each failed attempt blacklists the key it used and moves to the
    /// next one. Errors with [`Error::NoKeys`] once every key is
    /// blacklisted and with [`Error::Exhausted`] when the retry budget
    /// runs out first.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        for attempt in 1..=self.max_retries {
            let key = match self.keys.lock().await.next_key() {
                Some(key) => key,
                None => return Err(Error::NoKeys),
            };
            match self.call_once(&key, prompt).await {
                Ok(text) => {
                    debug!(attempt, chars = text.len(), "completion succeeded");
                    return Ok(text);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "completion attempt failed");
                    self.keys.lock().await.blacklist(&key);
                }
            }
        }
        Err(Error::Exhausted)
    }

    async fn call_once(&self, key: &str, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.7),
                top_p: Some(0.9),
            }),
        };

        let response = self
            .client
            .post(self.request_url(key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read response body".to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response.json().await?;
        let text = reply.text();
        if text.is_empty() {
            return Err(Error::EmptyReply);
        }
        Ok(text)
    }

    fn request_url(&self, key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path(&format!("/v1beta/models/{}:generateContent", self.model));
        url.query_pairs_mut().append_pair("key", key);
        url
    }
}

#[async_trait]
impl Completer for GeminiCompleter {
    async fn complete(&self, prompt: &str) -> pagemend_core::Result<String> {
        self.generate(prompt)
            .await
            .map_err(|err| pagemend_core::Error::Completion(err.to_string()))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ReplyContent>,
}

#[derive(Debug, Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const MODEL: &str = "gemini-2.0-flash";
    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn completer(server: &mockito::Server, keys: &[&str]) -> GeminiCompleter {
        let ring = KeyRing::new(keys.iter().map(|k| k.to_string()).collect());
        GeminiCompleter::new(MODEL, ring)
            .unwrap()
            .with_endpoint(&server.url())
            .unwrap()
    }

    fn reply_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_returns_reply_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "k1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body("Use semantic HTML elements."))
            .create_async()
            .await;

        let completer = completer(&server, &["k1"]);
        let text = completer.generate("How do I improve this markup?").await.unwrap();

        assert_eq!(text, "Use semantic HTML elements.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_config() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "k1".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "parts": [{ "text": "hello" }] }],
                "generationConfig": { "temperature": 0.7, "topP": 0.9 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body("hi"))
            .create_async()
            .await;

        let completer = completer(&server, &["k1"]);
        completer.generate("hello").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_key_rotates_to_next() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "k1".into()))
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create_async()
            .await;
        let healthy = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "k2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body("recovered"))
            .expect(1)
            .create_async()
            .await;

        let completer = completer(&server, &["k1", "k2"]);
        let text = completer.generate("prompt").await.unwrap();

        assert_eq!(text, "recovered");
        failing.assert_async().await;
        healthy.assert_async().await;
    }

    #[tokio::test]
    async fn test_exhausted_when_every_attempt_fails() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .expect(3)
            .create_async()
            .await;

        let completer = completer(&server, &["k1", "k2", "k3"]);
        let err = completer.generate("prompt").await.unwrap_err();

        assert!(matches!(err, Error::Exhausted));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_keys_once_all_blacklisted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create_async()
            .await;

        // One key, three retries: the first failure blacklists the only
        // key, so the second attempt finds the ring empty.
        let completer = completer(&server, &["k1"]);
        let err = completer.generate("prompt").await.unwrap_err();

        assert!(matches!(err, Error::NoKeys));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_window_reuses_the_only_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "k1".into()))
            .with_status(500)
            .with_body("internal error")
            .expect(3)
            .create_async()
            .await;

        let ring = KeyRing::new(vec!["k1".to_string()]).with_window(Duration::ZERO);
        let completer = GeminiCompleter::new(MODEL, ring)
            .unwrap()
            .with_endpoint(&server.url())
            .unwrap();
        let err = completer.generate("prompt").await.unwrap_err();

        assert!(matches!(err, Error::Exhausted));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let ring = KeyRing::new(vec!["k1".to_string()]).with_window(Duration::ZERO);
        let completer = GeminiCompleter::new(MODEL, ring)
            .unwrap()
            .with_endpoint(&server.url())
            .unwrap();
        let err = completer.generate("prompt").await.unwrap_err();

        // Empty replies burn the retry budget like any other failure
        assert!(matches!(err, Error::Exhausted));
    }

    #[test]
    fn test_new_rejects_empty_ring() {
        let err = GeminiCompleter::new(MODEL, KeyRing::new(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::NoKeys));
    }

    #[test]
    fn test_from_config_uses_configured_keys() {
        let config = CompletionConfig {
            api_keys: vec!["k1".to_string()],
            endpoint: Some("http://localhost:9/".to_string()),
            ..CompletionConfig::default()
        };
        let completer = GeminiCompleter::from_config(&config).unwrap();

        assert_eq!(completer.model, "gemini-2.0-flash");
        assert_eq!(completer.max_retries, 3);
        assert_eq!(completer.endpoint.as_str(), "http://localhost:9/");
    }

    #[test]
    fn test_request_url_carries_model_and_key() {
        let ring = KeyRing::new(vec!["secret".to_string()]);
        let completer = GeminiCompleter::new(MODEL, ring).unwrap();
        let url = completer.request_url("secret");

        assert_eq!(url.path(), GENERATE_PATH);
        assert_eq!(url.query(), Some("key=secret"));
        assert_eq!(url.host_str(), Some("generativelanguage.googleapis.com"));
    }
}
