use async_trait::async_trait;
use rw_core::{Classifier, ClassifiedDraft, Error, RawArticle, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tracing::{debug, info};

pub mod prompt;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Classifier backed by an OpenAI-compatible chat completions endpoint with
/// structured output.
pub struct OpenAiClassifier {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for OpenAiClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClassifier")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Wrapper object the model is asked to produce; structured output requires
/// an object root, so the draft array sits under `articles`.
#[derive(Debug, Deserialize)]
struct ClassifiedBatch {
    articles: Vec<ClassifiedDraft>,
}

impl OpenAiClassifier {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    async fn complete(&self, articles: &[RawArticle]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, "Classification request for {} articles", articles.len());

        let messages = vec![
            ChatMessage {
                role: "system",
                content: prompt::CLASSIFICATION_INSTRUCTIONS.to_string(),
            },
            ChatMessage {
                role: "user",
                content: prompt::user_prompt(articles)?,
            },
        ];
        let request = json!({
            "model": self.model,
            "messages": messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "classified_articles",
                    "strict": true,
                    "schema": prompt::response_schema(),
                }
            }
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Classification(format!(
                "classifier API returned {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Classification("classifier returned no content".to_string()))
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, articles: &[RawArticle]) -> Result<Vec<ClassifiedDraft>> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let raw = self.complete(articles).await?;
        let drafts = parse_output(&raw)?;
        info!("🧠 Classifier produced {} drafts from {} articles", drafts.len(), articles.len());
        Ok(drafts)
    }
}

/// Parse the raw model text into a draft batch.
///
/// Tolerates markdown code fences around the JSON, but nothing else: any
/// parse failure (bad JSON, wrong shape, missing field) rejects the whole
/// batch and carries the raw text for diagnosis.
pub fn parse_output(raw: &str) -> Result<Vec<ClassifiedDraft>> {
    let text = strip_code_fences(raw);
    let batch: ClassifiedBatch =
        serde_json::from_str(text).map_err(|e| Error::MalformedOutput {
            reason: e.to_string(),
            raw: raw.to_string(),
        })?;
    Ok(batch.articles)
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
