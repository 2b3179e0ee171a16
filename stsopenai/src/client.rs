//! HTTP client for the OpenAI chat completions endpoint

use crate::error::{Error, Result};
use crate::models::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse, ResponseFormat};
use crate::prompt::{parse_suggestions, suggestion_messages};
use reqwest::Client;
use std::time::Duration;
use stswatcher::SuggestionRequest;
use tracing::debug;
use url::Url;

/// Default OpenAI API base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for HTTP requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "spotistats/0.1.0";

/// OpenAI client
///
/// # Example
///
/// ```no_run
/// use stsopenai::OpenAiClient;
/// use stswatcher::SuggestionRequest;
///
/// # async fn run() -> stsopenai::Result<()> {
/// let client = OpenAiClient::builder().api_key("sk-...").build()?;
/// let request = SuggestionRequest {
///     track_name: "Get Lucky".into(),
///     artists: vec!["Daft Punk".into()],
///     key: None,
///     bpm: None,
/// };
/// for song in client.similar_songs(&request).await? {
///     println!("{}", song);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a chat request asking for a JSON object and returns its content
    pub async fn complete_json(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let url = Url::parse(&format!("{}/chat/completions", self.api_base))?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            response_format: ResponseFormat::json_object(),
            max_tokens: self.max_tokens,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        if let Some(usage) = &body.usage {
            debug!(
                "Completion used {} prompt + {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let choice = body.choices.into_iter().next().ok_or(Error::EmptyCompletion)?;
        if let Some(refusal) = choice.message.refusal {
            return Err(Error::invalid_shape(format!("model refused: {}", refusal)));
        }

        choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(Error::EmptyCompletion)
    }

    /// Three songs similar to the one described by `request`
    pub async fn similar_songs(&self, request: &SuggestionRequest) -> Result<Vec<String>> {
        let content = self.complete_json(suggestion_messages(request)).await?;
        parse_suggestions(&content)
    }
}

/// Builder for [`OpenAiClient`]
pub struct ClientBuilder {
    client: Option<Client>,
    api_base: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<OpenAiClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;

        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout);

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::other(format!("Invalid proxy: {}", e)))?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        Ok(OpenAiClient {
            client,
            api_base: self.api_base,
            api_key,
            model: self.model,
            max_tokens: self.max_tokens,
        })
    }
}
