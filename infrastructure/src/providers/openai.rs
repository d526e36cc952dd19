//! OpenAI-compatible Chat Completions gateway.
//!
//! Sends `POST {base_url}/chat/completions` with a system and a user message
//! and reads `choices[0].message.content`. Works against any endpoint that
//! speaks the same wire format.

use async_trait::async_trait;
use bookbot_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use bookbot_domain::util::truncate_str;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default endpoint base
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Longest slice of an error body quoted in a [`GatewayError`]
const ERROR_BODY_MAX_BYTES: usize = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// [`LlmGateway`] over an OpenAI-compatible HTTP API
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiGateway {
    /// Build a gateway with an explicit key.
    ///
    /// `timeout` bounds each HTTP request.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bookbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Other(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a gateway reading the key from the environment variable `api_key_env`.
    pub fn from_env(
        base_url: impl Into<String>,
        api_key_env: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::Unauthorized(format!("environment variable {api_key_env} is not set"))
            })?;
        Self::new(base_url, api_key, timeout)
    }

    pub fn endpoint(&self) -> String {
        chat_completions_url(&self.base_url)
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let body = ChatRequest {
            model: request.model.as_str(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = self.endpoint();
        debug!(url = %url, model = %request.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status(status, &text));
        }
        parse_completion(&text)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else if e.is_decode() {
        GatewayError::InvalidResponse(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

/// Map a non-success HTTP status and its body to a gateway error
fn map_status(status: StatusCode, body: &str) -> GatewayError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| truncate_str(body.trim(), ERROR_BODY_MAX_BYTES).to_string());
    let message = format!("HTTP {}: {}", status.as_u16(), detail);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(message),
    }
}

/// Text of the first choice; a missing `content` reads as empty
fn parse_completion(body: &str) -> Result<String, GatewayError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        GatewayError::InvalidResponse(format!(
            "{e}: {}",
            truncate_str(body, ERROR_BODY_MAX_BYTES)
        ))
    })?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))?;
    Ok(choice.message.content.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookbot_domain::Model;

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            chat_completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://localhost:11434/v1/"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest {
            model: Model::Gpt4oMini,
            system_prompt: "sys".to_string(),
            user_prompt: "usr".to_string(),
            temperature: 0.5,
            max_tokens: 256,
        };
        let body = ChatRequest {
            model: request.model.as_str(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
        assert_eq!(json["max_tokens"], 256);
    }

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"[1]"}},{"message":{"content":"x"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "[1]");
    }

    #[test]
    fn test_parse_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(GatewayError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_completion("<html>bad gateway</html>"),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            map_status(StatusCode::UNAUTHORIZED, body),
            GatewayError::Unauthorized("HTTP 401: Incorrect API key provided".to_string())
        );
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GatewayError::RateLimited(m) if m.contains("slow down")
        ));
        assert_eq!(map_status(StatusCode::GATEWAY_TIMEOUT, ""), GatewayError::Timeout);
        assert!(matches!(
            map_status(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            GatewayError::RequestFailed(m) if m == "HTTP 500: oops"
        ));
    }

    /// Serve one canned HTTP response on a loopback port and return the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then as much body as Content-Length announces
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/v1")
    }

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            model: Model::default(),
            system_prompt: "sys".to_string(),
            user_prompt: "usr".to_string(),
            temperature: 0.7,
            max_tokens: 64,
        }
    }

    #[tokio::test]
    async fn test_complete_against_local_server() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"[{\"title\":\"Dune\"}]"}}]}"#,
        )
        .await;
        let gateway = OpenAiGateway::new(base, "test-key", Duration::from_secs(5)).unwrap();
        let text = gateway.complete(&sample_request()).await.unwrap();
        assert_eq!(text, r#"[{"title":"Dune"}]"#);
    }

    #[tokio::test]
    async fn test_complete_maps_rate_limit() {
        let base = serve_once(
            "HTTP/1.1 429 Too Many Requests",
            r#"{"error":{"message":"Rate limit reached"}}"#,
        )
        .await;
        let gateway = OpenAiGateway::new(base, "test-key", Duration::from_secs(5)).unwrap();
        let err = gateway.complete(&sample_request()).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::RateLimited("HTTP 429: Rate limit reached".to_string())
        );
    }

    #[test]
    fn test_from_env_requires_key() {
        let err = OpenAiGateway::from_env(
            DEFAULT_BASE_URL,
            "BOOKBOT_TEST_KEY_THAT_IS_NEVER_SET",
            Duration::from_secs(1),
        )
        .err()
        .unwrap();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }
}
