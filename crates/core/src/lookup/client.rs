//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, CompletionRequest};
use crate::LookupError;

/// Connection settings for the language model.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Base URL of an OpenAI-compatible API, without the trailing `/chat/completions`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            timeout: 20,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// [`CompletionClient`] over `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http_client: Client,
    config: LookupConfig,
}

impl ChatClient {
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the HTTP client cannot be built.
    pub fn new(config: LookupConfig) -> Result<Self, LookupError> {
        let http_client = Client::builder().timeout(Duration::from_secs(config.timeout)).build()?;
        Ok(Self { http_client, config })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for ChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LookupError> {
        let start = std::time::Instant::now();
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                Message { role: "system", content: &request.system },
                Message { role: "user", content: &request.prompt },
            ],
            temperature: self.config.temperature,
            response_format: request.json.then_some(ResponseFormat { format_type: "json_object" }),
        };
        let timeout = self.config.timeout;
        let classify = |e: reqwest::Error| {
            if e.is_timeout() { LookupError::Timeout { timeout } } else { LookupError::Http(e) }
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, model = %self.config.model, "language model request failed");
                classify(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %message, "language model API error");
            return Err(LookupError::Upstream { status: status.as_u16(), message });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() { LookupError::Timeout { timeout } } else { LookupError::Parse(e.to_string()) }
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LookupError::Parse("no choices in completion response".to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "language model completion"
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Accept one request, hand its raw text to the test and answer with `response`.
    async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(request);
        });

        (format!("http://{}/v1", addr), rx)
    }

    /// Read headers, then as many body bytes as Content-Length announces.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn config(base_url: String) -> LookupConfig {
        LookupConfig { base_url, api_key: "test-key".to_string(), timeout: 2, ..Default::default() }
    }

    fn request(json: bool) -> CompletionRequest {
        CompletionRequest { system: "system text".to_string(), prompt: "user text".to_string(), json }
    }

    #[tokio::test]
    async fn test_complete_sends_chat_request() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"answer"}}]}"#;
        let (base_url, received) = serve_once(json_response("200 OK", body)).await;

        let client = ChatClient::new(config(base_url)).unwrap();
        let answer = client.complete(&request(true)).await.unwrap();
        assert_eq!(answer, "answer");

        let raw = received.await.unwrap();
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(raw.to_lowercase().contains("authorization: bearer test-key"));

        let json_body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
        let sent: serde_json::Value = serde_json::from_str(json_body).unwrap();
        assert_eq!(sent["model"], "gpt-4o-mini");
        assert_eq!(sent["messages"][0]["role"], "system");
        assert_eq!(sent["messages"][1]["content"], "user text");
        assert_eq!(sent["response_format"]["type"], "json_object");
    }

    #[tokio::test]
    async fn test_plain_request_has_no_response_format() {
        let body = r#"{"choices":[{"message":{"content":"text"}}]}"#;
        let (base_url, received) = serve_once(json_response("200 OK", body)).await;

        let client = ChatClient::new(config(base_url)).unwrap();
        client.complete(&request(false)).await.unwrap();

        let raw = received.await.unwrap();
        assert!(!raw.contains("response_format"));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let (base_url, _received) =
            serve_once(json_response("429 Too Many Requests", r#"{"error":"slow down"}"#)).await;

        let client = ChatClient::new(config(base_url)).unwrap();
        let result = client.complete(&request(false)).await;
        match result {
            Err(LookupError::Upstream { status, message }) => {
                assert_eq!(status, 429);
                assert!(message.contains("slow down"));
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_parse_error() {
        let (base_url, _received) = serve_once(json_response("200 OK", r#"{"choices":[]}"#)).await;

        let client = ChatClient::new(config(base_url)).unwrap();
        assert!(matches!(client.complete(&request(false)).await, Err(LookupError::Parse(_))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let client = ChatClient::new(LookupConfig { timeout: 1, ..config(format!("http://{}", addr)) }).unwrap();
        assert!(matches!(client.complete(&request(false)).await, Err(LookupError::Timeout { timeout: 1 })));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ChatClient::new(config("http://localhost:9/v1/".to_string())).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
    }
}
