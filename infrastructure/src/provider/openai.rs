//! OpenAI-compatible provider adapter
//!
//! Talks to `{base_url}/chat/completions` with bearer authentication.
//! One-shot calls parse the full JSON body; streaming calls hand the SSE body
//! to [`fragment_stream`](super::sse::fragment_stream).

use super::sse::fragment_stream;
use super::types::{CompletionRequestBody, CompletionResponseBody, api_error_message};
use async_trait::async_trait;
use relay_application::{CompletionGateway, FragmentStream, GatewayError};
use relay_domain::{Completion, CompletionParams};
use std::time::Duration;
use tracing::{debug, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolved provider connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    /// Bound on the initial response and on each wait for a stream fragment.
    pub timeout: Duration,
}

/// [`CompletionGateway`] backed by an OpenAI-compatible HTTP API.
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiCompatibleGateway {
    pub fn new(settings: ProviderSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        let endpoint = format!(
            "{}/chat/completions",
            settings.base_url.trim_end_matches('/')
        );
        info!(endpoint = %endpoint, "Completion provider configured");

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key,
            timeout: settings.timeout,
        })
    }

    /// POST the request and return the response once the status is 2xx.
    async fn send(
        &self,
        params: &CompletionParams,
        stream: bool,
    ) -> Result<reqwest::Response, GatewayError> {
        let body = CompletionRequestBody {
            model: &params.model,
            messages: &params.messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream,
        };

        debug!(
            model = %params.model,
            messages = params.messages.len(),
            stream,
            "Sending completion request"
        );

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| GatewayError::Timeout)?
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = tokio::time::timeout(self.timeout, response.text())
                .await
                .map_err(|_| GatewayError::Timeout)?
                .unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        Ok(response)
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Connection(e.to_string())
    }
}

#[async_trait]
impl CompletionGateway for OpenAiCompatibleGateway {
    async fn complete_once(&self, params: CompletionParams) -> Result<Completion, GatewayError> {
        let response = self.send(&params, false).await?;

        let body: CompletionResponseBody = tokio::time::timeout(self.timeout, response.json())
            .await
            .map_err(|_| GatewayError::Timeout)?
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Parse("response has no choices".to_string()))?;
        let text = choice.message.content.unwrap_or_default();

        Ok(Completion {
            text,
            usage: body.usage.unwrap_or_default(),
        })
    }

    async fn complete_stream(
        &self,
        params: CompletionParams,
    ) -> Result<FragmentStream, GatewayError> {
        let response = self.send(&params, true).await?;
        Ok(fragment_stream(response.bytes_stream(), self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use relay_domain::{ChatMessage, UsageStats};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer, timeout: Duration) -> OpenAiCompatibleGateway {
        OpenAiCompatibleGateway::new(ProviderSettings {
            api_key: "sk-test".to_string(),
            base_url: format!("{}/v1/", server.uri()),
            timeout,
        })
        .unwrap()
    }

    fn params() -> CompletionParams {
        CompletionParams {
            messages: vec![ChatMessage::user("hi")],
            model: "glm-4-air".to_string(),
            temperature: 0.7,
            max_tokens: 1240,
        }
    }

    #[tokio::test]
    async fn complete_once_returns_text_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "glm-4-air",
                "max_tokens": 1240,
                "stream": false,
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "hello"}}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let completion = gateway(&server, Duration::from_secs(5))
            .complete_once(params())
            .await
            .unwrap();

        assert_eq!(completion.text, "hello");
        assert_eq!(completion.usage, UsageStats::new(5, 1, 6));
    }

    #[tokio::test]
    async fn missing_usage_defaults_to_zero() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let completion = gateway(&server, Duration::from_secs(5))
            .complete_once(params())
            .await
            .unwrap();

        assert_eq!(completion.usage, UsageStats::default());
    }

    #[tokio::test]
    async fn error_status_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "invalid api key", "type": "auth"}
            })))
            .mount(&server)
            .await;

        let err = gateway(&server, Duration::from_secs(5))
            .complete_once(params())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::Api {
                status: 401,
                message: "invalid api key".to_string()
            }
        );
    }

    #[tokio::test]
    async fn reply_without_choices_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [],
                "usage": {"prompt_tokens": 5, "completion_tokens": 0, "total_tokens": 5}
            })))
            .mount(&server)
            .await;

        let err = gateway(&server, Duration::from_secs(5))
            .complete_once(params())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::Parse("response has no choices".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway(&server, Duration::from_secs(5))
            .complete_once(params())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = gateway(&server, Duration::from_millis(200))
            .complete_once(params())
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::Timeout);
    }

    #[tokio::test]
    async fn stalled_error_body_times_out() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            // Headers promise a body that never fully arrives.
            let _ = socket
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\npartial")
                .await;
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let gateway = OpenAiCompatibleGateway::new(ProviderSettings {
            api_key: "sk-test".to_string(),
            base_url: format!("http://{addr}"),
            timeout: Duration::from_millis(300),
        })
        .unwrap();

        let err = gateway.complete_once(params()).await.unwrap_err();

        assert_eq!(err, GatewayError::Timeout);
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_connection_error() {
        let gateway = OpenAiCompatibleGateway::new(ProviderSettings {
            api_key: "sk-test".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let err = gateway.complete_once(params()).await.unwrap_err();

        assert!(matches!(err, GatewayError::Connection(_)));
    }

    #[tokio::test]
    async fn complete_stream_yields_fragments() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"finish_reason\":null}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"He\"},\"finish_reason\":null}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"llo\"},\"finish_reason\":null}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let stream = gateway(&server, Duration::from_secs(5))
            .complete_stream(params())
            .await
            .unwrap();
        let fragments: Vec<_> = stream.collect().await;

        assert_eq!(fragments, vec![Ok("He".to_string()), Ok("llo".to_string())]);
    }

    #[tokio::test]
    async fn complete_stream_rejects_error_status_before_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let result = gateway(&server, Duration::from_secs(5))
            .complete_stream(params())
            .await;

        let Err(err) = result else {
            panic!("expected an error status to fail the open");
        };
        assert_eq!(
            err,
            GatewayError::Api {
                status: 503,
                message: "overloaded".to_string()
            }
        );
    }
}
