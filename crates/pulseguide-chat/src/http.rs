//! OpenAI-compatible chat completion client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ChatError;
use crate::message::ChatMessage;
use crate::orchestrator::ChatCompletion;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    fn into_reply(self) -> Result<String, ChatError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ChatError::EmptyReply)
    }
}

impl OpenAiClient {
    /// `base_url` is like `https://api.openai.com`; a trailing slash is dropped.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ChatError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ChatError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let url = self.endpoint();
        let body = CompletionRequest {
            model: &self.model,
            messages,
        };

        info!(url = %url, model = %self.model, messages = messages.len(), "requesting chat completion");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&text)?;
        let reply = parsed.into_reply()?;
        info!(chars = reply.chars().count(), "completion received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_json_shape() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let req = CompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn reply_from_first_choice() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Your deductible is $1,500."}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_reply().unwrap(), "Your deductible is $1,500.");
    }

    #[test]
    fn missing_or_null_content_is_empty_reply() {
        for json in [
            r#"{"choices": []}"#,
            r#"{}"#,
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
            r#"{"choices": [{"message": {"role": "assistant", "content": "  "}}]}"#,
        ] {
            let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
            assert!(matches!(parsed.into_reply(), Err(ChatError::EmptyReply)), "{json}");
        }
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OpenAiClient::new("http://localhost:8080/", "sk-test", "gpt-3.5-turbo").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn blank_key_rejected() {
        assert!(matches!(
            OpenAiClient::new("https://api.openai.com", " ", "gpt-3.5-turbo"),
            Err(ChatError::MissingApiKey)
        ));
    }
}
