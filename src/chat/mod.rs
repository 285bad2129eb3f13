//! Chat relay between the user and the assistant endpoint.
//!
//! Each send is a single best-effort round trip; failures turn into a fixed
//! assistant reply instead of an error.

use crate::client::SalaryClient;
use crate::models::ChatMessage;
use tracing::{debug, warn};

/// Assistant reply used when the endpoint cannot be reached or answers badly.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your request. Please try again.";

/// What happened to a message handed to [`ChatRelay::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing sent.
    Ignored,
    /// The assistant answered.
    Answered,
    /// The request failed and the fallback reply was logged.
    Failed,
}

/// Ordered chat log plus the client used to reach the assistant.
pub struct ChatRelay {
    client: SalaryClient,
    log: Vec<ChatMessage>,
}

impl ChatRelay {
    pub fn new(client: SalaryClient) -> Self {
        Self {
            client,
            log: Vec::new(),
        }
    }

    /// Entries in the order they were appended.
    pub fn log(&self) -> &[ChatMessage] {
        &self.log
    }

    /// Relay one message.
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        let message = input.trim();
        if message.is_empty() {
            debug!("Ignoring blank chat message");
            return SendOutcome::Ignored;
        }

        self.log.push(ChatMessage::user(message));

        match self.client.ask(message).await {
            Ok(reply) => {
                self.log.push(ChatMessage::ai(reply.response));
                SendOutcome::Answered
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.log.push(ChatMessage::ai(FALLBACK_REPLY));
                SendOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::models::Sender;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn relay_for(base_url: String) -> ChatRelay {
        let client = SalaryClient::new(ClientConfig {
            base_url,
            timeout_seconds: 5,
        })
        .unwrap();
        ChatRelay::new(client)
    }

    #[tokio::test]
    async fn test_blank_input_is_a_no_op() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "x" })))
            .expect(0)
            .mount(&server)
            .await;

        let mut relay = relay_for(server.uri());
        assert_eq!(relay.send("").await, SendOutcome::Ignored);
        assert_eq!(relay.send("   \t\n").await, SendOutcome::Ignored);
        assert!(relay.log().is_empty());
    }

    #[tokio::test]
    async fn test_successful_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": "ML Engineer is the most common title." })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut relay = relay_for(server.uri());
        assert_eq!(relay.send("  most common title?  ").await, SendOutcome::Answered);

        let log = relay.log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].sender, Sender::User);
        assert_eq!(log[0].text, "most common title?");
        assert_eq!(log[1].sender, Sender::Ai);
        assert_eq!(log[1].text, "ML Engineer is the most common title.");
    }

    #[tokio::test]
    async fn test_failure_appends_single_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut relay = relay_for(server.uri());
        assert_eq!(relay.send("hello").await, SendOutcome::Failed);

        let log = relay.log();
        assert_eq!(log.len(), 2);
        let ai_entries: Vec<_> = log.iter().filter(|m| m.sender == Sender::Ai).collect();
        assert_eq!(ai_entries.len(), 1);
        assert_eq!(ai_entries[0].text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_uses_fallback() {
        // Port 9 (discard) is not expected to run an HTTP server
        let mut relay = relay_for("http://127.0.0.1:9".to_string());
        assert_eq!(relay.send("hello").await, SendOutcome::Failed);
        assert_eq!(relay.log().last().map(|m| m.text.as_str()), Some(FALLBACK_REPLY));
    }

    #[tokio::test]
    async fn test_log_keeps_insertion_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
            .mount(&server)
            .await;

        let mut relay = relay_for(server.uri());
        relay.send("first").await;
        relay.send("first").await;

        let texts: Vec<&str> = relay.log().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "ok", "first", "ok"]);
    }
}
