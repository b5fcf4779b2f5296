use serde::Serialize;
use tracing::debug;

use super::{AssistantError, ChatClient, ChatMessage};

/// One question and the assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub question: String,
    pub reply: String,
}

/// Ordered conversation history, oldest first.
///
/// Owned by the caller; nothing in the crate keeps a global copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    exchanges: Vec<Exchange>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchanges in chronological order (report order).
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Exchanges most recent first (display order).
    pub fn latest_first(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Appends an already-answered exchange.
    pub fn push(&mut self, exchange: Exchange) {
        self.exchanges.push(exchange);
    }

    /// Asks `client` one question about the plant described by `brief`.
    ///
    /// Only the brief and the new question are sent; earlier exchanges are
    /// kept for display and the report. On failure the history is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::EmptyQuestion`] for a blank question, or
    /// whatever the client reports.
    pub fn ask<C: ChatClient + ?Sized>(
        &mut self,
        client: &C,
        brief: &str,
        question: &str,
    ) -> Result<&Exchange, AssistantError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let messages = [ChatMessage::system(brief), ChatMessage::user(question)];
        let reply = client.complete(&messages)?;
        debug!(
            question_chars = question.len(),
            reply_chars = reply.len(),
            "assistant replied"
        );

        let idx = self.exchanges.len();
        self.exchanges.push(Exchange {
            question: question.to_string(),
            reply,
        });
        Ok(&self.exchanges[idx])
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::assistant::Role;

    /// Replies with a fixed prefix plus the question and records every request.
    struct EchoClient {
        seen: RefCell<Vec<Vec<ChatMessage>>>,
    }

    impl EchoClient {
        fn new() -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatClient for EchoClient {
        fn complete(&self, messages: &[ChatMessage]) -> Result<String, AssistantError> {
            self.seen.borrow_mut().push(messages.to_vec());
            let question = messages.last().map(|m| m.content.as_str()).unwrap_or("");
            Ok(format!("echo: {question}"))
        }
    }

    struct DownClient;

    impl ChatClient for DownClient {
        fn complete(&self, _messages: &[ChatMessage]) -> Result<String, AssistantError> {
            Err(AssistantError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn ask_appends_exchange() {
        let client = EchoClient::new();
        let mut conv = Conversation::new();
        let ex = conv.ask(&client, "brief", "Which turbine?").unwrap();
        assert_eq!(ex.reply, "echo: Which turbine?");
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn ask_sends_brief_then_question() {
        let client = EchoClient::new();
        let mut conv = Conversation::new();
        conv.ask(&client, "plant brief", "  trimmed?  ").unwrap();

        let seen = client.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].role, Role::System);
        assert_eq!(seen[0][0].content, "plant brief");
        assert_eq!(seen[0][1].role, Role::User);
        assert_eq!(seen[0][1].content, "trimmed?");
    }

    #[test]
    fn blank_question_is_rejected_without_calling_client() {
        let client = EchoClient::new();
        let mut conv = Conversation::new();
        let err = conv.ask(&client, "brief", "   ").unwrap_err();
        assert!(matches!(err, AssistantError::EmptyQuestion));
        assert!(client.seen.borrow().is_empty());
        assert!(conv.is_empty());
    }

    #[test]
    fn failed_call_leaves_history_unchanged() {
        let mut conv = Conversation::new();
        conv.ask(&EchoClient::new(), "brief", "first").unwrap();
        let before = conv.clone();

        assert!(conv.ask(&DownClient, "brief", "second").is_err());
        assert_eq!(conv, before);
    }

    #[test]
    fn latest_first_reverses_chronology() {
        let client = EchoClient::new();
        let mut conv = Conversation::new();
        for q in ["one", "two", "three"] {
            conv.ask(&client, "brief", q).unwrap();
        }
        let chrono: Vec<&str> = conv.exchanges().iter().map(|e| e.question.as_str()).collect();
        let display: Vec<&str> = conv.latest_first().map(|e| e.question.as_str()).collect();
        assert_eq!(chrono, ["one", "two", "three"]);
        assert_eq!(display, ["three", "two", "one"]);
    }

    #[test]
    fn works_through_trait_object() {
        let client: Box<dyn ChatClient> = Box::new(EchoClient::new());
        let mut conv = Conversation::new();
        assert!(conv.ask(client.as_ref(), "brief", "q").is_ok());
    }
}
