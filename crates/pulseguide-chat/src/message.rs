//! Chat messages and conversation threads.

use pulseguide_ai::EnhancedResult;
use pulseguide_core::HealthPlan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Wire-level message sent to the completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The employee the assistant is speaking with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub name: String,
    pub plan: HealthPlan,
}

/// A stored message; assistant replies carry their enhancement.
#[derive(Debug, Clone)]
pub struct ThreadMessage {
    pub message: ChatMessage,
    pub enhancement: Option<EnhancedResult>,
}

/// One conversation with its full history.
#[derive(Debug, Clone)]
pub struct Thread {
    pub id: String,
    pub profile: Option<EmployeeProfile>,
    messages: Vec<ThreadMessage>,
}

impl Thread {
    pub fn new(id: impl Into<String>, profile: Option<EmployeeProfile>) -> Self {
        Self {
            id: id.into(),
            profile,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ThreadMessage] {
        &self.messages
    }

    /// Plan used to filter citations; `All` when no profile is set.
    pub fn plan(&self) -> HealthPlan {
        self.profile
            .as_ref()
            .map(|p| p.plan)
            .unwrap_or(HealthPlan::All)
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ThreadMessage {
            message: ChatMessage::user(content),
            enhancement: None,
        });
    }

    pub fn push_assistant(&mut self, enhancement: EnhancedResult) {
        self.messages.push(ThreadMessage {
            message: ChatMessage::assistant(enhancement.reply_text.clone()),
            enhancement: Some(enhancement),
        });
    }

    /// Drop the trailing user message, if it is the last one.
    pub(crate) fn pop_unanswered_user(&mut self) {
        if self
            .messages
            .last()
            .is_some_and(|m| m.message.role == Role::User)
        {
            self.messages.pop();
        }
    }

    /// History in wire form, oldest first.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(|m| m.message.clone()).collect()
    }
}
