//! Turn orchestration: prompt the completion API with the full thread, then
//! enhance the finished reply exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use pulseguide_ai::{EnhancedResult, ResponseEnhancer, Retriever};
use tracing::{info, warn};

use crate::ChatError;
use crate::message::{ChatMessage, Thread};
use crate::prompt::system_prompt;

/// External chat completion service: messages in, reply text out.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

pub struct ConversationOrchestrator<C> {
    completion: C,
    context: Arc<dyn Retriever>,
    enhancer: Arc<ResponseEnhancer>,
}

impl<C: ChatCompletion> ConversationOrchestrator<C> {
    /// `context` supplies policy text for the system prompt; it is usually the
    /// same retriever the enhancer cites from.
    pub fn new(completion: C, context: Arc<dyn Retriever>, enhancer: Arc<ResponseEnhancer>) -> Self {
        Self {
            completion,
            context,
            enhancer,
        }
    }

    /// Send `text` on `thread` and return the enhanced reply.
    ///
    /// On a completion failure the user message is removed again and nothing
    /// is enhanced or audited, since no assistant turn completed.
    pub async fn send(&self, thread: &mut Thread, text: &str) -> Result<EnhancedResult, ChatError> {
        let plan = thread.plan();
        let context = self.context.search(text, plan).unwrap_or_else(|e| {
            warn!(error = %e, "prompt context lookup failed");
            Vec::new()
        });

        thread.push_user(text);
        let mut messages = vec![ChatMessage::system(system_prompt(
            thread.profile.as_ref(),
            &context,
        ))];
        messages.extend(thread.history());

        info!(
            thread = %thread.id,
            history = messages.len() - 1,
            context_docs = context.len(),
            "requesting completion"
        );
        let reply = match self.completion.complete(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                thread.pop_unanswered_user();
                return Err(e);
            }
        };

        let enhanced = self.enhancer.enhance_for_plan(text, &reply, plan);
        thread.push_assistant(enhanced.clone());
        Ok(enhanced)
    }
}
