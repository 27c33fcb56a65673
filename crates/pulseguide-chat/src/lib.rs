//! Conversation layer: threads, prompt assembly, the chat completion seam, and
//! the orchestrator that enhances every completed assistant turn.

mod error;
pub mod message;
pub mod orchestrator;
pub mod prompt;

pub use error::ChatError;
pub use message::{ChatMessage, EmployeeProfile, Role, Thread, ThreadMessage};
pub use orchestrator::{ChatCompletion, ConversationOrchestrator};
pub use prompt::system_prompt;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::OpenAiClient;
