use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("completion returned no reply")]
    EmptyReply,

    #[error("missing API key; set OPENAI_API_KEY")]
    MissingApiKey,
}
