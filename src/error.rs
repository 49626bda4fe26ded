use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    /// Any failure talking to the hosting API. `status` is `None` when the
    /// request never produced an HTTP response.
    #[error("{}", remote_message(.status, .message))]
    RemoteApi {
        status: Option<u16>,
        message: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("MCP error: {0}")]
    Mcp(String),
}

fn remote_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Remote API error (HTTP {}): {}", code, message),
        None => format!("Remote API error: {}", message),
    }
}

impl ScoutError {
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        ScoutError::RemoteApi {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a remote failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScoutError::RemoteApi { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        ScoutError::RemoteApi {
            status,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        ScoutError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
