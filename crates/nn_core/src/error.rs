use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Coarse classification used by the loaders when deciding how to degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, timeout, or a non-2xx status.
    Transport,
    /// The body did not have the expected shape.
    MalformedResponse,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(e) if e.is_decode() => ErrorKind::MalformedResponse,
            Error::Http(_) | Error::Status { .. } => ErrorKind::Transport,
            Error::MalformedResponse(_) | Error::Serialization(_) => ErrorKind::MalformedResponse,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let status = Error::Status { status: 500, url: "http://localhost/api/news".to_string() };
        assert_eq!(status.kind(), ErrorKind::Transport);
        assert_eq!(status.to_string(), "Request to http://localhost/api/news failed with status 500");

        let malformed = Error::MalformedResponse("expected an array".to_string());
        assert_eq!(malformed.kind(), ErrorKind::MalformedResponse);

        let json = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        assert_eq!(Error::from(json).kind(), ErrorKind::MalformedResponse);

        assert_eq!(Error::Config("bad".to_string()).kind(), ErrorKind::Other);
    }
}
