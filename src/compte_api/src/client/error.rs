use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network failure, timeout or unreadable HTTP body
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl From<quick_xml::Error> for ServiceError {
    fn from(err: quick_xml::Error) -> Self {
        ServiceError::MalformedResponse(err.to_string())
    }
}
