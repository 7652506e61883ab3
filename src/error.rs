/// Error kinds for any-referrer
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("URL is empty")]
    EmptyUrl,

    #[error("no site at index {index} (registry holds {len})")]
    NoSuchSite { index: usize, len: usize },

    #[error("stored value under `{key}` is malformed: {reason}")]
    MalformedValue { key: String, reason: String },

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl Error {
    pub fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Error::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Dom(format!("{:?}", value))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
