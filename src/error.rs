use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("required element `{0}` not found")]
    MissingElement(&'static str),
    #[error("element `{0}` is not the expected kind")]
    UnexpectedElement(&'static str),
    #[error("no global window/document")]
    NoDocument,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        SiteError::Js(message)
    }
}

pub type SiteResult<T> = Result<T, SiteError>;
