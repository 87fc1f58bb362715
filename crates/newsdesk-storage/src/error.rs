use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid storage base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("listing response is not valid XML: {0}")]
    ListXml(#[from] quick_xml::Error),

    #[error("JSON serialization error for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON in stored object {key} does not parse: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
