//! HTTP client for the feed object store.
//!
//! The store is an S3-compatible bucket exposed over plain HTTP: daily feed
//! XML lives under a key prefix (`daily-xml/20260112.xml`), derived JSON
//! documents (`data.json`, `evaluations.json`) sit at the bucket root.

use std::sync::LazyLock;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;

use crate::error::StorageError;
use crate::retry::retry_with_backoff;

/// Feed object keys end in an 8-digit date: `daily-xml/20260112.xml`.
static FEED_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{8})\.xml$").expect("valid regex"));

/// HTTP client for the feed bucket.
///
/// All operations retry transient failures (network errors, 5xx) with
/// exponential backoff; 404s are surfaced as [`StorageError::NotFound`]
/// immediately.
pub struct FeedStore {
    client: Client,
    base_url: String,
    feed_prefix: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl FeedStore {
    /// Creates a `FeedStore` for the bucket at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`StorageError::Http`] if the underlying client cannot be built.
    pub fn new(
        base_url: &str,
        feed_prefix: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, StorageError> {
        reqwest::Url::parse(base_url).map_err(|e| StorageError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            feed_prefix: feed_prefix.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a `FeedStore` from the application config.
    ///
    /// # Errors
    ///
    /// Same as [`FeedStore::new`].
    pub fn from_app_config(config: &newsdesk_core::AppConfig) -> Result<Self, StorageError> {
        Self::new(
            &config.storage_base_url,
            &config.feed_prefix,
            config.storage_request_timeout_secs,
            config.storage_max_retries,
            config.storage_retry_backoff_base_secs,
        )
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Fetches one daily feed by its 8-digit date key.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when no feed exists for that date;
    /// [`StorageError::UnexpectedStatus`] / [`StorageError::Http`] otherwise.
    pub async fn get_feed(&self, date_key: &str) -> Result<String, StorageError> {
        let key = format!("{}{}.xml", self.feed_prefix, date_key);
        let url = self.object_url(&key);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let key = key.clone();
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(StorageError::NotFound { key });
                }
                if !status.is_success() {
                    return Err(StorageError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Lists available feed date keys, ascending.
    ///
    /// `date_prefix` narrows the listing (e.g. `"2026"` for one year's
    /// feeds); pass `""` for everything under the feed prefix.
    ///
    /// # Errors
    ///
    /// [`StorageError::ListXml`] when the listing body is not valid XML, or
    /// the usual transport errors.
    pub async fn list_feed_dates(&self, date_prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}{}", self.feed_prefix, date_prefix);
        let url = format!("{}/?list-type=2&prefix={}", self.base_url, prefix);

        let body = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(StorageError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await?;

        let mut dates = parse_listing_dates(&body)?;
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    /// Writes a JSON document to `key`, overwriting any prior content.
    ///
    /// The no-cache headers mirror what dashboard clients expect: a sync
    /// must be visible on the next page load.
    ///
    /// # Errors
    ///
    /// [`StorageError::Serialize`] for unserializable values, or transport
    /// errors.
    pub async fn put_json(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        let body =
            serde_json::to_string_pretty(value).map_err(|e| StorageError::Serialize {
                key: key.to_owned(),
                source: e,
            })?;
        let url = self.object_url(key);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = self
                    .client
                    .put(&url)
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        "application/json; charset=utf-8",
                    )
                    .header(
                        reqwest::header::CACHE_CONTROL,
                        "no-cache, no-store, must-revalidate",
                    )
                    .body(body)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(StorageError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(())
            }
        })
        .await
    }

    /// Merges `updates` into the JSON object stored at `key`, top-level key
    /// by top-level key, and writes the result back. A missing object is
    /// treated as empty. Returns the number of keys merged in.
    ///
    /// # Errors
    ///
    /// [`StorageError::Deserialize`] when the stored object is not a JSON
    /// document, plus the usual transport errors.
    pub async fn merge_json(
        &self,
        key: &str,
        updates: serde_json::Map<String, serde_json::Value>,
    ) -> Result<usize, StorageError> {
        let existing = match self.get_json(key).await {
            Ok(value) => value,
            Err(StorageError::NotFound { .. }) => serde_json::Value::Object(serde_json::Map::new()),
            Err(e) => return Err(e),
        };

        let mut merged = match existing {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(StorageError::Deserialize {
                    key: key.to_owned(),
                    source: serde_json::Error::io(std::io::Error::other(
                        "stored object is not a JSON document",
                    )),
                })
            }
        };

        let count = updates.len();
        for (k, v) in updates {
            merged.insert(k, v);
        }

        self.put_json(key, &serde_json::Value::Object(merged)).await?;
        Ok(count)
    }

    /// Fetches and parses a JSON object.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when absent, [`StorageError::Deserialize`]
    /// when the body does not parse, plus the usual transport errors.
    pub async fn get_json(&self, key: &str) -> Result<serde_json::Value, StorageError> {
        let url = self.object_url(key);

        let body = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let key = key.to_owned();
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(StorageError::NotFound { key });
                }
                if !status.is_success() {
                    return Err(StorageError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await?;

        serde_json::from_str(&body).map_err(|e| StorageError::Deserialize {
            key: key.to_owned(),
            source: e,
        })
    }
}

/// Pulls feed date keys out of an S3-style `ListBucketResult` body: every
/// `<Key>` whose value ends in `<8 digits>.xml`.
fn parse_listing_dates(xml: &str) -> Result<Vec<String>, StorageError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut dates = Vec::new();
    let mut in_key = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                in_key = e.name().as_ref() == b"Key";
            }
            Ok(Event::End(_)) => {
                in_key = false;
            }
            Ok(Event::Text(e)) => {
                if in_key {
                    let key = e.unescape().unwrap_or_default();
                    if let Some(caps) = FEED_KEY_RE.captures(&key) {
                        dates.push(caps[1].to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(StorageError::ListXml(e)),
            _ => {}
        }
    }

    Ok(dates)
}

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn extracts_date_keys_from_listing() {
        let xml = r#"<?xml version="1.0"?>
<ListBucketResult>
  <Contents><Key>daily-xml/20260112.xml</Key></Contents>
  <Contents><Key>daily-xml/20260113.xml</Key></Contents>
  <Contents><Key>daily-xml/notes.txt</Key></Contents>
</ListBucketResult>"#;
        let dates = parse_listing_dates(xml).expect("parses");
        assert_eq!(dates, vec!["20260112", "20260113"]);
    }

    #[test]
    fn empty_listing_yields_no_dates() {
        let xml = r"<ListBucketResult></ListBucketResult>";
        assert!(parse_listing_dates(xml).expect("parses").is_empty());
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
