//! Attribution rules: the honorific and place-name lists used by the byline
//! parser, plus the URL marker used for article deduplication.
//!
//! Ships with compiled-in defaults covering everything observed in the feed
//! history; a YAML file can override the lists without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Role/honorific suffixes stripped from byline strings.
const DEFAULT_HONORIFICS: &[&str] = &[
    "기자",
    "특파원",
    "선임기자",
    "수석기자",
    "차장",
    "부장",
    "국장",
    "위원",
    "대기자",
    "논설위원",
    "객원기자",
    "통신원",
];

/// Place names that must never be mistaken for reporter names. These show up
/// both as `place=name` dateline prefixes and as bare tokens mid-byline.
const DEFAULT_PLACE_NAMES: &[&str] = &[
    "베이징",
    "뉴욕",
    "워싱턴",
    "도쿄",
    "상하이",
    "라스베이거스",
    "홍콩",
    "런던",
    "파리",
    "서울",
    "부산",
    "대구",
    "광주",
    "대전",
    "인천",
    "세종",
];

/// Path segment that precedes the permanent article ID in CMS links.
const DEFAULT_ARTICLE_ID_MARKER: &str = "/NewsView/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionConfig {
    pub honorifics: Vec<String>,
    pub place_names: Vec<String>,
    pub article_id_marker: String,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            honorifics: DEFAULT_HONORIFICS.iter().map(ToString::to_string).collect(),
            place_names: DEFAULT_PLACE_NAMES
                .iter()
                .map(ToString::to_string)
                .collect(),
            article_id_marker: DEFAULT_ARTICLE_ID_MARKER.to_string(),
        }
    }
}

/// Load attribution rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_attribution(path: &Path) -> Result<AttributionConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules: AttributionConfig = serde_yaml::from_str(&content)?;
    validate_attribution(&rules)?;
    Ok(rules)
}

/// Load attribution rules from a YAML file, falling back to the compiled-in
/// defaults when the file does not exist.
///
/// # Errors
///
/// Returns `ConfigError` for any failure other than the file being absent.
pub fn load_attribution_or_default(path: &Path) -> Result<AttributionConfig, ConfigError> {
    match load_attribution(path) {
        Err(ConfigError::RulesFileIo { ref source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            Ok(AttributionConfig::default())
        }
        other => other,
    }
}

fn validate_attribution(rules: &AttributionConfig) -> Result<(), ConfigError> {
    if rules.honorifics.is_empty() {
        return Err(ConfigError::Validation(
            "attribution rules must list at least one honorific".to_string(),
        ));
    }
    if rules.honorifics.iter().any(|h| h.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "honorifics must be non-empty tokens".to_string(),
        ));
    }
    if rules.place_names.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "place names must be non-empty tokens".to_string(),
        ));
    }
    if !rules.article_id_marker.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "article_id_marker '{}' must be a URL path segment starting with '/'",
            rules.article_id_marker
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_known_honorifics_and_places() {
        let rules = AttributionConfig::default();
        assert!(rules.honorifics.iter().any(|h| h == "기자"));
        assert!(rules.honorifics.iter().any(|h| h == "특파원"));
        assert!(rules.place_names.iter().any(|p| p == "워싱턴"));
        assert_eq!(rules.article_id_marker, "/NewsView/");
    }

    #[test]
    fn yaml_round_trip_preserves_lists() {
        let rules = AttributionConfig::default();
        let yaml = serde_yaml::to_string(&rules).expect("serialize");
        let parsed: AttributionConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert_eq!(parsed.honorifics, rules.honorifics);
        assert_eq!(parsed.place_names, rules.place_names);
    }

    #[test]
    fn validation_rejects_empty_honorific_list() {
        let rules = AttributionConfig {
            honorifics: vec![],
            ..AttributionConfig::default()
        };
        let result = validate_attribution(&rules);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validation_rejects_marker_without_leading_slash() {
        let rules = AttributionConfig {
            article_id_marker: "NewsView/".to_string(),
            ..AttributionConfig::default()
        };
        let result = validate_attribution(&rules);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_or_default_falls_back_when_file_missing() {
        let rules =
            load_attribution_or_default(Path::new("/nonexistent/attribution.yaml")).expect("ok");
        assert_eq!(rules.article_id_marker, "/NewsView/");
    }
}
