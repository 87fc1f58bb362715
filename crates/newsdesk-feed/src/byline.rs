//! Byline parsing: turns a raw author string into the ordered list of
//! canonical reporter names it credits.
//!
//! Feed bylines are free text assembled by hand on the copy desk. The same
//! field can carry dateline prefixes (`워싱턴=이태규`), honorifics
//! (`기자`, `특파원`), contact parentheticals, and several joint-byline
//! delimiters, often in combination. Parsing is a fixed transformation
//! pipeline; anything that survives it as a 2–4 syllable Hangul token is a
//! reporter name.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use newsdesk_core::AttributionConfig;

/// `장소=` dateline prefixes, stripped wherever they occur. A byline can
/// carry more than one (`베이징=김철수·워싱턴=이태규`).
static LOCATION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Za-z가-힣]+\s*=\s*").expect("valid regex"));

/// Parenthetical spans — email addresses, photo and video credits.
static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// Bare email addresses that appear outside parentheses.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});

/// Joint-byline delimiters: middle dots, comma, slash, and the connectives
/// `와`/`및` when they stand alone between names.
static DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[·ㆍ,/]|\s와\s|\s및\s").expect("valid regex"));

/// A canonical reporter name: a leading run of 2–4 Hangul syllables.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[가-힣]{2,4}").expect("valid regex"));

/// Byline parser compiled from one set of attribution rules.
///
/// The honorific list and place-name guard are configuration
/// ([`AttributionConfig`]) so the copy desk can extend them without a
/// rebuild; the structural patterns above are fixed.
pub struct BylineParser {
    honorific_re: Regex,
    place_names: HashSet<String>,
}

impl BylineParser {
    #[must_use]
    pub fn new(rules: &AttributionConfig) -> Self {
        // Longest-first alternation so compound titles (선임기자) are
        // removed whole instead of leaving their prefix behind as a
        // name-shaped token.
        let mut honorifics: Vec<&str> = rules
            .honorifics
            .iter()
            .map(String::as_str)
            .filter(|h| !h.is_empty())
            .collect();
        honorifics.sort_by_key(|h| std::cmp::Reverse(h.chars().count()));
        let alternation = honorifics
            .iter()
            .map(|h| regex::escape(h))
            .collect::<Vec<_>>()
            .join("|");
        let honorific_re =
            Regex::new(&format!(r"\s*(?:{alternation})\s*")).expect("valid honorific regex");

        Self {
            honorific_re,
            place_names: rules.place_names.iter().cloned().collect(),
        }
    }

    /// Parses a raw byline into reporter names, in their original order.
    ///
    /// Never fails: input that yields no valid name returns an empty vec,
    /// and callers must skip attribution for that record entirely. Repeated
    /// names are kept — deduplication happens at the article level, not
    /// here.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Vec<String> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        let s = LOCATION_PREFIX_RE.replace_all(raw, "");
        let s = PAREN_RE.replace_all(&s, "");
        let s = EMAIL_RE.replace_all(&s, "");
        let s = self.honorific_re.replace_all(&s, " ");

        DELIMITER_RE
            .split(&s)
            .filter_map(|token| {
                let token = token.trim();
                if token.is_empty() || self.place_names.contains(token) {
                    return None;
                }
                NAME_RE.find(token).map(|m| m.as_str().to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> BylineParser {
        BylineParser::new(&AttributionConfig::default())
    }

    // -----------------------------------------------------------------------
    // Single names
    // -----------------------------------------------------------------------

    #[test]
    fn plain_name_with_honorific() {
        assert_eq!(parser().parse("조양준 기자"), vec!["조양준"]);
    }

    #[test]
    fn name_with_email_parenthetical() {
        assert_eq!(
            parser().parse("조양준 기자(mryesandno@sedaily.com)"),
            vec!["조양준"]
        );
    }

    #[test]
    fn dateline_prefix_is_stripped() {
        assert_eq!(parser().parse("워싱턴=이태규 특파원"), vec!["이태규"]);
    }

    #[test]
    fn bare_email_outside_parens_is_removed() {
        assert_eq!(
            parser().parse("홍길동 기자 hong@sedaily.com"),
            vec!["홍길동"]
        );
    }

    #[test]
    fn compound_honorific_removed_whole() {
        // 선임기자 must not degrade to the name-shaped token 선임.
        assert_eq!(parser().parse("김상훈 선임기자"), vec!["김상훈"]);
    }

    #[test]
    fn honorific_attached_without_space() {
        assert_eq!(parser().parse("홍길동기자"), vec!["홍길동"]);
    }

    // -----------------------------------------------------------------------
    // Joint bylines
    // -----------------------------------------------------------------------

    #[test]
    fn middle_dot_joint_byline_preserves_order() {
        assert_eq!(parser().parse("홍길동·김철수 기자"), vec!["홍길동", "김철수"]);
    }

    #[test]
    fn comma_joint_byline() {
        assert_eq!(
            parser().parse("홍길동, 김철수 기자"),
            vec!["홍길동", "김철수"]
        );
    }

    #[test]
    fn slash_joint_byline() {
        assert_eq!(parser().parse("홍길동/김철수"), vec!["홍길동", "김철수"]);
    }

    #[test]
    fn connective_and_joint_byline() {
        assert_eq!(
            parser().parse("홍길동 와 김철수 기자"),
            vec!["홍길동", "김철수"]
        );
        assert_eq!(
            parser().parse("홍길동 및 김철수 기자"),
            vec!["홍길동", "김철수"]
        );
    }

    #[test]
    fn dateline_with_joint_byline() {
        assert_eq!(
            parser().parse("워싱턴=이태규·김민수 특파원"),
            vec!["이태규", "김민수"]
        );
    }

    #[test]
    fn multiple_dateline_prefixes() {
        assert_eq!(
            parser().parse("베이징=김철수·워싱턴=이태규 특파원"),
            vec!["김철수", "이태규"]
        );
    }

    #[test]
    fn each_name_keeps_its_own_honorific_stripped() {
        assert_eq!(
            parser().parse("홍길동 기자·김철수 특파원"),
            vec!["홍길동", "김철수"]
        );
    }

    #[test]
    fn repeated_name_is_not_deduplicated() {
        assert_eq!(
            parser().parse("홍길동·홍길동 기자"),
            vec!["홍길동", "홍길동"]
        );
    }

    // -----------------------------------------------------------------------
    // Rejections
    // -----------------------------------------------------------------------

    #[test]
    fn empty_input_yields_no_names() {
        assert!(parser().parse("").is_empty());
        assert!(parser().parse("   ").is_empty());
    }

    #[test]
    fn non_hangul_input_yields_no_names() {
        assert!(parser().parse("AP / Reuters").is_empty());
        assert!(parser().parse("123").is_empty());
    }

    #[test]
    fn lone_honorific_yields_no_names() {
        assert!(parser().parse("기자").is_empty());
    }

    #[test]
    fn place_name_token_is_rejected() {
        // A mid-string place token that survives prefix stripping must not
        // be credited as a reporter.
        assert_eq!(parser().parse("뉴욕·홍길동 기자"), vec!["홍길동"]);
    }

    #[test]
    fn single_syllable_token_is_rejected() {
        assert!(parser().parse("김 기자").is_empty());
    }

    #[test]
    fn long_token_is_clipped_to_four_syllables() {
        assert_eq!(parser().parse("남궁민수씨"), vec!["남궁민수"]);
    }
}
