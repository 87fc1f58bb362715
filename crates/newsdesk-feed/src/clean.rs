//! Text cleanup for titles and body copy: entity decoding, tag stripping,
//! whitespace normalization, and character counting.

use quick_xml::escape::unescape;

/// Decodes XML/HTML character references (`&amp;`, `&#8220;`, ...).
///
/// Unknown entities leave the input unchanged rather than failing — feed
/// bodies occasionally carry malformed references and the surrounding text
/// is still worth keeping.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    match unescape(s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s.to_string(),
    }
}

/// Removes markup tags, keeping only text content.
#[must_use]
pub fn strip_tags(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}

/// Collapses all runs of whitespace to single spaces and trims the ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full body cleanup: decode entities, strip tags, collapse whitespace.
#[must_use]
pub fn clean_body(raw: &str) -> String {
    collapse_whitespace(&strip_tags(&decode_entities(raw)))
}

/// Title cleanup: decode entities and normalize quote references that
/// survive a first decoding pass (double-encoded titles are common in the
/// older feed exports).
#[must_use]
pub fn clean_title(raw: &str) -> String {
    decode_entities(raw.trim()).replace("&quot;", "\"")
}

/// Number of non-whitespace characters — the measure used for article
/// length throughout the system.
#[must_use]
pub fn char_count(s: &str) -> i64 {
    let count = s.chars().filter(|c| !c.is_whitespace()).count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Truncates to at most `max` characters (not bytes — bodies are Korean).
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_entities_handles_standard_references() {
        assert_eq!(decode_entities("A &amp; B &lt;C&gt;"), "A & B <C>");
    }

    #[test]
    fn decode_entities_handles_numeric_references() {
        assert_eq!(decode_entities("&#54620;&#44544;"), "한글");
    }

    #[test]
    fn decode_entities_leaves_broken_input_intact() {
        assert_eq!(decode_entities("broken &unknownent; text"), "broken &unknownent; text");
    }

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(strip_tags("<p>본문 <b>강조</b></p>"), "본문 강조");
    }

    #[test]
    fn clean_body_decodes_then_strips_then_collapses() {
        let raw = "&lt;p&gt;첫  문장.&lt;/p&gt;\n&lt;p&gt;둘째 문장.&lt;/p&gt;";
        assert_eq!(clean_body(raw), "첫 문장. 둘째 문장.");
    }

    #[test]
    fn clean_title_normalizes_escaped_quotes() {
        assert_eq!(
            clean_title("  &quot;금리 동결&quot; 선언  "),
            "\"금리 동결\" 선언"
        );
    }

    #[test]
    fn char_count_excludes_all_whitespace() {
        assert_eq!(char_count("가나 다\t라\n마"), 5);
    }

    #[test]
    fn char_count_empty_is_zero() {
        assert_eq!(char_count(""), 0);
    }

    #[test]
    fn truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("가나다라마", 3), "가나다");
        assert_eq!(truncate_chars("ab", 5), "ab");
    }
}
