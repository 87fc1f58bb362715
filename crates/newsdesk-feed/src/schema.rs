//! Raw feed record shapes.
//!
//! Two mutually exclusive element shapes have been observed across feed
//! versions, and both can appear in the same daily file:
//!
//! - the CMS export (`<item type="text">` with nested
//!   `paper/editingInfo` and `paper/publishInfo` blocks), and
//! - the syndication export (`<article>` with flat `pageNumber` /
//!   `pubDate` / `link` fields).
//!
//! Both describe the same real-world thing — one published article — but
//! with different field names and different publish-date semantics, so they
//! are kept as distinct variants until normalization.

/// One raw element pulled from a daily feed.
#[derive(Debug, Clone)]
pub enum RawItem {
    Cms(CmsItem),
    Syndication(SyndicationItem),
}

/// `<item>` element fields from the CMS export.
#[derive(Debug, Clone, Default)]
pub struct CmsItem {
    /// The `type` attribute; anything other than `text` is not an article.
    pub item_type: String,
    pub nsid: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub time: String,
    pub content: String,
    /// `href` attribute of the `<url>` child.
    pub url: String,
    /// `name` attribute of the `<category>` child.
    pub category: String,
    /// `paper/editingInfo/paperNumber` text.
    pub paper_number_raw: String,
    /// `paper/editingInfo/position` text.
    pub position: String,
    /// `paper/editingInfo/paragraph` text.
    pub paragraph: String,
    /// `paper/publishInfo/date` text (`YYYYMMDD`).
    pub publish_date_raw: String,
}

/// `<article>` element fields from the syndication export.
#[derive(Debug, Clone, Default)]
pub struct SyndicationItem {
    pub title: String,
    pub writer: String,
    pub page_number_raw: String,
    /// Combined filing timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub pub_date_raw: String,
    pub link: String,
    pub content: String,
}

impl CmsItem {
    /// Printed page number; `0` (online-only) when absent or non-numeric.
    #[must_use]
    pub fn paper_number(&self) -> i64 {
        parse_page(&self.paper_number_raw)
    }

    /// An item is a text article only when the CMS flags it as such.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.item_type == "text"
    }

    /// The layout desk marks lead stories by putting "TOP" in either
    /// placement field.
    #[must_use]
    pub fn is_top_placement(&self) -> bool {
        contains_top(&self.position) || contains_top(&self.paragraph)
    }
}

impl SyndicationItem {
    /// Printed page number; `0` (online-only) when absent or non-numeric.
    #[must_use]
    pub fn page_number(&self) -> i64 {
        parse_page(&self.page_number_raw)
    }

    /// This shape carries no layout annotation; by convention page-1 items
    /// are treated as top placement.
    #[must_use]
    pub fn is_top_placement(&self) -> bool {
        self.page_number() == 1
    }

    /// The permanent article ID is the trailing path segment of the link,
    /// with any query string or fragment dropped.
    #[must_use]
    pub fn source_id(&self) -> String {
        let path = self
            .link
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        path.rsplit('/').next().unwrap_or_default().to_string()
    }
}

/// Parses a printed page number: a positive integer, or `0` for anything
/// absent, non-numeric, or out of range.
fn parse_page(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        trimmed.parse::<i64>().unwrap_or(0)
    } else {
        0
    }
}

fn contains_top(s: &str) -> bool {
    s.to_uppercase().contains("TOP")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parse_accepts_digits_only() {
        assert_eq!(parse_page("3"), 3);
        assert_eq!(parse_page(" 12 "), 12);
        assert_eq!(parse_page(""), 0);
        assert_eq!(parse_page("A3"), 0);
        assert_eq!(parse_page("-1"), 0);
    }

    #[test]
    fn cms_top_placement_checks_both_fields_case_insensitively() {
        let mut item = CmsItem {
            position: "top".to_string(),
            ..CmsItem::default()
        };
        assert!(item.is_top_placement());

        item.position = String::new();
        item.paragraph = "5단 TOP".to_string();
        assert!(item.is_top_placement());

        item.paragraph = "5단".to_string();
        assert!(!item.is_top_placement());
    }

    #[test]
    fn syndication_top_placement_is_front_page_only() {
        let mut item = SyndicationItem {
            page_number_raw: "1".to_string(),
            ..SyndicationItem::default()
        };
        assert!(item.is_top_placement());
        item.page_number_raw = "3".to_string();
        assert!(!item.is_top_placement());
    }

    #[test]
    fn syndication_source_id_is_trailing_path_segment() {
        let item = SyndicationItem {
            link: "https://news.example.com/NewsView/29XKCDQ8FE".to_string(),
            ..SyndicationItem::default()
        };
        assert_eq!(item.source_id(), "29XKCDQ8FE");
    }

    #[test]
    fn syndication_source_id_strips_query_and_trailing_slash() {
        let item = SyndicationItem {
            link: "https://news.example.com/NewsView/29XKCDQ8FE/?ref=home".to_string(),
            ..SyndicationItem::default()
        };
        assert_eq!(item.source_id(), "29XKCDQ8FE");
    }

    #[test]
    fn syndication_source_id_empty_link() {
        let item = SyndicationItem::default();
        assert_eq!(item.source_id(), "");
    }
}
