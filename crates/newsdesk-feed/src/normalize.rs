//! Feed normalization: walks one daily XML feed and produces
//! [`NormalizedArticle`] records, one per reporter credited on each
//! qualifying item.
//!
//! Both raw element shapes ([`crate::schema`]) are detected per element, so
//! a feed that mixes them still parses. Failures are isolated per item: a
//! bad attribute or unusable sub-structure skips that item and bumps a
//! counter; only document-level XML breakage fails the whole feed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use newsdesk_core::NormalizedArticle;

use crate::byline::BylineParser;
use crate::clean::{char_count, clean_body, clean_title, truncate_chars};
use crate::error::FeedError;
use crate::pubdate::{cms_print_date, date_key_to_iso, syndication_print_date};
use crate::schema::{CmsItem, RawItem, SyndicationItem};

/// Body preview length stored alongside the full character count.
const CONTENT_PREVIEW_CHARS: usize = 500;

/// Outcome of normalizing one feed.
///
/// The drop counters exist so callers can report what a sync actually did;
/// none of them is an error condition.
#[derive(Debug, Default)]
pub struct FeedParse {
    pub articles: Vec<NormalizedArticle>,
    /// Raw `<item>`/`<article>` elements encountered.
    pub items_seen: usize,
    /// Items skipped because their own structure could not be read.
    pub items_skipped: usize,
    /// CMS items flagged as something other than a text article.
    pub dropped_non_text: usize,
    /// Items with no print placement (`paper_number < 1`).
    pub dropped_online_only: usize,
    /// Items whose byline yielded no reporter name.
    pub dropped_no_byline: usize,
}

/// Parses a daily feed into normalized article records.
///
/// `feed_date_key` is the 8-digit date key of the feed file itself, used as
/// the publish-date fallback for items that carry no usable date of their
/// own.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] only for document-level XML breakage;
/// individual malformed items are skipped and counted instead.
pub fn normalize_feed(
    xml: &str,
    feed_date_key: &str,
    parser: &BylineParser,
) -> Result<FeedParse, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut out = FeedParse::default();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<RawItem> = None;
    let mut poisoned = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                match name.as_str() {
                    "item" => {
                        let mut item = CmsItem::default();
                        match attr_value(&e, "type") {
                            Ok(value) => item.item_type = value.unwrap_or_default(),
                            Err(()) => poisoned = true,
                        }
                        current = Some(RawItem::Cms(item));
                    }
                    "article" => {
                        current = Some(RawItem::Syndication(SyndicationItem::default()));
                    }
                    _ => {
                        if let Some(RawItem::Cms(item)) = current.as_mut() {
                            if let Err(()) = capture_cms_attrs(item, &name, &e) {
                                poisoned = true;
                            }
                        }
                    }
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if let Some(RawItem::Cms(item)) = current.as_mut() {
                    if let Err(()) = capture_cms_attrs(item, &name, &e) {
                        poisoned = true;
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map(std::borrow::Cow::into_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned());
                capture_text(current.as_mut(), &path, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                capture_text(current.as_mut(), &path, &text);
            }
            Ok(Event::End(e)) => {
                let name = element_name_end(e.name().as_ref());
                if path.last().map(String::as_str) == Some(name.as_str()) {
                    path.pop();
                }
                if name == "item" || name == "article" {
                    if let Some(item) = current.take() {
                        out.items_seen += 1;
                        if poisoned {
                            out.items_skipped += 1;
                            tracing::warn!(
                                feed = feed_date_key,
                                "skipping malformed feed item"
                            );
                        } else {
                            emit_item(&item, feed_date_key, parser, &mut out);
                        }
                    }
                    poisoned = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(out)
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn element_name_end(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Reads one attribute as decoded text. `Err(())` marks the item malformed.
fn attr_value(e: &BytesStart, name: &str) -> Result<Option<String>, ()> {
    match e.try_get_attribute(name) {
        Ok(Some(attr)) => {
            let raw = String::from_utf8_lossy(&attr.value).into_owned();
            Ok(Some(crate::clean::decode_entities(&raw)))
        }
        Ok(None) => Ok(None),
        Err(_) => Err(()),
    }
}

/// CMS items carry two attribute-valued children: `<url href>` and
/// `<category name>`.
fn capture_cms_attrs(item: &mut CmsItem, name: &str, e: &BytesStart) -> Result<(), ()> {
    match name {
        "url" => {
            if let Some(href) = attr_value(e, "href")? {
                item.url = href;
            }
        }
        "category" => {
            if let Some(cat) = attr_value(e, "name")? {
                item.category = cat;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Routes element text into the right raw field, based on the element path
/// relative to the enclosing `item`/`article`.
fn capture_text(current: Option<&mut RawItem>, path: &[String], text: &str) {
    let Some(current) = current else { return };
    let Some(rel) = rel_path(path) else { return };

    match current {
        RawItem::Cms(item) => {
            let target = match rel.as_slice() {
                ["nsid"] => &mut item.nsid,
                ["title"] => &mut item.title,
                ["author"] => &mut item.author,
                ["date"] => &mut item.date,
                ["time"] => &mut item.time,
                ["content"] => &mut item.content,
                ["paper", "editingInfo", "paperNumber"] => &mut item.paper_number_raw,
                ["paper", "editingInfo", "position"] => &mut item.position,
                ["paper", "editingInfo", "paragraph"] => &mut item.paragraph,
                ["paper", "publishInfo", "date"] => &mut item.publish_date_raw,
                _ => return,
            };
            target.push_str(text);
        }
        RawItem::Syndication(item) => {
            let target = match rel.as_slice() {
                ["title"] => &mut item.title,
                ["writer"] => &mut item.writer,
                ["pageNumber"] => &mut item.page_number_raw,
                ["pubDate"] => &mut item.pub_date_raw,
                ["link"] => &mut item.link,
                ["content"] => &mut item.content,
                _ => return,
            };
            target.push_str(text);
        }
    }
}

/// Element path inside the current item, as string slices.
fn rel_path(path: &[String]) -> Option<Vec<&str>> {
    let idx = path
        .iter()
        .rposition(|p| p == "item" || p == "article")?;
    let rel: Vec<&str> = path[idx + 1..].iter().map(String::as_str).collect();
    if rel.is_empty() || rel.len() > 3 {
        return None;
    }
    Some(rel)
}

/// Applies admission rules and fans one raw item out into per-reporter
/// normalized records.
fn emit_item(item: &RawItem, feed_date_key: &str, parser: &BylineParser, out: &mut FeedParse) {
    match item {
        RawItem::Cms(item) => {
            if !item.is_text() {
                out.dropped_non_text += 1;
                return;
            }
            let paper_number = item.paper_number();
            if paper_number < 1 {
                out.dropped_online_only += 1;
                return;
            }

            let names = parser.parse(&item.author);
            if names.is_empty() {
                out.dropped_no_byline += 1;
                return;
            }

            let body = clean_body(&item.content);
            let count = char_count(&body);
            let title = clean_title(&item.title);
            let publish_date = cms_print_date(&item.publish_date_raw, feed_date_key);

            for name in names {
                out.articles.push(NormalizedArticle {
                    source_id: item.nsid.trim().to_string(),
                    title: title.clone(),
                    raw_author: item.author.clone(),
                    reporter_name: name,
                    publish_date: publish_date.clone(),
                    publish_time: item.time.trim().to_string(),
                    content: truncate_chars(&body, CONTENT_PREVIEW_CHARS),
                    char_count: count,
                    url: item.url.clone(),
                    paper_number,
                    paper_position: item.position.trim().to_string(),
                    paper_paragraph: item.paragraph.trim().to_string(),
                    is_top_placement: item.is_top_placement(),
                    category: item.category.clone(),
                });
            }
        }
        RawItem::Syndication(item) => {
            let paper_number = item.page_number();
            if paper_number < 1 {
                out.dropped_online_only += 1;
                return;
            }

            let names = parser.parse(&item.writer);
            if names.is_empty() {
                out.dropped_no_byline += 1;
                return;
            }

            let body = clean_body(&item.content);
            let count = char_count(&body);
            let title = clean_title(&item.title);
            let (publish_date, publish_time) = syndication_print_date(&item.pub_date_raw)
                .unwrap_or_else(|| {
                    (
                        date_key_to_iso(feed_date_key)
                            .unwrap_or_else(|| feed_date_key.to_string()),
                        String::new(),
                    )
                });

            for name in names {
                out.articles.push(NormalizedArticle {
                    source_id: item.source_id(),
                    title: title.clone(),
                    raw_author: item.writer.clone(),
                    reporter_name: name,
                    publish_date: publish_date.clone(),
                    publish_time: publish_time.clone(),
                    content: truncate_chars(&body, CONTENT_PREVIEW_CHARS),
                    char_count: count,
                    url: item.link.trim().to_string(),
                    paper_number,
                    paper_position: String::new(),
                    paper_paragraph: String::new(),
                    is_top_placement: item.is_top_placement(),
                    category: String::new(),
                });
            }
        }
    }
}
