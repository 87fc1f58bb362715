//! Sync runner: fetch daily feeds from storage and load the resulting
//! article rows into the database.
//!
//! Per-feed failures are logged and skipped rather than propagated so one
//! bad day does not abort the full run; already-synced feeds keep their
//! rows. The run as a whole fails only when every requested feed failed.

use std::path::Path;

use sqlx::PgPool;

use newsdesk_feed::BylineParser;
use newsdesk_storage::FeedStore;

pub(crate) async fn run_sync(
    pool: &PgPool,
    store: &FeedStore,
    parser: &BylineParser,
    date: Option<&str>,
    days: usize,
    dry_run: bool,
) -> anyhow::Result<()> {
    let dates: Vec<String> = if let Some(date) = date {
        vec![date.to_owned()]
    } else {
        store
            .list_feed_dates("")
            .await?
            .into_iter()
            .rev()
            .take(days)
            .collect()
    };

    if dates.is_empty() {
        anyhow::bail!("no feeds available in storage");
    }

    if dry_run {
        println!(
            "dry-run: would sync {} feeds: [{}]",
            dates.len(),
            dates.join(", ")
        );
        return Ok(());
    }

    let mut feeds_processed = 0usize;
    let mut feeds_failed = 0usize;
    let mut inserted = 0usize;
    let mut already_stored = 0usize;

    for date_key in &dates {
        let xml = match store.get_feed(date_key).await {
            Ok(xml) => xml,
            Err(e) => {
                tracing::warn!(feed = %date_key, error = %e, "feed fetch failed — skipping");
                feeds_failed += 1;
                continue;
            }
        };

        let parse = match newsdesk_feed::normalize_feed(&xml, date_key, parser) {
            Ok(parse) => parse,
            Err(e) => {
                tracing::warn!(feed = %date_key, error = %e, "feed parse failed — skipping");
                feeds_failed += 1;
                continue;
            }
        };

        let mut feed_inserted = 0usize;
        for article in &parse.articles {
            if newsdesk_db::insert_article(pool, article).await? {
                feed_inserted += 1;
            } else {
                already_stored += 1;
            }
        }
        inserted += feed_inserted;
        feeds_processed += 1;
        println!(
            "  - {date_key}: {} items, {} articles ({} new)",
            parse.items_seen,
            parse.articles.len(),
            feed_inserted
        );
    }

    if feeds_processed == 0 {
        anyhow::bail!("all {feeds_failed} feeds failed to sync");
    }

    if feeds_failed > 0 {
        tracing::warn!(feeds_failed, total = dates.len(), "some feeds failed during sync");
    }
    println!(
        "synced {feeds_processed}/{} feeds: {inserted} new articles, {already_stored} already stored",
        dates.len()
    );
    Ok(())
}

/// Parse a feed XML file from disk and print an ingest preview. Useful for
/// checking what a new feed export would produce before it reaches storage.
pub(crate) fn parse_local_file(path: &Path, parser: &BylineParser) -> anyhow::Result<()> {
    let xml = std::fs::read_to_string(path)?;
    let date_key = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_owned();

    let parse = newsdesk_feed::normalize_feed(&xml, &date_key, parser)?;

    println!(
        "{}: {} items seen, {} skipped, {} online-only, {} without byline",
        path.display(),
        parse.items_seen,
        parse.items_skipped,
        parse.dropped_online_only,
        parse.dropped_no_byline
    );
    println!("{} attributed articles:", parse.articles.len());
    for article in parse.articles.iter().take(10) {
        println!(
            "  - {} p{} {} ({} chars)",
            article.reporter_name,
            article.paper_number,
            newsdesk_feed::clean::truncate_chars(&article.title, 30),
            article.char_count
        );
    }
    Ok(())
}
