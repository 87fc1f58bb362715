//! Feed listing and on-demand sync.
//!
//! A sync fetches each requested feed, normalizes it, and inserts the
//! resulting article rows. Per-feed failures are tolerated: feeds already
//! processed stay processed, and the response reports how many feeds and
//! items each outcome covered. Only a run in which every feed failed (or
//! none existed) is an error.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListFeedsQuery {
    /// Date-key prefix filter, e.g. `"2026"`.
    prefix: Option<String>,
    limit: Option<usize>,
}

/// `GET /api/v1/feeds` — available feed date keys, newest first.
pub(in crate::api) async fn list_feeds(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListFeedsQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let prefix = query.prefix.unwrap_or_default();
    let limit = query.limit.unwrap_or(30);

    let dates = state
        .store
        .list_feed_dates(&prefix)
        .await
        .map_err(|e| map_storage_error(req_id.0.clone(), &e))?;

    let newest_first: Vec<String> = dates.into_iter().rev().take(limit).collect();
    Ok(Json(ApiResponse {
        data: newest_first,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize, Default)]
pub(in crate::api) struct SyncRequest {
    /// Sync exactly this feed (8-digit date key).
    date: Option<String>,
    /// Otherwise: sync the most recent N feeds (default 7).
    days: Option<usize>,
}

#[derive(Debug, Default, Serialize)]
pub(in crate::api) struct SyncOutcome {
    pub feeds_processed: usize,
    pub feeds_failed: usize,
    pub items_seen: usize,
    pub items_skipped: usize,
    pub articles_inserted: usize,
    pub articles_already_stored: usize,
}

/// `POST /api/v1/sync`
pub(in crate::api) async fn trigger_sync(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<SyncRequest>>,
) -> Result<Json<ApiResponse<SyncOutcome>>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let dates = if let Some(date) = request.date {
        vec![date]
    } else {
        let all = state
            .store
            .list_feed_dates("")
            .await
            .map_err(|e| map_storage_error(req_id.0.clone(), &e))?;
        let days = request.days.unwrap_or(7);
        all.into_iter().rev().take(days).collect()
    };

    if dates.is_empty() {
        return Err(ApiError::new(req_id.0, "not_found", "no feeds available"));
    }

    let mut outcome = SyncOutcome::default();
    for date_key in &dates {
        match sync_one_feed(&state, date_key, &mut outcome).await {
            Ok(()) => outcome.feeds_processed += 1,
            Err(SyncFeedError::Fetch(e)) => {
                tracing::warn!(feed = %date_key, error = %e, "feed fetch failed — skipping");
                outcome.feeds_failed += 1;
            }
            Err(SyncFeedError::Parse(e)) => {
                tracing::warn!(feed = %date_key, error = %e, "feed parse failed — skipping");
                outcome.feeds_failed += 1;
            }
            Err(SyncFeedError::Db(e)) => {
                return Err(map_db_error(req_id.0, &e));
            }
        }
    }

    if outcome.feeds_processed == 0 {
        return Err(ApiError::new(
            req_id.0,
            "internal_error",
            format!("all {} feeds failed", outcome.feeds_failed),
        ));
    }

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}

enum SyncFeedError {
    Fetch(newsdesk_storage::StorageError),
    Parse(newsdesk_feed::FeedError),
    Db(newsdesk_db::DbError),
}

async fn sync_one_feed(
    state: &AppState,
    date_key: &str,
    outcome: &mut SyncOutcome,
) -> Result<(), SyncFeedError> {
    let xml = state
        .store
        .get_feed(date_key)
        .await
        .map_err(SyncFeedError::Fetch)?;

    let parse = newsdesk_feed::normalize_feed(&xml, date_key, &state.parser)
        .map_err(SyncFeedError::Parse)?;

    outcome.items_seen += parse.items_seen;
    outcome.items_skipped += parse.items_skipped;

    for article in &parse.articles {
        let inserted = newsdesk_db::insert_article(&state.pool, article)
            .await
            .map_err(SyncFeedError::Db)?;
        if inserted {
            outcome.articles_inserted += 1;
        } else {
            outcome.articles_already_stored += 1;
        }
    }

    tracing::info!(
        feed = %date_key,
        items = parse.items_seen,
        articles = parse.articles.len(),
        "feed synced"
    );
    Ok(())
}

fn map_storage_error(request_id: String, error: &newsdesk_storage::StorageError) -> ApiError {
    match error {
        newsdesk_storage::StorageError::NotFound { key } => {
            ApiError::new(request_id, "not_found", format!("object {key} not found"))
        }
        other => {
            tracing::error!(error = %other, "storage request failed");
            ApiError::new(request_id, "internal_error", "storage request failed")
        }
    }
}
