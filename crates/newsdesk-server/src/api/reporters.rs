//! Reporter endpoints: roster and per-reporter statistics.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use newsdesk_core::scoring::{quant_score, relative_scores};

use crate::middleware::RequestId;

use super::articles::ArticleItem;
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Relative-scale parameters for the roster ranking.
const RELATIVE_TARGET_MEAN: f64 = 85.0;
const RELATIVE_TARGET_STD: f64 = 7.5;

#[derive(Debug, Serialize)]
pub(in crate::api) struct ReporterItem {
    pub reporter_name: String,
    pub article_count: i64,
    pub quant_score_total: i64,
    pub relative_score: f64,
    pub rank: usize,
}

/// `GET /api/v1/reporters` — every reporter with stored articles, ranked by
/// total quantitative score and rendered on the relative scale.
pub(in crate::api) async fn list_reporters(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ReporterItem>>>, ApiError> {
    let rows = newsdesk_db::list_reporters(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let score_inputs = newsdesk_db::list_score_inputs(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut quant_totals: HashMap<String, i64> = HashMap::new();
    for input in score_inputs {
        *quant_totals.entry(input.reporter_name).or_default() +=
            quant_score(input.char_count, input.paper_number);
    }

    let mut items: Vec<ReporterItem> = rows
        .into_iter()
        .map(|r| {
            let quant_score_total = quant_totals.get(&r.reporter_name).copied().unwrap_or(0);
            ReporterItem {
                reporter_name: r.reporter_name,
                article_count: r.article_count,
                quant_score_total,
                relative_score: 0.0,
                rank: 0,
            }
        })
        .collect();

    items.sort_by_key(|item| std::cmp::Reverse(item.quant_score_total));

    #[allow(clippy::cast_precision_loss)]
    let totals: Vec<f64> = items.iter().map(|i| i.quant_score_total as f64).collect();
    let relative = relative_scores(&totals, RELATIVE_TARGET_MEAN, RELATIVE_TARGET_STD);
    for (rank, (item, score)) in items.iter_mut().zip(relative).enumerate() {
        item.relative_score = score;
        item.rank = rank + 1;
    }

    Ok(Json(ApiResponse {
        data: items,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct StatsQuery {
    period: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ReporterStatsData {
    pub reporter_name: String,
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub article_count: i64,
    pub total_chars: i64,
    pub front_page: i64,
    pub page_2_3: i64,
    pub top_placement: i64,
    pub scoop_count: i64,
    pub exclusive_count: i64,
    pub s_grade: i64,
    pub a_grade: i64,
    pub quant_score_total: i64,
    pub articles: Vec<ArticleItem>,
}

/// Resolves a named period to a start date counted back from `end_date`.
/// Explicit `start_date` overrides the period.
fn window_start(period: &str, end_date: &str) -> String {
    let days = match period {
        "weekly" => 7,
        "monthly" => 30,
        "quarterly" => 90,
        "halfyear" => 180,
        _ => 0, // daily
    };
    if days == 0 {
        return end_date.to_string();
    }
    newsdesk_feed::pubdate::parse_iso_date(end_date).map_or_else(
        || end_date.to_string(),
        |end| (end - Duration::days(days)).format("%Y-%m-%d").to_string(),
    )
}

/// `GET /api/v1/reporters/{name}/stats` — windowed counters plus the
/// matching article list.
pub(in crate::api) async fn reporter_statistics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(name): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<ReporterStatsData>>, ApiError> {
    let period = query.period.unwrap_or_else(|| "daily".to_string());
    let end_date = query
        .end_date
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
    let start_date = query
        .start_date
        .unwrap_or_else(|| window_start(&period, &end_date));

    let stats = newsdesk_db::reporter_stats(
        &state.pool,
        &name,
        Some(start_date.as_str()),
        Some(end_date.as_str()),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let articles = newsdesk_db::list_articles_by_reporter(
        &state.pool,
        &name,
        Some(start_date.as_str()),
        Some(end_date.as_str()),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let articles: Vec<ArticleItem> = articles.into_iter().map(ArticleItem::from).collect();
    let quant_score_total = articles.iter().map(|a| a.quant_score).sum();

    Ok(Json(ApiResponse {
        data: ReporterStatsData {
            reporter_name: name,
            period,
            start_date,
            end_date,
            article_count: stats.article_count,
            total_chars: stats.total_chars,
            front_page: stats.front_page,
            page_2_3: stats.page_2_3,
            top_placement: stats.top_placement,
            scoop_count: stats.scoop_count,
            exclusive_count: stats.exclusive_count,
            s_grade: stats.s_grade,
            a_grade: stats.a_grade,
            quant_score_total,
            articles,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_window_starts_on_end_date() {
        assert_eq!(window_start("daily", "2026-01-12"), "2026-01-12");
    }

    #[test]
    fn weekly_window_counts_back_seven_days() {
        assert_eq!(window_start("weekly", "2026-01-12"), "2026-01-05");
    }

    #[test]
    fn halfyear_window_counts_back_180_days() {
        assert_eq!(window_start("halfyear", "2026-07-01"), "2026-01-02");
    }

    #[test]
    fn unknown_period_behaves_like_daily() {
        assert_eq!(window_start("fortnight", "2026-01-12"), "2026-01-12");
    }

    #[test]
    fn malformed_end_date_is_passed_through() {
        assert_eq!(window_start("weekly", "last tuesday"), "last tuesday");
    }
}
