//! Article endpoints: list/filter, evaluate, correct fields.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use newsdesk_core::scoring::quant_score;
use newsdesk_db::ArticleWithEvaluation;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListArticlesQuery {
    date: Option<String>,
    reporter: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ArticleItem {
    pub id: i64,
    pub source_id: String,
    pub title: String,
    pub raw_author: String,
    pub reporter_name: String,
    pub publish_date: NaiveDate,
    pub publish_time: String,
    pub content: String,
    pub char_count: i64,
    pub url: String,
    pub paper_number: i64,
    pub paper_position: String,
    pub paper_paragraph: String,
    pub is_top_placement: bool,
    pub category: String,
    pub quant_score: i64,
    pub evaluated: bool,
    pub eval_position: Option<String>,
    pub eval_coverage_type: Option<String>,
    pub eval_article_nature: Option<String>,
    pub eval_impact_grade: Option<String>,
}

impl From<ArticleWithEvaluation> for ArticleItem {
    fn from(row: ArticleWithEvaluation) -> Self {
        let evaluated = row.eval_position.is_some()
            || row.eval_coverage_type.is_some()
            || row.eval_article_nature.is_some()
            || row.eval_impact_grade.is_some();
        Self {
            quant_score: quant_score(row.char_count, row.paper_number),
            evaluated,
            id: row.id,
            source_id: row.source_id,
            title: row.title,
            raw_author: row.raw_author,
            reporter_name: row.reporter_name,
            publish_date: row.publish_date,
            publish_time: row.publish_time,
            content: row.content,
            char_count: row.char_count,
            url: row.url,
            paper_number: row.paper_number,
            paper_position: row.paper_position,
            paper_paragraph: row.paper_paragraph,
            is_top_placement: row.is_top_placement,
            category: row.category,
            eval_position: row.eval_position,
            eval_coverage_type: row.eval_coverage_type,
            eval_article_nature: row.eval_article_nature,
            eval_impact_grade: row.eval_impact_grade,
        }
    }
}

/// `GET /api/v1/articles` — by reporter when `reporter` is given (with an
/// optional date window), by `date` otherwise, defaulting to today.
pub(in crate::api) async fn list_articles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<ApiResponse<Vec<ArticleItem>>>, ApiError> {
    let rows = if let Some(reporter) = query.reporter.as_deref() {
        newsdesk_db::list_articles_by_reporter(
            &state.pool,
            reporter,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await
    } else {
        let date = query
            .date
            .unwrap_or_else(|| chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string());
        newsdesk_db::list_articles_by_date(&state.pool, &date).await
    }
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ArticleItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct EvaluateRequest {
    position: Option<String>,
    coverage_type: Option<String>,
    article_nature: Option<String>,
    impact_grade: Option<String>,
    memo: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct WriteOutcome {
    pub updated: bool,
}

/// `POST /api/v1/articles/{id}/evaluate` — store or replace the evaluation
/// annotations for one article.
pub(in crate::api) async fn evaluate_article(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(article_id): Path<i64>,
    Json(body): Json<EvaluateRequest>,
) -> Result<Json<ApiResponse<WriteOutcome>>, ApiError> {
    let input = newsdesk_db::EvaluationInput {
        position: body.position,
        coverage_type: body.coverage_type,
        article_nature: body.article_nature,
        impact_grade: body.impact_grade,
        memo: body.memo,
    };

    newsdesk_db::upsert_evaluation(&state.pool, article_id, &input)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: WriteOutcome { updated: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateArticleRequest {
    paper_number: Option<i64>,
    char_count: Option<i64>,
}

/// `POST /api/v1/articles/{id}` — hand-correct page number or character
/// count after a desk review.
pub(in crate::api) async fn update_article(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(article_id): Path<i64>,
    Json(body): Json<UpdateArticleRequest>,
) -> Result<Json<ApiResponse<WriteOutcome>>, ApiError> {
    let updated = newsdesk_db::update_article_fields(
        &state.pool,
        article_id,
        body.paper_number,
        body.char_count,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !updated {
        return Err(ApiError::new(req_id.0, "not_found", "no such article"));
    }

    Ok(Json(ApiResponse {
        data: WriteOutcome { updated: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}
