//! Whole-store summary endpoint.

use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(in crate::api) struct SummaryData {
    pub total_articles: i64,
    pub total_reporters: i64,
    pub evaluated_count: i64,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// `GET /api/v1/stats/summary`
pub(in crate::api) async fn summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<SummaryData>>, ApiError> {
    let row = newsdesk_db::summary(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SummaryData {
            total_articles: row.total_articles,
            total_reporters: row.total_reporters,
            evaluated_count: row.evaluated_count,
            date_range: DateRange {
                start: row.first_date,
                end: row.last_date,
            },
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
