//! Database operations for the `evaluations` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Coverage types that carry derived flags.
const COVERAGE_EXCLUSIVE: &str = "단독";
const COVERAGE_SCOOP: &str = "특종";

/// Editor-entered evaluation fields for one article.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInput {
    pub position: Option<String>,
    pub coverage_type: Option<String>,
    pub article_nature: Option<String>,
    pub impact_grade: Option<String>,
    pub memo: Option<String>,
}

/// A row from the `evaluations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EvaluationRow {
    pub id: i64,
    pub article_id: i64,
    pub position: Option<String>,
    pub coverage_type: Option<String>,
    pub article_nature: Option<String>,
    pub impact_grade: Option<String>,
    pub is_exclusive: bool,
    pub is_scoop: bool,
    pub memo: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Inserts or replaces the evaluation for `article_id`.
///
/// The exclusive/scoop flags are derived from the coverage type rather than
/// entered separately, matching how the evaluation sheet is filled in.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the article does not exist, or
/// [`DbError::Sqlx`] if the write fails.
pub async fn upsert_evaluation(
    pool: &PgPool,
    article_id: i64,
    input: &EvaluationInput,
) -> Result<(), DbError> {
    let is_exclusive = input.coverage_type.as_deref() == Some(COVERAGE_EXCLUSIVE);
    let is_scoop = input.coverage_type.as_deref() == Some(COVERAGE_SCOOP);

    let result = sqlx::query(
        "INSERT INTO evaluations \
           (article_id, position, coverage_type, article_nature, impact_grade, \
            is_exclusive, is_scoop, memo) \
         SELECT a.id, $2, $3, $4, $5, $6, $7, $8 \
         FROM articles a WHERE a.id = $1 \
         ON CONFLICT (article_id) DO UPDATE SET \
           position       = EXCLUDED.position, \
           coverage_type  = EXCLUDED.coverage_type, \
           article_nature = EXCLUDED.article_nature, \
           impact_grade   = EXCLUDED.impact_grade, \
           is_exclusive   = EXCLUDED.is_exclusive, \
           is_scoop       = EXCLUDED.is_scoop, \
           memo           = EXCLUDED.memo, \
           evaluated_at   = NOW()",
    )
    .bind(article_id)
    .bind(&input.position)
    .bind(&input.coverage_type)
    .bind(&input.article_nature)
    .bind(&input.impact_grade)
    .bind(is_exclusive)
    .bind(is_scoop)
    .bind(&input.memo)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// An evaluation joined with the owning article's identity, for export.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EvaluationExportRow {
    pub source_id: String,
    pub reporter_name: String,
    pub position: Option<String>,
    pub coverage_type: Option<String>,
    pub article_nature: Option<String>,
    pub impact_grade: Option<String>,
    pub is_exclusive: bool,
    pub is_scoop: bool,
    pub memo: Option<String>,
}

/// All stored evaluations with article identity attached, ordered by
/// article.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_evaluations_for_export(
    pool: &PgPool,
) -> Result<Vec<EvaluationExportRow>, DbError> {
    let rows = sqlx::query_as::<_, EvaluationExportRow>(
        "SELECT a.source_id, a.reporter_name, e.position, e.coverage_type, \
                e.article_nature, e.impact_grade, e.is_exclusive, e.is_scoop, e.memo \
         FROM evaluations e \
         JOIN articles a ON a.id = e.article_id \
         ORDER BY a.source_id, a.reporter_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All stored evaluations, keyed for export by the owning article.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_evaluations(pool: &PgPool) -> Result<Vec<EvaluationRow>, DbError> {
    let rows = sqlx::query_as::<_, EvaluationRow>(
        "SELECT id, article_id, position, coverage_type, article_nature, impact_grade, \
                is_exclusive, is_scoop, memo, evaluated_at \
         FROM evaluations \
         ORDER BY article_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
