//! Database operations for the `articles` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use newsdesk_core::NormalizedArticle;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// An article row joined with its evaluation (if one exists).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleWithEvaluation {
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
    pub eval_position: Option<String>,
    pub eval_coverage_type: Option<String>,
    pub eval_article_nature: Option<String>,
    pub eval_impact_grade: Option<String>,
    pub eval_is_exclusive: Option<bool>,
    pub eval_is_scoop: Option<bool>,
}

/// One reporter with their stored article count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReporterCount {
    pub reporter_name: String,
    pub article_count: i64,
}

/// Aggregate counters for one reporter over a date window.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReporterStats {
    pub article_count: i64,
    pub total_chars: i64,
    pub front_page: i64,
    pub page_2_3: i64,
    pub top_placement: i64,
    pub scoop_count: i64,
    pub exclusive_count: i64,
    pub s_grade: i64,
    pub a_grade: i64,
}

/// The per-article fields the quantitative score is computed from.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoreInput {
    pub reporter_name: String,
    pub char_count: i64,
    pub paper_number: i64,
}

/// Whole-store summary counters.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreSummary {
    pub total_articles: i64,
    pub total_reporters: i64,
    pub evaluated_count: i64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

const JOINED_COLUMNS: &str = "a.id, a.source_id, a.title, a.raw_author, a.reporter_name, \
     a.publish_date, a.publish_time, a.content, a.char_count, a.url, a.paper_number, \
     a.paper_position, a.paper_paragraph, a.is_top_placement, a.category, \
     e.position AS eval_position, e.coverage_type AS eval_coverage_type, \
     e.article_nature AS eval_article_nature, e.impact_grade AS eval_impact_grade, \
     e.is_exclusive AS eval_is_exclusive, e.is_scoop AS eval_is_scoop";

fn parse_publish_date(value: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| DbError::InvalidDate {
        value: value.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts one attributed article, ignoring re-syncs of a row that already
/// exists for the same `(source_id, reporter_name)` pair. Returns `true`
/// when a new row was written.
///
/// # Errors
///
/// Returns [`DbError::InvalidDate`] if `publish_date` does not parse, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_article(pool: &PgPool, article: &NormalizedArticle) -> Result<bool, DbError> {
    let publish_date = parse_publish_date(&article.publish_date)?;

    let result = sqlx::query(
        "INSERT INTO articles \
           (source_id, title, raw_author, reporter_name, publish_date, publish_time, \
            content, char_count, url, paper_number, paper_position, paper_paragraph, \
            is_top_placement, category) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         ON CONFLICT (source_id, reporter_name) DO NOTHING",
    )
    .bind(&article.source_id)
    .bind(&article.title)
    .bind(&article.raw_author)
    .bind(&article.reporter_name)
    .bind(publish_date)
    .bind(&article.publish_time)
    .bind(&article.content)
    .bind(article.char_count)
    .bind(&article.url)
    .bind(article.paper_number)
    .bind(&article.paper_position)
    .bind(&article.paper_paragraph)
    .bind(article.is_top_placement)
    .bind(&article.category)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Updates hand-corrected fields on an article. `None` preserves the
/// existing value. Returns `false` if no such article exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_article_fields(
    pool: &PgPool,
    article_id: i64,
    paper_number: Option<i64>,
    char_count: Option<i64>,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE articles \
         SET paper_number = COALESCE($2, paper_number), \
             char_count   = COALESCE($3, char_count) \
         WHERE id = $1",
    )
    .bind(article_id)
    .bind(paper_number)
    .bind(char_count)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns all articles printed on `date`, ordered by page then filing time.
///
/// # Errors
///
/// Returns [`DbError::InvalidDate`] for a malformed date, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn list_articles_by_date(
    pool: &PgPool,
    date: &str,
) -> Result<Vec<ArticleWithEvaluation>, DbError> {
    let date = parse_publish_date(date)?;
    let query = format!(
        "SELECT {JOINED_COLUMNS} \
         FROM articles a \
         LEFT JOIN evaluations e ON a.id = e.article_id \
         WHERE a.publish_date = $1 \
         ORDER BY a.paper_number ASC, a.publish_time DESC"
    );
    let rows = sqlx::query_as::<_, ArticleWithEvaluation>(&query)
        .bind(date)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Returns a reporter's articles, optionally windowed by publish date,
/// newest first.
///
/// # Errors
///
/// Returns [`DbError::InvalidDate`] for malformed window dates, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn list_articles_by_reporter(
    pool: &PgPool,
    reporter_name: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Vec<ArticleWithEvaluation>, DbError> {
    let start = start_date.map(parse_publish_date).transpose()?;
    let end = end_date.map(parse_publish_date).transpose()?;

    let query = format!(
        "SELECT {JOINED_COLUMNS} \
         FROM articles a \
         LEFT JOIN evaluations e ON a.id = e.article_id \
         WHERE a.reporter_name = $1 \
           AND ($2::DATE IS NULL OR a.publish_date >= $2) \
           AND ($3::DATE IS NULL OR a.publish_date <= $3) \
         ORDER BY a.publish_date DESC, a.publish_time DESC"
    );
    let rows = sqlx::query_as::<_, ArticleWithEvaluation>(&query)
        .bind(reporter_name)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Aggregate counters for one reporter over an optional date window.
///
/// # Errors
///
/// Returns [`DbError::InvalidDate`] for malformed window dates, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn reporter_stats(
    pool: &PgPool,
    reporter_name: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<ReporterStats, DbError> {
    let start = start_date.map(parse_publish_date).transpose()?;
    let end = end_date.map(parse_publish_date).transpose()?;

    let row = sqlx::query_as::<_, ReporterStats>(
        "SELECT COUNT(*)                                             AS article_count, \
                COALESCE(SUM(a.char_count), 0)::BIGINT               AS total_chars, \
                COUNT(*) FILTER (WHERE a.paper_number = 1)           AS front_page, \
                COUNT(*) FILTER (WHERE a.paper_number IN (2, 3))     AS page_2_3, \
                COUNT(*) FILTER (WHERE a.is_top_placement)           AS top_placement, \
                COUNT(*) FILTER (WHERE e.is_scoop)                   AS scoop_count, \
                COUNT(*) FILTER (WHERE e.is_exclusive)               AS exclusive_count, \
                COUNT(*) FILTER (WHERE e.impact_grade = 'S')         AS s_grade, \
                COUNT(*) FILTER (WHERE e.impact_grade = 'A')         AS a_grade \
         FROM articles a \
         LEFT JOIN evaluations e ON a.id = e.article_id \
         WHERE a.reporter_name = $1 \
           AND ($2::DATE IS NULL OR a.publish_date >= $2) \
           AND ($3::DATE IS NULL OR a.publish_date <= $3)",
    )
    .bind(reporter_name)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// All reporters with stored articles, busiest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reporters(pool: &PgPool) -> Result<Vec<ReporterCount>, DbError> {
    let rows = sqlx::query_as::<_, ReporterCount>(
        "SELECT reporter_name, COUNT(*) AS article_count \
         FROM articles \
         WHERE reporter_name <> '' \
         GROUP BY reporter_name \
         ORDER BY article_count DESC, reporter_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Scoring inputs for every stored article, for whole-roster score
/// computation in one pass.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_score_inputs(pool: &PgPool) -> Result<Vec<ScoreInput>, DbError> {
    let rows = sqlx::query_as::<_, ScoreInput>(
        "SELECT reporter_name, char_count, paper_number \
         FROM articles \
         WHERE reporter_name <> ''",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Whole-store counters for the summary endpoint.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn summary(pool: &PgPool) -> Result<StoreSummary, DbError> {
    let row = sqlx::query_as::<_, StoreSummary>(
        "SELECT (SELECT COUNT(*) FROM articles)                          AS total_articles, \
                (SELECT COUNT(DISTINCT reporter_name) FROM articles \
                  WHERE reporter_name <> '')                             AS total_reporters, \
                (SELECT COUNT(*) FROM evaluations)                       AS evaluated_count, \
                (SELECT MIN(publish_date) FROM articles)                 AS first_date, \
                (SELECT MAX(publish_date) FROM articles)                 AS last_date",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}
