//! Round-trip tests against a real Postgres instance, one fresh database
//! per test via `sqlx::test`.

use newsdesk_core::NormalizedArticle;
use newsdesk_db::{EvaluationInput, DbError};

fn article(reporter: &str, source_id: &str) -> NormalizedArticle {
    NormalizedArticle {
        source_id: source_id.to_string(),
        title: "기사 제목".to_string(),
        raw_author: format!("{reporter} 기자"),
        reporter_name: reporter.to_string(),
        publish_date: "2026-01-12".to_string(),
        publish_time: "18:00:00".to_string(),
        content: "본문 미리보기".to_string(),
        char_count: 1200,
        url: format!("https://news.example.com/NewsView/{source_id}"),
        paper_number: 3,
        paper_position: String::new(),
        paper_paragraph: String::new(),
        is_top_placement: false,
        category: "경제".to_string(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_then_query_by_date(pool: sqlx::PgPool) {
    let inserted = newsdesk_db::insert_article(&pool, &article("홍길동", "29A"))
        .await
        .expect("insert");
    assert!(inserted);

    let rows = newsdesk_db::list_articles_by_date(&pool, "2026-01-12")
        .await
        .expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reporter_name, "홍길동");
    assert_eq!(rows[0].char_count, 1200);
    assert!(rows[0].eval_impact_grade.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn resync_of_same_article_is_ignored(pool: sqlx::PgPool) {
    assert!(newsdesk_db::insert_article(&pool, &article("홍길동", "29A"))
        .await
        .expect("insert"));
    assert!(!newsdesk_db::insert_article(&pool, &article("홍길동", "29A"))
        .await
        .expect("re-insert"));

    let rows = newsdesk_db::list_articles_by_date(&pool, "2026-01-12")
        .await
        .expect("query");
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn joint_byline_stores_one_row_per_reporter(pool: sqlx::PgPool) {
    assert!(newsdesk_db::insert_article(&pool, &article("홍길동", "29JOINT"))
        .await
        .expect("insert"));
    assert!(newsdesk_db::insert_article(&pool, &article("김철수", "29JOINT"))
        .await
        .expect("insert second reporter"));

    let reporters = newsdesk_db::list_reporters(&pool).await.expect("reporters");
    assert_eq!(reporters.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn invalid_publish_date_is_rejected_before_sql(pool: sqlx::PgPool) {
    let mut bad = article("홍길동", "29BAD");
    bad.publish_date = "20260112".to_string();
    let err = newsdesk_db::insert_article(&pool, &bad)
        .await
        .expect_err("should reject");
    assert!(matches!(err, DbError::InvalidDate { .. }));
}

#[sqlx::test(migrations = "../../migrations")]
async fn reporter_window_query_filters_by_date(pool: sqlx::PgPool) {
    let mut early = article("홍길동", "29EARLY");
    early.publish_date = "2026-01-05".to_string();
    let mut late = article("홍길동", "29LATE");
    late.publish_date = "2026-01-20".to_string();
    newsdesk_db::insert_article(&pool, &early).await.expect("insert");
    newsdesk_db::insert_article(&pool, &late).await.expect("insert");

    let rows = newsdesk_db::list_articles_by_reporter(
        &pool,
        "홍길동",
        Some("2026-01-10"),
        Some("2026-01-31"),
    )
    .await
    .expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source_id, "29LATE");
}

#[sqlx::test(migrations = "../../migrations")]
async fn evaluation_upsert_overwrites_previous(pool: sqlx::PgPool) {
    newsdesk_db::insert_article(&pool, &article("홍길동", "29A"))
        .await
        .expect("insert");
    let rows = newsdesk_db::list_articles_by_date(&pool, "2026-01-12")
        .await
        .expect("query");
    let article_id = rows[0].id;

    newsdesk_db::upsert_evaluation(
        &pool,
        article_id,
        &EvaluationInput {
            coverage_type: Some("단독".to_string()),
            impact_grade: Some("A".to_string()),
            ..EvaluationInput::default()
        },
    )
    .await
    .expect("first evaluation");

    newsdesk_db::upsert_evaluation(
        &pool,
        article_id,
        &EvaluationInput {
            coverage_type: Some("특종".to_string()),
            impact_grade: Some("S".to_string()),
            ..EvaluationInput::default()
        },
    )
    .await
    .expect("second evaluation");

    let evaluations = newsdesk_db::list_evaluations(&pool).await.expect("list");
    assert_eq!(evaluations.len(), 1);
    assert_eq!(evaluations[0].impact_grade.as_deref(), Some("S"));
    assert!(evaluations[0].is_scoop);
    assert!(!evaluations[0].is_exclusive);

    let stats = newsdesk_db::reporter_stats(&pool, "홍길동", None, None)
        .await
        .expect("stats");
    assert_eq!(stats.article_count, 1);
    assert_eq!(stats.scoop_count, 1);
    assert_eq!(stats.s_grade, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn evaluating_missing_article_is_not_found(pool: sqlx::PgPool) {
    let err = newsdesk_db::upsert_evaluation(&pool, 999_999, &EvaluationInput::default())
        .await
        .expect_err("should fail");
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_article_fields_preserves_unspecified_values(pool: sqlx::PgPool) {
    newsdesk_db::insert_article(&pool, &article("홍길동", "29A"))
        .await
        .expect("insert");
    let rows = newsdesk_db::list_articles_by_date(&pool, "2026-01-12")
        .await
        .expect("query");
    let article_id = rows[0].id;

    let updated = newsdesk_db::update_article_fields(&pool, article_id, Some(1), None)
        .await
        .expect("update");
    assert!(updated);

    let rows = newsdesk_db::list_articles_by_date(&pool, "2026-01-12")
        .await
        .expect("query");
    assert_eq!(rows[0].paper_number, 1);
    assert_eq!(rows[0].char_count, 1200);
}

#[sqlx::test(migrations = "../../migrations")]
async fn summary_counts_articles_reporters_and_evaluations(pool: sqlx::PgPool) {
    newsdesk_db::insert_article(&pool, &article("홍길동", "29A"))
        .await
        .expect("insert");
    newsdesk_db::insert_article(&pool, &article("김철수", "29B"))
        .await
        .expect("insert");

    let summary = newsdesk_db::summary(&pool).await.expect("summary");
    assert_eq!(summary.total_articles, 2);
    assert_eq!(summary.total_reporters, 2);
    assert_eq!(summary.evaluated_count, 0);
    assert!(summary.first_date.is_some());
}
