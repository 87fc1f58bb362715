//! Database summary printout.

use sqlx::PgPool;

pub(crate) async fn show_stats(pool: &PgPool) -> anyhow::Result<()> {
    let summary = newsdesk_db::summary(pool).await?;
    let reporters = newsdesk_db::list_reporters(pool).await?;

    println!("store summary");
    println!("  articles:    {}", summary.total_articles);
    println!("  reporters:   {}", summary.total_reporters);
    println!("  evaluated:   {}", summary.evaluated_count);
    println!(
        "  date range:  {} ~ {}",
        summary
            .first_date
            .map_or_else(|| "-".to_string(), |d| d.to_string()),
        summary
            .last_date
            .map_or_else(|| "-".to_string(), |d| d.to_string())
    );

    println!("top reporters:");
    for reporter in reporters.iter().take(10) {
        println!(
            "  - {}: {} articles",
            reporter.reporter_name, reporter.article_count
        );
    }
    Ok(())
}
