//! Quantitative scoring over normalized article fields.
//!
//! Points follow the newsroom's evaluation sheet: article length in
//! non-whitespace characters plus the prominence of the printed page.
//! Qualitative (human-entered) scores live in the evaluations table and are
//! combined by the API layer, not here.

/// Length component thresholds, in cleaned characters.
const LENGTH_TIERS: &[(i64, i64)] = &[(2000, 10), (1000, 7), (500, 5)];
const LENGTH_FLOOR: i64 = 3;

/// Page component: front page, early pages, everything else.
const FRONT_PAGE_POINTS: i64 = 20;
const EARLY_PAGE_POINTS: i64 = 10;
const OTHER_PAGE_POINTS: i64 = 5;

/// Computes the quantitative score for one article.
#[must_use]
pub fn quant_score(char_count: i64, paper_number: i64) -> i64 {
    let length_points = LENGTH_TIERS
        .iter()
        .find(|(threshold, _)| char_count >= *threshold)
        .map_or(LENGTH_FLOOR, |(_, points)| *points);

    let page_points = match paper_number {
        1 => FRONT_PAGE_POINTS,
        2 | 3 => EARLY_PAGE_POINTS,
        _ => OTHER_PAGE_POINTS,
    };

    length_points + page_points
}

/// Converts raw totals to a relative scale centered on `target_mean` with
/// spread `target_std` (z-score transform), rounded to two decimals.
///
/// Fewer than two scores are returned unchanged — there is no distribution
/// to normalize against. A zero standard deviation is treated as 1.
#[must_use]
pub fn relative_scores(scores: &[f64], target_mean: f64, target_std: f64) -> Vec<f64> {
    if scores.len() < 2 {
        return scores.to_vec();
    }

    #[allow(clippy::cast_precision_loss)]
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    let std = if std > 0.0 { std } else { 1.0 };

    scores
        .iter()
        .map(|s| {
            let scaled = target_mean + ((s - mean) / std) * target_std;
            (scaled * 100.0).round() / 100.0
        })
        .collect()
}
