//! Derived-metric formulas shared by every channel engine.
//!
//! The invariant all of these enforce: a ratio whose denominator is zero
//! or absent is `None`, so consumers can tell "no data" from a genuine
//! zero. No helper here ever yields NaN or an infinity.

// ── Ratio primitives ──────────────────────────────────────────────────────────

pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    Some(numerator / denominator)
}

/// `numerator / denominator * 100`.
pub fn percent(numerator: u64, denominator: u64) -> Option<f64> {
    ratio(numerator as f64, denominator as f64).map(|r| r * 100.0)
}

/// `numerator / denominator * 1000` — the "per thousand searches" family.
pub fn per_thousand(numerator: u64, denominator: u64) -> Option<f64> {
    ratio(numerator as f64, denominator as f64).map(|r| r * 1000.0)
}

// ── Named metrics ─────────────────────────────────────────────────────────────

/// Reactive activity per published post: `(comments + replies) / posts`.
pub fn participation(comments: u64, replies: u64, posts: u64) -> Option<f64> {
    ratio((comments + replies) as f64, posts as f64)
}

/// Monthly sales per unit of publication volume, in percent.
pub fn sales_efficiency(monthly_sales: u64, total_posts: u64) -> Option<f64> {
    percent(monthly_sales, total_posts)
}

// ── Performance score ─────────────────────────────────────────────────────────

const POSTS_WEIGHT: f64 = 0.5;
const SALES_WEIGHT: f64 = 0.3;
const SEARCH_WEIGHT: f64 = 0.2;

/// Weighted blend used by the leaderboard: publication volume, a clamped
/// sales-efficiency term, and a clamped search-efficiency term. Products
/// without search data score a neutral 50 on the search term instead of
/// being zeroed out.
pub fn performance_score(
    total_posts: u64,
    sales_efficiency: Option<f64>,
    posts_per_thousand_search: Option<f64>,
) -> f64 {
    let sales_term = sales_efficiency.unwrap_or(0.0).clamp(0.0, 200.0);
    let search_term = posts_per_thousand_search
        .map(|r| (r * 10.0).clamp(0.0, 200.0))
        .unwrap_or(50.0);

    (total_posts as f64 * POSTS_WEIGHT + sales_term * SALES_WEIGHT + search_term * SEARCH_WEIGHT)
        .round()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
