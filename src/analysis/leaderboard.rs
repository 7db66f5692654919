//! Pure projections over an already-built product list: the cross-channel
//! leaderboard and the technology split.

use crate::analysis::metrics::performance_score;
use crate::models::{ProductRecord, RankedEntry, Technology, TechnologyBuckets};

/// Rank products by publication volume, descending, and assign a dense
/// 1..N rank. The rank published in the source sheet is deliberately
/// ignored here: the leaderboard reflects the volumes we computed.
pub fn build_leaderboard(products: &[ProductRecord]) -> Vec<RankedEntry> {
    let mut sorted: Vec<&ProductRecord> = products.iter().collect();
    sorted.sort_by(|a, b| b.total_posts.cmp(&a.total_posts));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, product)| RankedEntry {
            rank: index as u32 + 1,
            keyword: product.keyword.clone(),
            technology: product.technology,
            technology_label: product.technology_label.clone(),
            total_posts: product.total_posts,
            total_engagement: product.total_engagement,
            participation: product.participation,
            search_volume: product.search_volume,
            posts_per_thousand_search: product.posts_per_thousand_search,
            monthly_sales: product.monthly_sales,
            total_sales: product.total_sales,
            sales_efficiency: product.sales_efficiency,
            sales_per_thousand_search: product.sales_per_thousand_search,
            search_to_sales_rate: product.search_to_sales_rate,
            market_share: product.market_share,
            technology_share: product.technology_share,
            is_asterasys: product.is_asterasys,
            performance_score: performance_score(
                product.total_posts,
                product.sales_efficiency,
                product.posts_per_thousand_search,
            ),
        })
        .collect()
}

/// Partition products into technology buckets. `all` always contains every
/// product, in the order given.
pub fn split_by_technology(products: &[ProductRecord]) -> TechnologyBuckets {
    let mut buckets = TechnologyBuckets::default();

    for product in products {
        buckets.all.push(product.clone());
        match product.technology {
            Technology::Rf => buckets.rf.push(product.clone()),
            Technology::Hifu => buckets.hifu.push(product.clone()),
            Technology::Unknown => buckets.unknown.push(product.clone()),
        }
    }

    buckets
}

// ── Tests ─────────────────────────────────────────────────────────────────────
