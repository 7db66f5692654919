//! Per-channel analysis engines and the pure builders layered on top.
//!
//! Each engine is a synchronous transform: already-loaded raw rows in,
//! [`ChannelDataset`] out. No I/O happens past the row provider and no
//! state survives a build, so repeated or concurrent builds are
//! independent by construction.

pub mod blog;
pub mod cafe;
pub mod leaderboard;
pub mod metrics;
pub mod news;
pub mod totals;
pub mod youtube;

use crate::loader::{CsvProvider, LoadError};
use crate::models::{Channel, ChannelDataset, ProductRecord, SalesStats, TrafficStats};
use std::collections::HashMap;

/// Build one channel's dataset for a month.
pub fn build_dataset(
    provider: &CsvProvider,
    channel: Channel,
    month: &str,
) -> Result<ChannelDataset, LoadError> {
    match channel {
        Channel::Blog => blog::build_dataset(provider, month),
        Channel::Cafe => cafe::build_dataset(provider, month),
        Channel::News => news::build_dataset(provider, month),
        Channel::Youtube => youtube::build_dataset(provider, month),
    }
}

/// Attach the traffic/sales joins and the search- and sales-denominated
/// ratios. A keyword missing from a lookup degrades to `None`/`0` fields,
/// which in turn makes the dependent ratios `None`.
pub(crate) fn enrich_product(
    product: &mut ProductRecord,
    traffic: &HashMap<String, TrafficStats>,
    sales: &HashMap<String, SalesStats>,
) {
    if let Some(stats) = traffic.get(&product.keyword) {
        product.search_volume = Some(stats.monthly_search_volume);
        product.search_rank = stats.search_rank;
    }

    if let Some(stats) = sales.get(&product.keyword) {
        product.monthly_sales = stats.monthly_sales;
        product.total_sales = stats.total_sales;
    }

    let search_volume = product.search_volume.unwrap_or(0);
    product.posts_per_thousand_search = metrics::per_thousand(product.total_posts, search_volume);
    product.sales_efficiency = metrics::sales_efficiency(product.monthly_sales, product.total_posts);
    product.sales_per_thousand_search = metrics::per_thousand(product.monthly_sales, search_volume);
    product.search_to_sales_rate = metrics::percent(product.monthly_sales, search_volume);
}

/// Shared core for the volume-only channels (news, YouTube): one row per
/// keyword with group, post count and publication rank, i.e. the cafe
/// shape minus engagement and views.
pub(crate) fn volume_dataset_from_rows(
    channel: Channel,
    month: &str,
    rows: &[crate::models::RawRow],
    traffic: &HashMap<String, TrafficStats>,
    sales: &HashMap<String, SalesStats>,
) -> ChannelDataset {
    use crate::parse::{parse_count, parse_rank};

    let products: Vec<ProductRecord> = rows
        .iter()
        .filter_map(|row| {
            let keyword = row.get("키워드")?;
            let mut product = ProductRecord::new(keyword, row.text("그룹"));
            product.rank = parse_rank(row.text("발행량 순위"));
            product.total_posts = parse_count(row.text("총 발행량"));
            enrich_product(&mut product, traffic, sales);
            Some(product)
        })
        .collect();

    let (mut products, totals) = totals::summarize(products);
    sort_by_rank(&mut products);

    ChannelDataset {
        month: month.to_string(),
        channel,
        products,
        totals,
    }
}

/// Channel-native ordering: publication rank ascending with rankless
/// products last, ties broken by posts descending.
pub(crate) fn sort_by_rank(products: &mut [ProductRecord]) {
    products.sort_by(|a, b| match (a.rank, b.rank) {
        (Some(ra), Some(rb)) => ra
            .cmp(&rb)
            .then_with(|| b.total_posts.cmp(&a.total_posts)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.total_posts.cmp(&a.total_posts),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_rank_nulls_last() {
        let mut products = vec![
            {
                let mut p = ProductRecord::new("무순위", "고주파");
                p.total_posts = 999;
                p
            },
            {
                let mut p = ProductRecord::new("둘째", "고주파");
                p.rank = Some(2);
                p
            },
            {
                let mut p = ProductRecord::new("첫째", "초음파");
                p.rank = Some(1);
                p
            },
        ];

        sort_by_rank(&mut products);
        let keywords: Vec<&str> = products.iter().map(|p| p.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["첫째", "둘째", "무순위"]);
    }

    #[test]
    fn test_enrich_product_missing_joins_degrade() {
        let mut product = ProductRecord::new("쿨페이즈", "고주파");
        product.total_posts = 40;

        enrich_product(&mut product, &HashMap::new(), &HashMap::new());

        assert_eq!(product.search_volume, None);
        assert_eq!(product.monthly_sales, 0);
        assert_eq!(product.posts_per_thousand_search, None);
        assert_eq!(product.sales_efficiency, Some(0.0));
        assert_eq!(product.search_to_sales_rate, None);
    }
}
