//! Blog channel engine.
//!
//! The blog sheet is grouped: a product spans several rows, one per blog
//! type (hospital / place / general), and writes its keyword, technology
//! and publication rank only on the first row. The walk carries those
//! forward, accumulates type-level counts, and prefers the sheet's own
//! aggregate column (`발행량합`) over the type sum when it is present.

use crate::analysis::{enrich_product, sort_by_rank, totals};
use crate::analysis::metrics::{participation, percent};
use crate::loader::{CsvProvider, Dataset, LoadError};
use crate::lookup::{build_sales_lookup, build_traffic_lookup};
use crate::models::{
    BlogTypeEntry, Channel, ChannelDataset, ProductRecord, RawRow, SalesStats, TrafficStats,
};
use crate::parse::{CarryForward, parse_count};
use std::collections::HashMap;

const COL_KEYWORD: &str = "키워드";
const COL_TECHNOLOGY: &str = "기기구분";
const COL_RANK: &str = "발행량 순위";
const COL_BLOG_TYPE: &str = "블로그유형";
const COL_TYPE_COUNT: &str = "총 개수";
const COL_COMMENTS: &str = "댓글 총 개수";
const COL_REPLIES: &str = "대댓글 총 개수";
const COL_AGGREGATE: &str = "발행량합";

/// Blog type labels as the sheet writes them → display form.
fn format_blog_type(raw: Option<&str>) -> String {
    match raw {
        Some("병원블로그") => "병원".to_string(),
        Some("플레이스블로그") => "플레이스".to_string(),
        Some("일반블로그") => "일반".to_string(),
        Some(other) => other.to_string(),
        None => "기타".to_string(),
    }
}

#[derive(Debug, Default)]
struct TypeCounts {
    blog_type: String,
    posts: u64,
    comments: u64,
    replies: u64,
}

#[derive(Debug)]
struct BlogAccumulator {
    keyword: String,
    technology_label: String,
    rank: Option<u32>,
    aggregate_posts: u64,
    type_posts: u64,
    comments: u64,
    replies: u64,
    types: Vec<TypeCounts>,
}

pub fn build_dataset(provider: &CsvProvider, month: &str) -> Result<ChannelDataset, LoadError> {
    let rows = provider.rows(Dataset::BlogRank, month)?;
    let traffic = build_traffic_lookup(&provider.rows(Dataset::Traffic, month)?);
    let sales = build_sales_lookup(&provider.rows(Dataset::Sale, month)?, month);
    Ok(dataset_from_rows(month, &rows, &traffic, &sales))
}

/// Pure core: grouped blog rows plus the two lookups → dataset.
pub fn dataset_from_rows(
    month: &str,
    rows: &[RawRow],
    traffic: &HashMap<String, TrafficStats>,
    sales: &HashMap<String, SalesStats>,
) -> ChannelDataset {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, BlogAccumulator> = HashMap::new();
    let mut carry = CarryForward::new();

    for row in rows {
        let Some(key) = carry.advance(
            row.get(COL_KEYWORD),
            row.get(COL_TECHNOLOGY),
            row.get(COL_RANK),
        ) else {
            continue;
        };

        let group = groups.entry(key.keyword.clone()).or_insert_with(|| {
            order.push(key.keyword.clone());
            BlogAccumulator {
                keyword: key.keyword.clone(),
                technology_label: key.technology_label.clone(),
                rank: key.rank,
                aggregate_posts: 0,
                type_posts: 0,
                comments: 0,
                replies: 0,
                types: Vec::new(),
            }
        });

        if !key.technology_label.is_empty() {
            group.technology_label = key.technology_label;
        }
        if group.rank.is_none() {
            group.rank = key.rank;
        }

        let aggregate = parse_count(row.text(COL_AGGREGATE));
        if aggregate > 0 {
            group.aggregate_posts = aggregate;
        }

        let posts = parse_count(row.text(COL_TYPE_COUNT));
        let comments = parse_count(row.text(COL_COMMENTS));
        let replies = parse_count(row.text(COL_REPLIES));

        group.type_posts += posts;
        group.comments += comments;
        group.replies += replies;
        group.types.push(TypeCounts {
            blog_type: format_blog_type(row.get(COL_BLOG_TYPE)),
            posts,
            comments,
            replies,
        });
    }

    let products: Vec<ProductRecord> = order
        .into_iter()
        .filter_map(|keyword| groups.remove(&keyword))
        .map(|group| finish_product(group, traffic, sales))
        .collect();

    let (mut products, totals) = totals::summarize(products);
    sort_by_rank(&mut products);

    ChannelDataset {
        month: month.to_string(),
        channel: Channel::Blog,
        products,
        totals,
    }
}

fn finish_product(
    group: BlogAccumulator,
    traffic: &HashMap<String, TrafficStats>,
    sales: &HashMap<String, SalesStats>,
) -> ProductRecord {
    let total_posts = if group.aggregate_posts > 0 {
        group.aggregate_posts
    } else {
        group.type_posts
    };

    let mut product = ProductRecord::new(group.keyword, &group.technology_label);
    product.rank = group.rank;
    product.total_posts = total_posts;
    product.total_comments = group.comments;
    product.total_replies = group.replies;
    product.total_engagement = group.comments + group.replies;
    product.participation = participation(group.comments, group.replies, total_posts);

    product.blog_types = group
        .types
        .into_iter()
        .filter(|t| t.posts > 0)
        .map(|t| BlogTypeEntry {
            participation: participation(t.comments, t.replies, t.posts),
            share: percent(t.posts, total_posts),
            blog_type: t.blog_type,
            posts: t.posts,
            comments: t.comments,
            replies: t.replies,
        })
        .collect();

    enrich_product(&mut product, traffic, sales);
    product
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Technology;

    fn blog_row(cells: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn grouped_rows() -> Vec<RawRow> {
        vec![
            blog_row(&[
                ("키워드", "쿨페이즈"),
                ("기기구분", "고주파"),
                ("발행량 순위", "2"),
                ("블로그유형", "병원블로그"),
                ("총 개수", "30"),
                ("댓글 총 개수", "12"),
                ("대댓글 총 개수", "3"),
                ("발행량합", "70"),
            ]),
            // blank keyword: belongs to 쿨페이즈
            blog_row(&[
                ("키워드", ""),
                ("블로그유형", "일반블로그"),
                ("총 개수", "40"),
                ("댓글 총 개수", "8"),
                ("대댓글 총 개수", "2"),
            ]),
            blog_row(&[
                ("키워드", "울쎄라"),
                ("기기구분", "초음파"),
                ("발행량 순위", "1"),
                ("블로그유형", "병원블로그"),
                ("총 개수", "90"),
                ("댓글 총 개수", "20"),
                ("대댓글 총 개수", "5"),
            ]),
        ]
    }

    #[test]
    fn test_carry_forward_groups_rows() {
        let dataset = dataset_from_rows("2025-08", &grouped_rows(), &HashMap::new(), &HashMap::new());

        assert_eq!(dataset.products.len(), 2);
        let coolphase = dataset
            .products
            .iter()
            .find(|p| p.keyword == "쿨페이즈")
            .unwrap();
        assert_eq!(coolphase.blog_types.len(), 2);
        assert_eq!(coolphase.total_comments, 20);
        assert_eq!(coolphase.technology, Technology::Rf);
        assert!(coolphase.is_asterasys);
    }

    #[test]
    fn test_aggregate_column_preferred_over_type_sum() {
        let dataset = dataset_from_rows("2025-08", &grouped_rows(), &HashMap::new(), &HashMap::new());

        let coolphase = dataset
            .products
            .iter()
            .find(|p| p.keyword == "쿨페이즈")
            .unwrap();
        // 발행량합 says 70 even though the type rows sum to 30 + 40
        assert_eq!(coolphase.total_posts, 70);

        let ulthera = dataset
            .products
            .iter()
            .find(|p| p.keyword == "울쎄라")
            .unwrap();
        // no aggregate column: fall back to the type sum
        assert_eq!(ulthera.total_posts, 90);
    }

    #[test]
    fn test_products_sorted_by_source_rank() {
        let dataset = dataset_from_rows("2025-08", &grouped_rows(), &HashMap::new(), &HashMap::new());
        let keywords: Vec<&str> = dataset.products.iter().map(|p| p.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["울쎄라", "쿨페이즈"]);
    }

    #[test]
    fn test_totals_obey_sum_law() {
        let dataset = dataset_from_rows("2025-08", &grouped_rows(), &HashMap::new(), &HashMap::new());
        let sum: u64 = dataset.products.iter().map(|p| p.total_posts).sum();
        assert_eq!(sum, dataset.totals.total_posts);
    }

    #[test]
    fn test_traffic_and_sales_joins() {
        let traffic = HashMap::from([(
            "쿨페이즈".to_string(),
            TrafficStats {
                monthly_search_volume: 14_000,
                search_rank: Some(4),
            },
        )]);
        let sales = HashMap::from([(
            "쿨페이즈".to_string(),
            SalesStats {
                monthly_sales: 140,
                total_sales: 1_200,
            },
        )]);

        let dataset = dataset_from_rows("2025-08", &grouped_rows(), &traffic, &sales);
        let coolphase = dataset
            .products
            .iter()
            .find(|p| p.keyword == "쿨페이즈")
            .unwrap();

        assert_eq!(coolphase.search_volume, Some(14_000));
        assert_eq!(coolphase.search_rank, Some(4));
        assert_eq!(coolphase.monthly_sales, 140);
        assert_eq!(coolphase.posts_per_thousand_search, Some(70.0 / 14_000.0 * 1000.0));
        assert_eq!(coolphase.sales_efficiency, Some(140.0 / 70.0 * 100.0));

        // unmatched keyword keeps null joins and null ratios
        let ulthera = dataset
            .products
            .iter()
            .find(|p| p.keyword == "울쎄라")
            .unwrap();
        assert_eq!(ulthera.search_volume, None);
        assert_eq!(ulthera.posts_per_thousand_search, None);
    }

    #[test]
    fn test_build_is_idempotent() {
        let rows = grouped_rows();
        let first = dataset_from_rows("2025-08", &rows, &HashMap::new(), &HashMap::new());
        let second = dataset_from_rows("2025-08", &rows, &HashMap::new(), &HashMap::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_rows_build_empty_dataset() {
        let dataset = dataset_from_rows("2025-08", &[], &HashMap::new(), &HashMap::new());
        assert!(dataset.products.is_empty());
        assert_eq!(dataset.totals.total_posts, 0);
    }
}
