//! Cafe channel engine.
//!
//! The cafe sheet is flat (one row per keyword) and is the richest
//! channel: besides post volume it reports comments, replies and views,
//! which drive the participation metric.

use crate::analysis::{enrich_product, sort_by_rank, totals};
use crate::analysis::metrics::participation;
use crate::loader::{CsvProvider, Dataset, LoadError};
use crate::lookup::{build_sales_lookup, build_traffic_lookup};
use crate::models::{Channel, ChannelDataset, ProductRecord, RawRow, SalesStats, TrafficStats};
use crate::parse::{parse_count, parse_rank};
use std::collections::HashMap;

const COL_KEYWORD: &str = "키워드";
const COL_GROUP: &str = "그룹";
const COL_POSTS: &str = "총 발행량";
const COL_COMMENTS: &str = "총 댓글수";
const COL_REPLIES: &str = "총 대댓글수";
const COL_VIEWS: &str = "총 조회수";
const COL_RANK: &str = "발행량 순위";

pub fn build_dataset(provider: &CsvProvider, month: &str) -> Result<ChannelDataset, LoadError> {
    let rows = provider.rows(Dataset::CafeRank, month)?;
    let traffic = build_traffic_lookup(&provider.rows(Dataset::Traffic, month)?);
    let sales = build_sales_lookup(&provider.rows(Dataset::Sale, month)?, month);
    Ok(dataset_from_rows(month, &rows, &traffic, &sales))
}

/// Pure core: flat cafe rows plus the two lookups → dataset.
pub fn dataset_from_rows(
    month: &str,
    rows: &[RawRow],
    traffic: &HashMap<String, TrafficStats>,
    sales: &HashMap<String, SalesStats>,
) -> ChannelDataset {
    let products: Vec<ProductRecord> = rows
        .iter()
        .filter_map(|row| product_from_row(row, traffic, sales))
        .collect();

    let (mut products, totals) = totals::summarize(products);
    sort_by_rank(&mut products);

    ChannelDataset {
        month: month.to_string(),
        channel: Channel::Cafe,
        products,
        totals,
    }
}

fn product_from_row(
    row: &RawRow,
    traffic: &HashMap<String, TrafficStats>,
    sales: &HashMap<String, SalesStats>,
) -> Option<ProductRecord> {
    let keyword = row.get(COL_KEYWORD)?;

    let mut product = ProductRecord::new(keyword, row.text(COL_GROUP));
    product.rank = parse_rank(row.text(COL_RANK));
    product.total_posts = parse_count(row.text(COL_POSTS));
    product.total_comments = parse_count(row.text(COL_COMMENTS));
    product.total_replies = parse_count(row.text(COL_REPLIES));
    product.total_views = parse_count(row.text(COL_VIEWS));
    product.total_engagement = product.total_comments + product.total_replies;
    product.participation = participation(
        product.total_comments,
        product.total_replies,
        product.total_posts,
    );

    enrich_product(&mut product, traffic, sales);
    Some(product)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
