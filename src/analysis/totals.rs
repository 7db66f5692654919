//! Channel-wide aggregation: folds a product list into [`DatasetTotals`]
//! and annotates each product's market/technology shares once the
//! dataset-wide bases are known. Every engine funnels through here so the
//! sum and share laws hold identically across channels.

use crate::analysis::metrics::{participation, per_thousand, percent};
use crate::models::{AsterasysTotals, DatasetTotals, ProductRecord, Technology, TechnologySegment};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct SegmentAccumulator {
    label: String,
    posts: u64,
    engagement: u64,
    search_volume: u64,
    total_sales: u64,
    monthly_sales: u64,
    asterasys_posts: u64,
    asterasys_monthly_sales: u64,
}

#[derive(Debug, Default)]
struct CompanyAccumulator {
    total_posts: u64,
    total_comments: u64,
    total_replies: u64,
    total_engagement: u64,
    total_views: u64,
    search_volume: u64,
    total_sales: u64,
    monthly_sales: u64,
}

/// Fold products into totals and stamp per-product shares.
///
/// Returns the same products (shares filled in) alongside the totals; the
/// company sub-aggregate carries its own share-annotated product list,
/// sorted by posts descending.
pub fn summarize(mut products: Vec<ProductRecord>) -> (Vec<ProductRecord>, DatasetTotals) {
    let mut totals = DatasetTotals::default();
    let mut segments: BTreeMap<Technology, SegmentAccumulator> = BTreeMap::new();
    let mut company = CompanyAccumulator::default();

    for product in &products {
        let search_volume = product.search_volume.unwrap_or(0);

        totals.total_posts += product.total_posts;
        totals.total_comments += product.total_comments;
        totals.total_replies += product.total_replies;
        totals.total_engagement += product.total_engagement;
        totals.total_views += product.total_views;
        totals.search_volume += search_volume;
        totals.total_sales += product.total_sales;
        totals.monthly_sales += product.monthly_sales;

        let segment = segments.entry(product.technology).or_insert_with(|| {
            SegmentAccumulator {
                label: product.technology.label().to_string(),
                ..Default::default()
            }
        });
        segment.posts += product.total_posts;
        segment.engagement += product.total_engagement;
        segment.search_volume += search_volume;
        segment.total_sales += product.total_sales;
        segment.monthly_sales += product.monthly_sales;

        if product.is_asterasys {
            segment.asterasys_posts += product.total_posts;
            segment.asterasys_monthly_sales += product.monthly_sales;

            company.total_posts += product.total_posts;
            company.total_comments += product.total_comments;
            company.total_replies += product.total_replies;
            company.total_engagement += product.total_engagement;
            company.total_views += product.total_views;
            company.search_volume += search_volume;
            company.total_sales += product.total_sales;
            company.monthly_sales += product.monthly_sales;
        }
    }

    // shares need the finished bases, so a second pass over the products
    let total_posts = totals.total_posts;
    for product in &mut products {
        product.market_share = percent(product.total_posts, total_posts);
        product.technology_share = segments
            .get(&product.technology)
            .and_then(|segment| percent(product.total_posts, segment.posts));
    }

    let mut company_products: Vec<ProductRecord> = products
        .iter()
        .filter(|p| p.is_asterasys)
        .cloned()
        .collect();
    company_products.sort_by(|a, b| b.total_posts.cmp(&a.total_posts));

    totals.technology_breakdown = segments
        .into_iter()
        .map(|(technology, acc)| TechnologySegment {
            technology,
            label: acc.label,
            posts: acc.posts,
            engagement: acc.engagement,
            search_volume: acc.search_volume,
            total_sales: acc.total_sales,
            monthly_sales: acc.monthly_sales,
            asterasys_posts: acc.asterasys_posts,
            asterasys_monthly_sales: acc.asterasys_monthly_sales,
            share: percent(acc.posts, total_posts),
            asterasys_share: percent(acc.asterasys_posts, acc.posts),
            posts_per_thousand_search: per_thousand(acc.posts, acc.search_volume),
            sales_per_thousand_search: per_thousand(acc.monthly_sales, acc.search_volume),
        })
        .collect();

    totals.average_participation =
        participation(totals.total_comments, totals.total_replies, totals.total_posts);
    totals.posts_per_thousand_search = per_thousand(totals.total_posts, totals.search_volume);
    totals.sales_per_thousand_search = per_thousand(totals.monthly_sales, totals.search_volume);
    totals.search_to_sales_rate = percent(totals.monthly_sales, totals.search_volume);
    totals.asterasys_share = percent(company.total_posts, totals.total_posts);

    totals.asterasys = AsterasysTotals {
        share: percent(company.total_posts, totals.total_posts),
        posts_per_thousand_search: per_thousand(company.total_posts, company.search_volume),
        sales_per_thousand_search: per_thousand(company.monthly_sales, company.search_volume),
        search_to_sales_rate: percent(company.monthly_sales, company.search_volume),
        total_posts: company.total_posts,
        total_comments: company.total_comments,
        total_replies: company.total_replies,
        total_engagement: company.total_engagement,
        total_views: company.total_views,
        search_volume: company.search_volume,
        total_sales: company.total_sales,
        monthly_sales: company.monthly_sales,
        products: company_products,
    };

    (products, totals)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
