//! Keyword lookup tables joined into every channel dataset.

use crate::models::{RawRow, SalesStats, TrafficStats};
use crate::parse::{monthly_sales_column, parse_count, parse_rank};
use std::collections::HashMap;

// ── Traffic ───────────────────────────────────────────────────────────────────

/// Build the keyword → search-volume lookup from the traffic dataset.
/// The sheet is expected to hold one row per keyword; if a keyword repeats,
/// the last row wins.
pub fn build_traffic_lookup(rows: &[RawRow]) -> HashMap<String, TrafficStats> {
    let mut lookup = HashMap::new();

    for row in rows {
        let Some(keyword) = row.get("키워드") else {
            continue;
        };

        lookup.insert(
            keyword.to_string(),
            TrafficStats {
                monthly_search_volume: parse_count(row.text("월감 검색량")),
                search_rank: parse_rank(row.text("검색량 순위")),
            },
        );
    }

    lookup
}

// ── Sales ─────────────────────────────────────────────────────────────────────

/// Build the keyword → sales lookup from the sales dataset. The monthly
/// figure lives in a month-named column (`8월 판매량` for `2025-08`); when
/// the target month cannot be parsed, monthly sales degrade to `0` for
/// every keyword rather than failing the build.
pub fn build_sales_lookup(rows: &[RawRow], month: &str) -> HashMap<String, SalesStats> {
    let monthly_column = monthly_sales_column(month);
    let mut lookup = HashMap::new();

    for row in rows {
        let Some(keyword) = row.get("키워드") else {
            continue;
        };

        let monthly_sales = monthly_column
            .as_deref()
            .map(|column| parse_count(row.text(column)))
            .unwrap_or(0);

        lookup.insert(
            keyword.to_string(),
            SalesStats {
                monthly_sales,
                total_sales: parse_count(row.text("총 판매량")),
            },
        );
    }

    lookup
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRow;

    #[test]
    fn test_traffic_lookup() {
        let rows = vec![
            RawRow::from([("키워드", "쿨페이즈"), ("월감 검색량", "12,400"), ("검색량 순위", "3")]),
            RawRow::from([("키워드", ""), ("월감 검색량", "999")]),
        ];

        let lookup = build_traffic_lookup(&rows);
        assert_eq!(lookup.len(), 1);
        let stats = &lookup["쿨페이즈"];
        assert_eq!(stats.monthly_search_volume, 12_400);
        assert_eq!(stats.search_rank, Some(3));
    }

    #[test]
    fn test_traffic_duplicate_keyword_last_wins() {
        let rows = vec![
            RawRow::from([("키워드", "리프테라"), ("월감 검색량", "100")]),
            RawRow::from([("키워드", "리프테라"), ("월감 검색량", "250")]),
        ];

        let lookup = build_traffic_lookup(&rows);
        assert_eq!(lookup["리프테라"].monthly_search_volume, 250);
    }

    #[test]
    fn test_sales_lookup_selects_month_column() {
        let rows = vec![RawRow::from([
            ("키워드", "쿨소닉"),
            ("그룹", "초음파"),
            ("총 판매량", "1,100"),
            ("8월 판매량", "85"),
            ("9월 판매량", "90"),
        ])];

        let lookup = build_sales_lookup(&rows, "2025-08");
        let stats = &lookup["쿨소닉"];
        assert_eq!(stats.monthly_sales, 85);
        assert_eq!(stats.total_sales, 1_100);

        let lookup = build_sales_lookup(&rows, "2025-09");
        assert_eq!(lookup["쿨소닉"].monthly_sales, 90);
    }

    #[test]
    fn test_sales_lookup_with_unparseable_month() {
        let rows = vec![RawRow::from([
            ("키워드", "쿨소닉"),
            ("총 판매량", "1,100"),
            ("8월 판매량", "85"),
        ])];

        let lookup = build_sales_lookup(&rows, "latest");
        assert_eq!(lookup["쿨소닉"].monthly_sales, 0);
        assert_eq!(lookup["쿨소닉"].total_sales, 1_100);
    }
}
