use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The three brands sold by the reporting company. Membership drives the
/// `isAsterasys` flag and every company sub-aggregate; this array is the
/// single source of truth for it.
pub const ASTERASYS_PRODUCTS: [&str; 3] = ["쿨페이즈", "리프테라", "쿨소닉"];

pub fn is_asterasys_product(keyword: &str) -> bool {
    ASTERASYS_PRODUCTS.contains(&keyword)
}

// ── Channel ───────────────────────────────────────────────────────────────────

/// A marketing data source. Each channel maps to one ranked CSV dataset and
/// one (structurally similar) analysis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Blog,
    Cafe,
    News,
    Youtube,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Blog, Channel::Cafe, Channel::News, Channel::Youtube];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Blog => "blog",
            Channel::Cafe => "cafe",
            Channel::News => "news",
            Channel::Youtube => "youtube",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blog" => Ok(Channel::Blog),
            "cafe" => Ok(Channel::Cafe),
            "news" => Ok(Channel::News),
            "youtube" => Ok(Channel::Youtube),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

// ── Technology segment ────────────────────────────────────────────────────────

/// Device category. Source files label products in Korean (`고주파` /
/// `초음파`); anything else collapses to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "RF")]
    Rf,
    #[serde(rename = "HIFU")]
    Hifu,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Technology {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "고주파" => Technology::Rf,
            "초음파" => Technology::Hifu,
            _ => Technology::Unknown,
        }
    }

    /// Korean display label, as the source data writes it.
    pub fn label(&self) -> &'static str {
        match self {
            Technology::Rf => "고주파",
            Technology::Hifu => "초음파",
            Technology::Unknown => "기타",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Rf => "RF",
            Technology::Hifu => "HIFU",
            Technology::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Raw rows ──────────────────────────────────────────────────────────────────

/// One CSV line as read: Korean header → cell text. Cells may be empty; a
/// blank keyword cell means "same keyword as the row above" in the grouped
/// datasets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: HashMap<String, String>,
}

impl RawRow {
    pub fn new(columns: HashMap<String, String>) -> Self {
        Self { columns }
    }

    /// Trimmed cell, `None` when the column is missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = self.columns.get(column)?.trim();
        if value.is_empty() { None } else { Some(value) }
    }

    /// Trimmed cell, empty string when missing.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RawRow {
    fn from(cells: [(&str, &str); N]) -> Self {
        Self::new(
            cells
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

// ── Lookup values ─────────────────────────────────────────────────────────────

/// Per-keyword search statistics joined from the traffic dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficStats {
    pub monthly_search_volume: u64,
    pub search_rank: Option<u32>,
}

/// Per-keyword sales figures joined from the sales dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub monthly_sales: u64,
    pub total_sales: u64,
}

// ── Product record ────────────────────────────────────────────────────────────

/// Post volume for one blog type (hospital / place / general) of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogTypeEntry {
    pub blog_type: String,
    pub posts: u64,
    pub comments: u64,
    pub replies: u64,
    pub participation: Option<f64>,
    /// This type's posts as % of the product's posts.
    pub share: Option<f64>,
}

/// One brand keyword's metrics for one channel in one month.
///
/// Joined fields keep "no data" distinguishable from zero: `search_volume`
/// is `None` when the traffic dataset has no row for the keyword, while a
/// missed sales join degrades to `0` sales. Every derived ratio is `None`
/// whenever its denominator is zero or absent, never NaN or infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub keyword: String,
    pub technology: Technology,
    pub technology_label: String,
    /// Channel-native publication-count rank, as published in the source file.
    pub rank: Option<u32>,
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_replies: u64,
    pub total_views: u64,
    pub total_engagement: u64,
    pub is_asterasys: bool,

    pub search_volume: Option<u64>,
    pub search_rank: Option<u32>,
    pub monthly_sales: u64,
    pub total_sales: u64,

    pub participation: Option<f64>,
    pub posts_per_thousand_search: Option<f64>,
    pub sales_efficiency: Option<f64>,
    pub sales_per_thousand_search: Option<f64>,
    pub search_to_sales_rate: Option<f64>,
    pub market_share: Option<f64>,
    pub technology_share: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blog_types: Vec<BlogTypeEntry>,
}

impl ProductRecord {
    /// Skeleton with identity fields set and all metrics zeroed; engines
    /// fill in volumes, joins and derived values.
    pub fn new(keyword: impl Into<String>, technology_label: &str) -> Self {
        let keyword = keyword.into();
        let technology = Technology::from_label(technology_label);
        Self {
            is_asterasys: is_asterasys_product(&keyword),
            keyword,
            technology,
            technology_label: if technology == Technology::Unknown {
                technology.label().to_string()
            } else {
                technology_label.trim().to_string()
            },
            rank: None,
            total_posts: 0,
            total_comments: 0,
            total_replies: 0,
            total_views: 0,
            total_engagement: 0,
            search_volume: None,
            search_rank: None,
            monthly_sales: 0,
            total_sales: 0,
            participation: None,
            posts_per_thousand_search: None,
            sales_efficiency: None,
            sales_per_thousand_search: None,
            search_to_sales_rate: None,
            market_share: None,
            technology_share: None,
            blog_types: Vec::new(),
        }
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Totals for all products sharing a technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologySegment {
    pub technology: Technology,
    pub label: String,
    pub posts: u64,
    pub engagement: u64,
    pub search_volume: u64,
    pub total_sales: u64,
    pub monthly_sales: u64,
    pub asterasys_posts: u64,
    pub asterasys_monthly_sales: u64,
    /// Segment posts as % of all posts in the dataset.
    pub share: Option<f64>,
    /// Company posts as % of segment posts.
    pub asterasys_share: Option<f64>,
    pub posts_per_thousand_search: Option<f64>,
    pub sales_per_thousand_search: Option<f64>,
}

/// Company-only sums nested inside [`DatasetTotals`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsterasysTotals {
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_replies: u64,
    pub total_engagement: u64,
    pub total_views: u64,
    pub search_volume: u64,
    pub total_sales: u64,
    pub monthly_sales: u64,
    pub share: Option<f64>,
    pub posts_per_thousand_search: Option<f64>,
    pub sales_per_thousand_search: Option<f64>,
    pub search_to_sales_rate: Option<f64>,
    pub products: Vec<ProductRecord>,
}

/// Channel-wide sums plus the technology and company breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetTotals {
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_replies: u64,
    pub total_engagement: u64,
    pub total_views: u64,
    pub search_volume: u64,
    pub total_sales: u64,
    pub monthly_sales: u64,
    pub average_participation: Option<f64>,
    pub posts_per_thousand_search: Option<f64>,
    pub sales_per_thousand_search: Option<f64>,
    pub search_to_sales_rate: Option<f64>,
    pub asterasys_share: Option<f64>,
    pub technology_breakdown: Vec<TechnologySegment>,
    pub asterasys: AsterasysTotals,
}

/// `buildDataset` output for one channel and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDataset {
    pub month: String,
    pub channel: Channel,
    pub products: Vec<ProductRecord>,
    pub totals: DatasetTotals,
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

/// One leaderboard row. `rank` is dense and recomputed from `total_posts`,
/// independent of the source file's published rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: u32,
    pub keyword: String,
    pub technology: Technology,
    pub technology_label: String,
    pub total_posts: u64,
    pub total_engagement: u64,
    pub participation: Option<f64>,
    pub search_volume: Option<u64>,
    pub posts_per_thousand_search: Option<f64>,
    pub monthly_sales: u64,
    pub total_sales: u64,
    pub sales_efficiency: Option<f64>,
    pub sales_per_thousand_search: Option<f64>,
    pub search_to_sales_rate: Option<f64>,
    pub market_share: Option<f64>,
    pub technology_share: Option<f64>,
    pub is_asterasys: bool,
    pub performance_score: f64,
}

/// Products partitioned by technology. `all` always holds every product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct TechnologyBuckets {
    pub all: Vec<ProductRecord>,
    pub rf: Vec<ProductRecord>,
    pub hifu: Vec<ProductRecord>,
    pub unknown: Vec<ProductRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technology_from_label() {
        assert_eq!(Technology::from_label("고주파"), Technology::Rf);
        assert_eq!(Technology::from_label(" 초음파 "), Technology::Hifu);
        assert_eq!(Technology::from_label("레이저"), Technology::Unknown);
        assert_eq!(Technology::from_label(""), Technology::Unknown);
    }

    #[test]
    fn test_company_membership_is_exact() {
        assert!(is_asterasys_product("쿨페이즈"));
        assert!(is_asterasys_product("리프테라"));
        assert!(is_asterasys_product("쿨소닉"));
        // near-matches must not qualify
        assert!(!is_asterasys_product("쿨페이즈2"));
        assert!(!is_asterasys_product("울쎄라"));
    }

    #[test]
    fn test_raw_row_blank_cells_read_as_none() {
        let row = RawRow::from([("키워드", "  "), ("그룹", "고주파")]);
        assert_eq!(row.get("키워드"), None);
        assert_eq!(row.get("그룹"), Some("고주파"));
        assert_eq!(row.text("없는 열"), "");
    }

    #[test]
    fn test_channel_parses_case_insensitively() {
        assert_eq!("Blog".parse::<Channel>(), Ok(Channel::Blog));
        assert_eq!("YOUTUBE".parse::<Channel>(), Ok(Channel::Youtube));
        assert!("radio".parse::<Channel>().is_err());
    }
}
