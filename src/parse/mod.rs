//! Scalar coercion and row-grouping helpers shared by every dataset parser.
//!
//! The source sheets are hand-maintained: numbers carry thousands
//! separators or stray unit characters, and grouped datasets write a
//! keyword only on its first row. Everything here degrades instead of
//! failing. A cell that cannot be read is a `0` or a `None`, never an
//! error.

// ── Numeric coercion ──────────────────────────────────────────────────────────

/// Parse a count cell: strip separators and any non-numeric characters,
/// truncate decimals. `"1,234"` → 1234 | `"1,234명"` → 1234 | junk → 0.
pub fn parse_count(raw: &str) -> u64 {
    let value = parse_float(raw);
    if value <= 0.0 { 0 } else { value as u64 }
}

/// Parse a numeric cell to `f64`, `0.0` when nothing parseable remains.
pub fn parse_float(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse a rank cell. Ranks are positive; `0`, blanks and junk are `None`.
pub fn parse_rank(raw: &str) -> Option<u32> {
    let value = parse_count(raw);
    if value == 0 { None } else { u32::try_from(value).ok() }
}

// ── Carry-forward grouping ────────────────────────────────────────────────────

/// Key cells resolved for one row of a grouped dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedKey {
    pub keyword: String,
    pub technology_label: String,
    pub rank: Option<u32>,
}

/// Accumulator for datasets where a keyword (and its technology/rank) is
/// written only on the first row of a group and left blank on the rest.
/// Each field carries forward independently until a later row overwrites
/// it; rows seen before any keyword resolve to `None` and are dropped by
/// callers.
#[derive(Debug, Default)]
pub struct CarryForward {
    keyword: Option<String>,
    technology_label: String,
    rank: Option<u32>,
}

impl CarryForward {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row's key cells through the accumulator and resolve the
    /// row's effective keyword/technology/rank.
    pub fn advance(
        &mut self,
        keyword_cell: Option<&str>,
        technology_cell: Option<&str>,
        rank_cell: Option<&str>,
    ) -> Option<ResolvedKey> {
        if let Some(keyword) = keyword_cell {
            self.keyword = Some(keyword.to_string());
        }

        if let Some(label) = technology_cell {
            self.technology_label = label.to_string();
        }

        if let Some(rank) = rank_cell.and_then(parse_rank) {
            self.rank = Some(rank);
        }

        Some(ResolvedKey {
            keyword: self.keyword.clone()?,
            technology_label: self.technology_label.clone(),
            rank: self.rank,
        })
    }
}

// ── Month-keyed sales column ──────────────────────────────────────────────────

/// Column holding a month's sales in the sales sheet. The sheet names the
/// column with the bare numeric month, no zero padding: `"2025-08"` →
/// `"8월 판매량"`. `None` when the input is not a `YYYY-MM` month.
pub fn monthly_sales_column(month: &str) -> Option<String> {
    let part = month.split('-').nth(1)?;
    let numeric: u32 = part.trim().parse().ok()?;
    if !(1..=12).contains(&numeric) {
        return None;
    }
    Some(format!("{numeric}월 판매량"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1,234"), 1234);
        assert_eq!(parse_count(" 12 345 "), 12345);
        assert_eq!(parse_count("1,234명"), 1234);
        assert_eq!(parse_count("12.7"), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count("N/A"), 0);
        assert_eq!(parse_count("-42"), 0);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("1,234.5"), 1234.5);
        assert_eq!(parse_float("abc"), 0.0);
        assert_eq!(parse_float(""), 0.0);
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank("3"), Some(3));
        assert_eq!(parse_rank("0"), None);
        assert_eq!(parse_rank(""), None);
        assert_eq!(parse_rank("순위없음"), None);
    }

    #[test]
    fn test_carry_forward_resolves_blank_keywords() {
        let mut carry = CarryForward::new();

        let first = carry.advance(Some("A"), Some("고주파"), Some("1")).unwrap();
        assert_eq!(first.keyword, "A");
        assert_eq!(first.technology_label, "고주파");
        assert_eq!(first.rank, Some(1));

        // blank row belongs to the group above it
        let second = carry.advance(None, None, None).unwrap();
        assert_eq!(second.keyword, "A");
        assert_eq!(second.technology_label, "고주파");
        assert_eq!(second.rank, Some(1));

        let third = carry.advance(Some("B"), Some("초음파"), Some("2")).unwrap();
        assert_eq!(third.keyword, "B");
        assert_eq!(third.technology_label, "초음파");
        assert_eq!(third.rank, Some(2));
    }

    #[test]
    fn test_carry_forward_before_any_keyword() {
        let mut carry = CarryForward::new();
        assert_eq!(carry.advance(None, Some("고주파"), None), None);
    }

    #[test]
    fn test_monthly_sales_column() {
        assert_eq!(monthly_sales_column("2025-08").as_deref(), Some("8월 판매량"));
        assert_eq!(monthly_sales_column("2025-09").as_deref(), Some("9월 판매량"));
        assert_eq!(monthly_sales_column("2025-11").as_deref(), Some("11월 판매량"));
        assert_eq!(monthly_sales_column("2025"), None);
        assert_eq!(monthly_sales_column("2025-13"), None);
        assert_eq!(monthly_sales_column("nonsense"), None);
        assert_eq!(monthly_sales_column(""), None);
    }
}
