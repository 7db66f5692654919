//! File-backed row provider for the monthly raw CSV exports.
//!
//! Layout on disk mirrors the export pipeline: one directory per month,
//! one file per dataset:
//!
//! ```text
//! <raw_root>/2025-08/asterasys_total_data - blog_rank.csv
//! <raw_root>/2025-08/asterasys_total_data - traffic.csv
//! ```
//!
//! A dataset file that does not exist is a valid "no data" state and reads
//! as an empty row list; only real I/O and CSV-reader failures surface as
//! errors.

use crate::models::RawRow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

// ── Datasets ──────────────────────────────────────────────────────────────────

/// Logical dataset names, mapped to the export's file naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    BlogRank,
    CafeRank,
    NewsRank,
    YoutubeRank,
    Traffic,
    Sale,
}

impl Dataset {
    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::BlogRank => "asterasys_total_data - blog_rank.csv",
            Dataset::CafeRank => "asterasys_total_data - cafe_rank.csv",
            Dataset::NewsRank => "asterasys_total_data - news_rank.csv",
            Dataset::YoutubeRank => "asterasys_total_data - youtube_rank.csv",
            Dataset::Traffic => "asterasys_total_data - traffic.csv",
            Dataset::Sale => "asterasys_total_data - sale.csv",
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ── Provider ──────────────────────────────────────────────────────────────────

/// Reads raw rows for a given month and dataset.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    root: PathBuf,
}

impl CsvProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn dataset_path(&self, dataset: Dataset, month: &str) -> PathBuf {
        self.root.join(month).join(dataset.file_name())
    }

    /// Raw rows for one dataset in one month. Missing file → empty vec.
    /// Undecodable rows are skipped with a warning, matching how the rest
    /// of the pipeline treats partially broken sheets.
    pub fn rows(&self, dataset: Dataset, month: &str) -> Result<Vec<RawRow>, LoadError> {
        let path = self.dataset_path(dataset, month);
        if !path.exists() {
            debug!("{:?} absent for {}, treating as empty", dataset, month);
            return Ok(Vec::new());
        }

        read_rows(&path)
    }

    /// Month directories available under the raw root, ascending. Only
    /// `YYYY-MM`-shaped names count; anything else in the directory is
    /// ignored.
    pub fn discover_months(&self) -> Result<Vec<String>, LoadError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.root).map_err(|source| LoadError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut months = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if is_month_dir(name) {
                    months.push(name.to_string());
                }
            }
        }

        months.sort();
        Ok(months)
    }
}

fn is_month_dir(name: &str) -> bool {
    let Some((year, month)) = name.split_once('-') else {
        return false;
    };
    year.len() == 4
        && year.chars().all(|c| c.is_ascii_digit())
        && month.len() == 2
        && month
            .parse::<u32>()
            .is_ok_and(|m| (1..=12).contains(&m))
}

/// Read one CSV file into header-keyed rows. The first header may carry a
/// UTF-8 BOM (the sheets are exported from spreadsheet software); it is
/// stripped so column lookups by name keep working.
fn read_rows(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("row {} in {:?}: {}", i + 2, path, e);
                continue;
            }
        };

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let columns: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(RawRow::new(columns));
    }

    debug!("{:?}: {} rows", path, rows.len());
    Ok(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_month_file(root: &Path, month: &str, dataset: Dataset, content: &str) {
        let dir = root.join(month);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(dataset.file_name()), content).unwrap();
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(tmp.path());
        let rows = provider.rows(Dataset::CafeRank, "2025-08").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rows_keyed_by_header() {
        let tmp = tempfile::tempdir().unwrap();
        write_month_file(
            tmp.path(),
            "2025-08",
            Dataset::CafeRank,
            "키워드,그룹,총 발행량\n쿨페이즈,고주파,\"1,234\"\n",
        );

        let provider = CsvProvider::new(tmp.path());
        let rows = provider.rows(Dataset::CafeRank, "2025-08").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("키워드"), Some("쿨페이즈"));
        assert_eq!(rows[0].get("총 발행량"), Some("1,234"));
    }

    #[test]
    fn test_bom_on_first_header_is_stripped() {
        let tmp = tempfile::tempdir().unwrap();
        write_month_file(
            tmp.path(),
            "2025-08",
            Dataset::Traffic,
            "\u{feff}키워드,월감 검색량\n리프테라,900\n",
        );

        let provider = CsvProvider::new(tmp.path());
        let rows = provider.rows(Dataset::Traffic, "2025-08").unwrap();
        assert_eq!(rows[0].get("키워드"), Some("리프테라"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_month_file(
            tmp.path(),
            "2025-08",
            Dataset::NewsRank,
            "키워드,총 발행량\n쿨소닉,10\n,\n",
        );

        let provider = CsvProvider::new(tmp.path());
        let rows = provider.rows(Dataset::NewsRank, "2025-08").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_discover_months() {
        let tmp = tempfile::tempdir().unwrap();
        for dir in ["2025-08", "2025-07", "generated", "not-a-month", "2025-8"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }

        let provider = CsvProvider::new(tmp.path());
        let months = provider.discover_months().unwrap();
        assert_eq!(months, vec!["2025-07".to_string(), "2025-08".to_string()]);
    }

    #[test]
    fn test_discover_months_without_root() {
        let provider = CsvProvider::new("/nonexistent/raw");
        assert!(provider.discover_months().unwrap().is_empty());
    }
}
