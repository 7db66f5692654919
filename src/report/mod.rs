//! Report orchestrator: ties loader → channel engines → JSON export.
//!
//! One run builds every channel for a month and writes the combined
//! `channels.json` the dashboard layer consumes. Channels whose raw file
//! is absent come out empty rather than failing the month: a report with
//! three populated channels and one empty one is still a report.

use crate::analysis;
use crate::config::AppConfig;
use crate::loader::CsvProvider;
use crate::models::{Channel, ChannelDataset};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use tracing::{info, warn};

/// Everything exported for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: String,
    pub generated_at: NaiveDateTime,
    pub channels: BTreeMap<String, ChannelDataset>,
}

#[derive(Debug)]
pub struct ReportStats {
    pub channels_built: usize,
    pub product_rows: usize,
    pub empty_channels: usize,
}

pub struct ReportBuilder {
    config: AppConfig,
}

impl ReportBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Build all channels for `month` and write `<out_dir>/<month>/channels.json`.
    pub fn run(&self, month: &str) -> Result<ReportStats> {
        let provider = CsvProvider::new(&self.config.data.raw_root);

        let mut channels = BTreeMap::new();
        let mut product_rows = 0usize;
        let mut empty_channels = 0usize;

        for channel in Channel::ALL {
            let dataset = analysis::build_dataset(&provider, channel, month)
                .with_context(|| format!("build_dataset({channel}, {month})"))?;

            if dataset.products.is_empty() {
                warn!("{}: no rows for {}", channel, month);
                empty_channels += 1;
            } else {
                info!(
                    "{}: {} products, {} posts (asterasys {:.1}%)",
                    channel,
                    dataset.products.len(),
                    dataset.totals.total_posts,
                    dataset.totals.asterasys_share.unwrap_or(0.0),
                );
            }

            product_rows += dataset.products.len();
            channels.insert(channel.as_str().to_string(), dataset);
        }

        let report = MonthlyReport {
            month: month.to_string(),
            generated_at: chrono::Utc::now().naive_utc(),
            channels,
        };

        let out_dir = self.config.report.out_dir.join(month);
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("could not create {:?}", out_dir))?;

        let out_path = out_dir.join("channels.json");
        let json = if self.config.report.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        fs::write(&out_path, json).with_context(|| format!("could not write {:?}", out_path))?;

        info!("report written to {:?}", out_path);

        Ok(ReportStats {
            channels_built: Channel::ALL.len(),
            product_rows,
            empty_channels,
        })
    }
}

/// Month to analyze: the explicit request, then the configured default,
/// then the newest month present on disk.
pub fn resolve_month(
    config: &AppConfig,
    provider: &CsvProvider,
    requested: Option<&str>,
) -> Result<String> {
    if let Some(month) = requested {
        return Ok(month.to_string());
    }
    if let Some(month) = &config.data.default_month {
        return Ok(month.clone());
    }

    provider
        .discover_months()?
        .pop()
        .context("no month directories found — pass --month or populate the raw data directory")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
