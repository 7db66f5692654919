//! News channel engine: article volume and publication rank per keyword,
//! no reader engagement in the source sheet.

use crate::analysis::volume_dataset_from_rows;
use crate::loader::{CsvProvider, Dataset, LoadError};
use crate::lookup::{build_sales_lookup, build_traffic_lookup};
use crate::models::{Channel, ChannelDataset, RawRow, SalesStats, TrafficStats};
use std::collections::HashMap;

pub fn build_dataset(provider: &CsvProvider, month: &str) -> Result<ChannelDataset, LoadError> {
    let rows = provider.rows(Dataset::NewsRank, month)?;
    let traffic = build_traffic_lookup(&provider.rows(Dataset::Traffic, month)?);
    let sales = build_sales_lookup(&provider.rows(Dataset::Sale, month)?, month);
    Ok(dataset_from_rows(month, &rows, &traffic, &sales))
}

pub fn dataset_from_rows(
    month: &str,
    rows: &[RawRow],
    traffic: &HashMap<String, TrafficStats>,
    sales: &HashMap<String, SalesStats>,
) -> ChannelDataset {
    volume_dataset_from_rows(Channel::News, month, rows, traffic, sales)
}
