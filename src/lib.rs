//! Channel analytics engine for monthly marketing CSV exports.
//!
//! Raw per-month CSV sheets (blog, cafe, news, YouTube, search traffic,
//! sales) are normalized into per-product metric records with market
//! shares, search- and sales-derived ratios and RF/HIFU technology
//! breakdowns. The analytic core is pure and synchronous; all I/O lives
//! in [`loader`] and [`report`].

pub mod analysis;
pub mod config;
pub mod loader;
pub mod lookup;
pub mod models;
pub mod parse;
pub mod report;
pub mod utils;
