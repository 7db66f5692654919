use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use channel_analytics::analysis::{self, leaderboard::build_leaderboard};
use channel_analytics::config::AppConfig;
use channel_analytics::loader::CsvProvider;
use channel_analytics::models::Channel;
use channel_analytics::report::{ReportBuilder, resolve_month};
use channel_analytics::utils;

#[derive(Parser)]
#[command(name = "channel-analytics", about = "Marketing channel CSV analytics", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Build every channel dataset for a month and export channels.json
    Report {
        /// Month to analyze (YYYY-MM; default: configured or latest on disk)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Print a channel's volume leaderboard
    Leaderboard {
        #[arg(short, long)]
        month: Option<String>,

        /// blog, cafe, news or youtube
        #[arg(short, long, default_value = "cafe")]
        channel: String,

        /// Limit output to the top N products
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Show per-channel totals for a month
    Stats {
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List months available in the raw data directory
    Months,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "channel_analytics=info,warn",
        1 => "channel_analytics=debug,info",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;
    let provider = CsvProvider::new(&config.data.raw_root);

    match cli.command {
        Command::Report { month } => {
            let _t = utils::Timer::start("Monthly report");
            let month = resolve_month(&config, &provider, month.as_deref())?;
            let stats = ReportBuilder::new(config).run(&month)?;
            info!(
                "Done: {} channels, {} product rows, {} empty",
                stats.channels_built, stats.product_rows, stats.empty_channels
            );
        }

        Command::Leaderboard { month, channel, top } => {
            let month = resolve_month(&config, &provider, month.as_deref())?;
            let channel: Channel = channel.parse().map_err(anyhow::Error::msg)?;

            let dataset = analysis::build_dataset(&provider, channel, &month)?;
            if dataset.products.is_empty() {
                println!("No {channel} data for {month}.");
                return Ok(());
            }

            let board = build_leaderboard(&dataset.products);
            let limit = top.unwrap_or(board.len());

            println!("{channel} leaderboard — {month}");
            println!("{:<4} {:<12} {:>10} {:>8} {:>10} {:>7}", "#", "keyword", "posts", "share", "sales/mo", "score");
            for entry in board.iter().take(limit) {
                let marker = if entry.is_asterasys { "*" } else { " " };
                println!(
                    "{:<4} {:<12} {:>10} {:>8} {:>10} {:>7}",
                    format!("{}{}", entry.rank, marker),
                    entry.keyword,
                    utils::fmt_count(entry.total_posts),
                    utils::fmt_pct(entry.market_share),
                    utils::fmt_count(entry.monthly_sales),
                    entry.performance_score,
                );
            }
        }

        Command::Stats { month } => {
            let month = resolve_month(&config, &provider, month.as_deref())?;
            println!("─────────────────────────────────────────");
            println!("  Channel Analytics — {month}");
            println!("─────────────────────────────────────────");
            for channel in Channel::ALL {
                let dataset = analysis::build_dataset(&provider, channel, &month)?;
                let totals = &dataset.totals;
                println!("  {:<8} products  : {}", channel, dataset.products.len());
                println!("  {:<8} posts     : {}", "", utils::fmt_count(totals.total_posts));
                println!("  {:<8} engagement: {}", "", utils::fmt_count(totals.total_engagement));
                println!("  {:<8} avg part. : {}", "", utils::fmt_ratio(totals.average_participation, 2));
                println!("  {:<8} asterasys : {}", "", utils::fmt_pct(totals.asterasys_share));
                println!("─────────────────────────────────────────");
            }
        }

        Command::Months => {
            let months = provider.discover_months()?;
            if months.is_empty() {
                println!("No month directories — populate the raw data directory first.");
            } else {
                println!("{} months:", months.len());
                for month in &months {
                    println!("  {}", month);
                }
            }
        }
    }

    Ok(())
}
