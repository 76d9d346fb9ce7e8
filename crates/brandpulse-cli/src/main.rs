use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use brandpulse_core::{export_filename, period_label, render_report, BrandReport, ExportFormat};
use brandpulse_monitor::{run_monitor, MockMentionSource};

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "brandpulse-cli")]
#[command(about = "BrandPulse command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance commands.
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run one monitoring pass for a brand, creating it if needed.
    Monitor {
        /// Brand name to monitor.
        name: String,
    },
    /// List active brands with mention counts.
    Brands,
    /// Alert center commands.
    Alerts {
        #[command(subcommand)]
        command: AlertCommands,
    },
    /// Render the per-brand sentiment report.
    Report {
        /// Reporting window in days.
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Output format: csv or json.
        #[arg(long, default_value = "csv")]
        format: String,
        /// Write to this path instead of stdout (default filename if a
        /// directory is given).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity.
    Ping,
    /// Apply pending migrations.
    Migrate,
    /// Upsert brands from a YAML seed file.
    Seed {
        /// Path to the seed file.
        #[arg(long, default_value = "config/brands.yaml")]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum AlertCommands {
    /// List recent alerts, newest first.
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
    /// Mark an alert as sent.
    Sent { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("brandpulse-cli: run with --help for available commands");
        return Ok(());
    };

    match command {
        Commands::Db { command } => run_db(command).await,
        Commands::Monitor { name } => run_monitor_pass(&name).await,
        Commands::Brands => list_brands().await,
        Commands::Alerts { command } => run_alerts(command).await,
        Commands::Report { days, format, out } => run_report(days, &format, out).await,
    }
}

async fn run_db(command: DbCommands) -> anyhow::Result<()> {
    let pool = brandpulse_db::connect_pool_from_env()
        .await
        .context("failed to connect to database")?;

    match command {
        DbCommands::Ping => {
            brandpulse_db::ping(&pool).await.context("ping failed")?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = brandpulse_db::run_migrations(&pool)
                .await
                .context("migration failed")?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { file } => {
            let brands = brandpulse_core::load_brands(&file)
                .with_context(|| format!("failed to load seed file {}", file.display()))?;
            let upserted = brandpulse_db::seed_brands(&pool, &brands.brands)
                .await
                .context("seeding failed")?;
            println!("seeded {upserted} brand(s)");
        }
    }
    Ok(())
}

async fn run_monitor_pass(name: &str) -> anyhow::Result<()> {
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "brand name must not be blank");

    let pool = brandpulse_db::connect_pool_from_env().await?;
    let (brand, created) = brandpulse_db::lookup_or_create_brand(&pool, name).await?;
    if created {
        println!("created brand {} (id {})", brand.name, brand.id);
    }

    let outcome = run_monitor(&pool, &MockMentionSource, &brand).await?;
    println!("added {} mention(s) for {}", outcome.mentions_added, brand.name);
    match outcome.alert {
        Some(alert) => println!("ALERT [{}] {}", alert.alert_type, alert.message),
        None => println!("no alert raised"),
    }
    Ok(())
}

async fn list_brands() -> anyhow::Result<()> {
    let pool = brandpulse_db::connect_pool_from_env().await?;
    let brands = brandpulse_db::list_brand_overview(&pool, 50).await?;
    if brands.is_empty() {
        println!("no active brands");
        return Ok(());
    }

    for b in brands {
        let health = brandpulse_core::BrandHealth::from_counts(b.positive_mentions, b.total_mentions);
        println!(
            "{:<6} {:<30} {:>6} mentions  {:>8} positive  {:>8} negative  [{}]",
            b.id, b.name, b.total_mentions, b.positive_mentions, b.negative_mentions, health
        );
    }
    Ok(())
}

async fn run_alerts(command: AlertCommands) -> anyhow::Result<()> {
    let pool = brandpulse_db::connect_pool_from_env().await?;
    match command {
        AlertCommands::List { limit } => {
            let alerts = brandpulse_db::list_alerts(&pool, limit.clamp(1, 200)).await?;
            if alerts.is_empty() {
                println!("no alerts");
                return Ok(());
            }
            for a in alerts {
                let sent = if a.is_sent { "sent" } else { "unsent" };
                println!(
                    "{:<6} {:<20} [{}] {} ({}, {})",
                    a.id,
                    a.brand_name,
                    a.alert_type,
                    a.message,
                    sent,
                    a.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        AlertCommands::Sent { id } => {
            match brandpulse_db::mark_alert_sent(&pool, id).await? {
                Some(alert) => println!("alert {} marked sent", alert.id),
                None => anyhow::bail!("alert {id} not found"),
            }
        }
    }
    Ok(())
}

async fn run_report(days: u32, format: &str, out: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::ensure!((1..=365).contains(&days), "days must be between 1 and 365");
    let format: ExportFormat = format
        .parse()
        .map_err(|_| anyhow::anyhow!("format must be csv or json"))?;

    let pool = brandpulse_db::connect_pool_from_env().await?;
    #[allow(clippy::cast_possible_wrap)]
    let rows = brandpulse_db::list_brand_reports(&pool, days as i32).await?;
    let reports: Vec<BrandReport> = rows
        .into_iter()
        .map(|row| BrandReport {
            brand: row.brand_name,
            total_mentions: row.total_mentions,
            positive_mentions: row.positive_mentions,
            negative_mentions: row.negative_mentions,
            neutral_mentions: row.neutral_mentions,
            avg_sentiment: row.avg_sentiment,
            period: period_label(days),
        })
        .collect();

    let body = render_report(&reports, format).context("nothing to export")?;

    match out {
        None => println!("{body}"),
        Some(path) => {
            let path = if path.is_dir() {
                path.join(export_filename(days, Utc::now().date_naive(), format))
            } else {
                path
            };
            std::fs::write(&path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
