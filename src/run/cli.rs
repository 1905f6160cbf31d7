use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use spendlens::analytics::{summarize_budgets, AnalyticsEngine};
use spendlens::error::AnalyticsError;
use spendlens::import::CsvImporter;
use spendlens::models::{CategoryId, ExpenseRecord, PeriodGranularity, PeriodKey};
use spendlens::report;
use spendlens::store::{ExpenseFilter, ExpenseStore};
use spendlens::Config;

use super::{shellexpand, GlobalOptions};

/// Flags that take a value; their values are never positional arguments.
const VALUE_FLAGS: &[&str] = &["--period", "--month", "--search", "--category", "--limit", "--delay-ms"];

pub(crate) fn as_cli(args: &[String], options: &GlobalOptions) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];

    match command.as_str() {
        "summary" | "s" => cli_summary(rest, options),
        "trend" | "t" => cli_trend(rest, options),
        "budgets" | "b" => cli_budgets(rest, options),
        "insights" | "i" => cli_insights(rest, options),
        "classify" | "c" => cli_classify(rest, options),
        "list" | "ls" => cli_list(rest, options),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendlens {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SpendLens - expense analytics from a CSV of expenses");
    println!();
    println!("Usage: spendlens <command> [options]");
    println!();
    println!("Commands:");
    println!("  summary <file.csv>            Overview, category breakdown and period totals");
    println!("    --period <week|month|quarter|year>");
    println!("  trend <file.csv>              Latest period against the one before");
    println!("    --period <week|month|quarter|year>");
    println!("  budgets <file.csv>            Budget utilization (limits from config)");
    println!("    --month <YYYY-MM>           Month to check (default: latest in file)");
    println!("  insights <file.csv>           Ranked spending insights");
    println!("  classify <description...>     Suggest a category for a description");
    println!("    --delay-ms <N>              Simulated inference delay");
    println!("  list <file.csv>               List expenses, newest first");
    println!("    --search <text>             Description contains text");
    println!("    --category <name>           Only this category");
    println!("    --limit <N>                 At most N rows");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --json                        Print JSON instead of text (report commands)");
    println!("  --config <path>               Config file (default: per-user config.json)");
    println!("  --verbose                     Debug logging to stderr");
}

// ── Commands ─────────────────────────────────────────────────

fn cli_summary(args: &[String], options: &GlobalOptions) -> Result<()> {
    let engine = build_engine(args, options)?;
    let store = load_store(args, &engine, "summary")?;
    let dashboard = engine.dashboard(store.records())?;

    if has_flag(args, "--json") {
        return print_json(&dashboard);
    }

    println!("SpendLens - {}", dashboard.overview.period_label.as_deref().unwrap_or("no data"));
    println!("{}", "─".repeat(40));
    print!("{}", report::render_overview(&dashboard.overview));
    println!();
    println!("Spending by Category:");
    print!("{}", report::render_categories(&dashboard.categories));
    println!();
    println!("Totals by {}:", engine.config().period);
    print!("{}", report::render_periods(&dashboard.periods));
    Ok(())
}

fn cli_trend(args: &[String], options: &GlobalOptions) -> Result<()> {
    let engine = build_engine(args, options)?;
    let store = load_store(args, &engine, "trend")?;
    let totals = engine.period_totals(store.records())?;

    match engine.trend(store.records()) {
        Ok(signal) => {
            if has_flag(args, "--json") {
                return print_json(&signal);
            }
            print!("{}", report::render_periods(&totals));
            println!();
            print!("{}", report::render_trend(&signal));
            Ok(())
        }
        Err(AnalyticsError::InsufficientData { periods }) => {
            println!(
                "Not enough data for a trend: need at least 2 {}s, found {periods}",
                engine.config().period
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cli_budgets(args: &[String], options: &GlobalOptions) -> Result<()> {
    let engine = build_engine(args, options)?;
    let store = load_store(args, &engine, "budgets")?;

    let month = match flag_value(args, "--month") {
        Some(m) => Some(
            PeriodKey::parse_month(m)
                .ok_or_else(|| anyhow::anyhow!("Invalid month '{m}', expected YYYY-MM"))?,
        ),
        None => None,
    };
    if engine.config().budgets.is_empty() {
        println!("No budgets configured. Add limits under \"budgets\" in the config file.");
        return Ok(());
    }

    let statuses = engine.budgets(store.records(), month)?;
    let summary = summarize_budgets(&statuses)?;

    if has_flag(args, "--json") {
        #[derive(Serialize)]
        struct BudgetReport<'a> {
            budgets: &'a [spendlens::models::BudgetStatus],
            summary: &'a spendlens::analytics::BudgetSummary,
        }
        return print_json(&BudgetReport {
            budgets: &statuses,
            summary: &summary,
        });
    }

    print!("{}", report::render_budgets(&statuses, &summary));
    Ok(())
}

fn cli_insights(args: &[String], options: &GlobalOptions) -> Result<()> {
    let engine = build_engine(args, options)?;
    let store = load_store(args, &engine, "insights")?;
    let insights = engine.insights(store.records())?;

    if has_flag(args, "--json") {
        return print_json(&insights);
    }
    print!("{}", report::render_insights(&insights));
    Ok(())
}

fn cli_classify(args: &[String], options: &GlobalOptions) -> Result<()> {
    let description = positionals(args).join(" ");
    if description.trim().is_empty() {
        anyhow::bail!("Usage: spendlens classify <description...> [--delay-ms <N>]");
    }
    let delay = match flag_value(args, "--delay-ms") {
        Some(ms) => Duration::from_millis(
            ms.parse()
                .with_context(|| format!("Invalid --delay-ms value '{ms}'"))?,
        ),
        None => Duration::ZERO,
    };

    let engine = AnalyticsEngine::new(Config::load_or_default(options.config.as_deref())?);
    let category = engine.classifier().classify_with_delay(&description, delay);
    println!("{} ({})", category.as_str(), category);
    Ok(())
}

fn cli_list(args: &[String], options: &GlobalOptions) -> Result<()> {
    let engine = build_engine(args, options)?;
    let store = load_store(args, &engine, "list")?;

    let category = match flag_value(args, "--category") {
        Some(name) => Some(
            CategoryId::parse(name).ok_or_else(|| anyhow::anyhow!("Unknown category '{name}'"))?,
        ),
        None => None,
    };
    let limit = match flag_value(args, "--limit") {
        Some(n) => Some(
            n.parse::<usize>()
                .with_context(|| format!("Invalid --limit value '{n}'"))?,
        ),
        None => None,
    };
    let filter = ExpenseFilter {
        search: flag_value(args, "--search").map(str::to_string),
        category,
        limit,
        ..ExpenseFilter::default()
    };

    let records = store.filter(&filter);
    if has_flag(args, "--json") {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No matching expenses");
        return Ok(());
    }
    print!("{}", report::render_records(records.iter().copied()));
    println!("{}", "─".repeat(40));
    println!("{} of {} expenses", records.len(), store.len());
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────

/// Config from `--config` or the default location, with `--period` applied.
fn build_engine(args: &[String], options: &GlobalOptions) -> Result<AnalyticsEngine> {
    let mut config = Config::load_or_default(options.config.as_deref())?;
    if let Some(p) = flag_value(args, "--period") {
        config.period = PeriodGranularity::parse(p)
            .ok_or_else(|| anyhow::anyhow!("Invalid period '{p}', expected week, month, quarter or year"))?;
    }
    Ok(AnalyticsEngine::new(config))
}

fn load_store(args: &[String], engine: &AnalyticsEngine, command: &str) -> Result<ExpenseStore> {
    let Some(file) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: spendlens {command} <file.csv>");
    };
    let expanded = shellexpand(file);
    let path = Path::new(&expanded);
    if !path.exists() {
        anyhow::bail!("File not found: {file}");
    }
    let records: Vec<ExpenseRecord> = CsvImporter::load(path, engine.classifier())?;
    Ok(ExpenseStore::from_records(records)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
