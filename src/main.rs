use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use review_quota_tracker::aggregate;
use review_quota_tracker::calendar;
use review_quota_tracker::config::TrackerConfig;
use review_quota_tracker::crossfilter::{scoped_cases, CategorySelection, CategoryTables};
use review_quota_tracker::dataset;
use review_quota_tracker::filters::{selection, RecordFilter};
use review_quota_tracker::logging::{self, Verbosity};
use review_quota_tracker::quota::{FixedQuota, QuotaSource};
use review_quota_tracker::report::{self, format_count};
use review_quota_tracker::Role;

#[derive(Parser)]
#[command(name = "review-quota")]
#[command(about = "Quota and delay tracker for case review pipelines", long_about = None)]
struct Cli {
    /// Case sheet exported as CSV
    #[arg(long)]
    csv: PathBuf,
    /// TOML config file (falls back to REVIEW_QUOTA_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Treat this date as today instead of the clock
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(short, long)]
    verbose: bool,
    #[arg(short, long)]
    quiet: bool,
    #[command(flatten)]
    filters: FilterArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    analyst: Option<String>,
    #[arg(long)]
    supervisor: Option<String>,
    #[arg(long)]
    professional: Option<String>,
    #[arg(long)]
    level: Option<String>,
    /// Case state; an empty value selects unassigned cases
    #[arg(long)]
    state: Option<String>,
    /// Keep cases whose first attributable subject is in this delay category
    #[arg(long)]
    category: Option<CategorySelection>,
}

impl FilterArgs {
    fn record_filter(&self) -> RecordFilter {
        RecordFilter {
            analyst: selection(self.analyst.as_deref()),
            supervisor: selection(self.supervisor.as_deref()),
            professional: selection(self.professional.as_deref()),
            level: selection(self.level.as_deref()),
            state: selection(self.state.as_deref()),
        }
    }

    fn scope_label(&self) -> Option<&str> {
        self.supervisor
            .as_deref()
            .or(self.analyst.as_deref())
            .or(self.professional.as_deref())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Program-wide totals and state mix
    Overview,
    /// Quota, categories and summary table for one role
    Role {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        json: bool,
    },
    /// Delay category of every subject across all roles
    Categories {
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    let config = TrackerConfig::resolve(cli.config.as_deref()).context("failed to load config")?;
    let today = match cli.date {
        Some(date) => date,
        None => calendar::reference_today(config.timezone()?),
    };
    let start = config.start_date;

    let source: Box<dyn QuotaSource> = match &config.quota_schedule {
        Some(path) => Box::new(
            dataset::load_schedule(path)
                .with_context(|| format!("failed to read quota sheet {}", path.display()))?,
        ),
        None => Box::new(FixedQuota),
    };

    let cases = dataset::load_cases(&cli.csv, &config.columns)
        .with_context(|| format!("failed to read case sheet {}", cli.csv.display()))?;
    let cases = scoped_cases(
        source.as_ref(),
        &cases,
        &cli.filters.record_filter(),
        cli.filters.category.unwrap_or_default(),
        start,
        today,
    );

    match cli.command {
        Commands::Overview => {
            if cases.is_empty() {
                println!("No data to display.");
                return Ok(());
            }
            let program = aggregate::program_overview(&cases, start, today);
            println!("Business days considered: {}", program.business_days);
            println!("Total cases: {}", format_count(program.total_cases as i64));
            println!("Audited: {}", format_count(program.audited as i64));
            println!("Review team: {}", format_count(program.team_size as i64));
            println!("Unassigned: {}", format_count(program.unassigned as i64));
            println!(
                "Progress: {} of {}",
                format_count(program.progressed as i64),
                format_count(program.total_cases as i64)
            );
            println!("State mix:");
            for share in aggregate::state_distribution(&cases) {
                println!(
                    "- {}: {} ({:.1}%)",
                    share.state.display_label(),
                    format_count(share.count as i64),
                    share.percent
                );
            }
        }
        Commands::Role { role, json } => {
            let section = report::role_section(source.as_ref(), &cases, role, start, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&section.rows)?);
                return Ok(());
            }
            let mut output = String::new();
            report::write_role_section(&mut output, &section);
            print!("{output}");
        }
        Commands::Categories { json } => {
            let tables = CategoryTables::compute(source.as_ref(), &cases, start, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
                return Ok(());
            }
            for role in Role::ALL {
                let rows = tables.for_role(role);
                println!("{role}:");
                if rows.is_empty() {
                    println!("  No data to display.");
                }
                for row in rows {
                    println!("  - {} ({}) {}", row.subject, row.team, row.category);
                }
            }
        }
        Commands::Report { out } => {
            let report = report::build_report(
                source.as_ref(),
                &cases,
                start,
                today,
                cli.filters.scope_label(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
