pub mod render;

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::debug;

use crate::config::{Config, ConfigManager, View};
use crate::core::services::calendar::{
    all_years, latest_month_key, latest_year, month_short_name, months_for_year,
};
use crate::core::services::{AggregationService, CategoryClassifier, ReportInput, SummaryService};
use crate::core::utils::PathResolver;
use crate::domain::workspace::Workspace;
use crate::errors::CliError;
use crate::storage::{load_workspace_from_path, JsonStorage, WorkspaceStorage};
use crate::utils::build_info;

use self::render::{format_currency, render_summary, render_table};

/// Command-line arguments for `dashboard_cli`.
#[derive(Debug, Parser)]
#[command(name = "dashboard_cli", version, about = "Income and expense reports from a workspace file")]
pub struct Args {
    /// JSON workspace file to report on.
    #[arg(long, global = true, conflicts_with = "name")]
    pub workspace: Option<PathBuf>,

    /// Named workspace kept in the data directory.
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Data directory, overriding `DASHBOARD_CORE_HOME`.
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Category by month for one year.
    Monthly {
        #[arg(long)]
        year: Option<String>,
    },
    /// One calendar month compared across years.
    History(PeriodArgs),
    /// January through a cutoff month compared across years.
    Ytd(PeriodArgs),
    /// Latest month against the previous month and the same month last year.
    Summary,
    /// Years present in the workspace.
    Years,
    /// Months with data in a year.
    Months {
        #[arg(long)]
        year: Option<String>,
    },
    /// Build information.
    Version,
}

#[derive(Debug, ClapArgs)]
pub struct PeriodArgs {
    /// Month number, `1` to `12`.
    #[arg(long)]
    pub month: Option<String>,
    /// Years to compare; all years when omitted.
    #[arg(long, value_delimiter = ',')]
    pub years: Vec<String>,
}

/// Parses the process arguments, runs the command and prints its output.
pub fn run_cli() -> Result<(), CliError> {
    let output = execute(Args::parse())?;
    println!("{output}");
    Ok(())
}

/// Runs one parsed command and returns the text to print.
pub fn execute(args: Args) -> Result<String, CliError> {
    let base = PathResolver::resolve_base(args.home.clone());
    let mut config = ConfigManager::with_base_dir(base.clone())?.load()?;
    if args.no_color {
        config.color = false;
    }

    let command = match args.command {
        Some(command) => command,
        None => default_command(config.default_view),
    };
    if let Command::Version = command {
        return Ok(build_info::current().lines().join("\n"));
    }

    let workspace = open_workspace(&args.workspace, &args.name, base, &config)?;
    debug!(
        transactions = workspace.transactions.len(),
        ?command,
        "running report"
    );
    dispatch(command, &workspace, &config)
}

fn default_command(view: View) -> Command {
    let period = || PeriodArgs {
        month: None,
        years: Vec::new(),
    };
    match view {
        View::Monthly => Command::Monthly { year: None },
        View::History => Command::History(period()),
        View::Ytd => Command::Ytd(period()),
        View::Summary => Command::Summary,
    }
}

fn open_workspace(
    path: &Option<PathBuf>,
    name: &Option<String>,
    base: PathBuf,
    config: &Config,
) -> Result<Workspace, CliError> {
    if let Some(path) = path {
        return Ok(load_workspace_from_path(path)?);
    }
    let name = name
        .clone()
        .or_else(|| config.last_workspace.clone())
        .ok_or_else(|| CliError::Input("pass --workspace <file> or --name <workspace>".into()))?;
    let storage = JsonStorage::new(Some(base), None)?;
    Ok(storage.load(&name)?)
}

fn dispatch(command: Command, workspace: &Workspace, config: &Config) -> Result<String, CliError> {
    let txns = &workspace.transactions;
    let input = ReportInput::from(workspace);
    match command {
        Command::Monthly { year } => {
            let year = year_or_latest(year, workspace)?;
            let table = AggregationService::compute_monthly_table(input, &year);
            Ok(render_table(&table, config))
        }
        Command::History(period) => {
            let month = month_or_latest(period.month, workspace)?;
            let years = years_or_all(period.years, workspace);
            let table = AggregationService::compute_yearly_by_month_table(input, &years, &month);
            Ok(render_table(&table, config))
        }
        Command::Ytd(period) => {
            let month = month_or_latest(period.month, workspace)?;
            let years = years_or_all(period.years, workspace);
            let table = AggregationService::compute_ytd_table(input, &years, &month);
            Ok(render_table(&table, config))
        }
        Command::Summary => {
            let classifier = CategoryClassifier::from_taxonomy(&workspace.taxonomy);
            let snapshot = SummaryService::snapshot(txns, &classifier)
                .ok_or_else(|| CliError::Command("workspace has no dated transactions".into()))?;
            let mut out = render_summary(&snapshot, config);
            let totals = SummaryService::category_totals(txns, &classifier);
            for slice in SummaryService::expense_breakdown(&totals) {
                out.push_str(&format!(
                    "\n{:<28} {:>14} {:>6.1}%",
                    slice.label,
                    format_currency(slice.value, config),
                    slice.percent
                ));
            }
            Ok(out)
        }
        Command::Years => Ok(all_years(txns).join("\n")),
        Command::Months { year } => {
            let year = year_or_latest(year, workspace)?;
            Ok(months_for_year(txns, &year)
                .iter()
                .map(|month| format!("{month} {}", month_short_name(month)))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Version => Ok(build_info::current().lines().join("\n")),
    }
}

fn year_or_latest(year: Option<String>, workspace: &Workspace) -> Result<String, CliError> {
    match year {
        Some(year) if year.trim().parse::<u32>().is_ok() => Ok(year.trim().to_string()),
        Some(year) => Err(CliError::Input(format!("`{year}` is not a year"))),
        None => latest_year(&workspace.transactions)
            .ok_or_else(|| CliError::Command("workspace has no dated transactions".into())),
    }
}

/// Normalises `3` or `03` to `03`; defaults to the month of the latest transaction.
fn month_or_latest(month: Option<String>, workspace: &Workspace) -> Result<String, CliError> {
    match month {
        Some(month) => parse_month(&month),
        None => latest_month_key(&workspace.transactions)
            .and_then(|key| key.get(5..7).map(str::to_string))
            .ok_or_else(|| CliError::Command("workspace has no dated transactions".into())),
    }
}

fn parse_month(month: &str) -> Result<String, CliError> {
    match month.trim().parse::<u32>() {
        Ok(number @ 1..=12) => Ok(format!("{number:02}")),
        _ => Err(CliError::Input(format!("`{month}` is not a month between 1 and 12"))),
    }
}

fn years_or_all(years: Vec<String>, workspace: &Workspace) -> Vec<String> {
    if years.is_empty() {
        all_years(&workspace.transactions)
    } else {
        years.into_iter().map(|year| year.trim().to_string()).collect()
    }
}
