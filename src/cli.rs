//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::adapters::csv_adapter::{CsvAdapter, format_time, write_bars_csv, write_frame_csv};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::aggregate::aggregate;
use crate::domain::analysis::{Analysis, AnalysisConfig, analyze};
use crate::domain::config_validation::{read_analysis_config, read_timeframe, validate_analysis_config};
use crate::domain::error::TrendscopeError;
use crate::domain::ohlcv::Bar;
use crate::domain::timeframe::Timeframe;
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_PATH: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "trendscope", about = "OHLCV aggregation, indicators and trend insights")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where configuration and bar data come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory containing <SYMBOL>.csv files; overrides [data] path
    #[arg(short, long)]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dashboard report for a symbol
    Analyze {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        timeframe: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write aggregated bars as CSV
    Aggregate {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        timeframe: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write the indicator series for the display window as CSV
    Series {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        timeframe: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Analyze { source, .. }
            | Command::Aggregate { source, .. }
            | Command::Series { source, .. }
            | Command::ListSymbols { source }
            | Command::Info { source, .. } => source.config.as_deref(),
            Command::Validate { config } => Some(config),
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.command.config_path()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let level = cli
        .log_level
        .clone()
        .or_else(|| config.get_string("logging", "level"))
        .unwrap_or_else(|| "info".to_string());
    logging::init(&level);

    let result = match &cli.command {
        Command::Analyze {
            symbol,
            timeframe,
            output,
            source,
        } => run_analyze(&config, source, symbol, timeframe.as_deref(), output.as_deref()),
        Command::Aggregate {
            symbol,
            timeframe,
            output,
            source,
        } => run_aggregate(&config, source, symbol, timeframe.as_deref(), output.as_deref()),
        Command::Series {
            symbol,
            timeframe,
            output,
            source,
        } => run_series(&config, source, symbol, timeframe.as_deref(), output.as_deref()),
        Command::ListSymbols { source } => run_list_symbols(&config, source),
        Command::Info { symbol, source } => run_info(&config, source, symbol.as_deref()),
        Command::Validate { config: path } => run_validate(&config, path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Loads the INI file, or an empty configuration when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, TrendscopeError> {
    match path {
        Some(p) => {
            debug!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// CLI override first, then `[analysis] timeframe`, then the default.
pub fn resolve_timeframe(
    override_name: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Timeframe, TrendscopeError> {
    if let Some(name) = override_name {
        return name
            .parse()
            .map_err(|e: crate::domain::error::UnknownTimeframe| TrendscopeError::ConfigInvalid {
                section: "cli".to_string(),
                key: "timeframe".to_string(),
                reason: e.to_string(),
            });
    }
    Ok(read_timeframe(config)?.unwrap_or_default())
}

pub fn resolve_data_path(override_path: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, TrendscopeError> {
    validate_analysis_config(config)?;
    read_analysis_config(config)
}

/// Raw bars for `symbol`; an empty file is reported as `NoData`.
pub fn load_bars(data_port: &dyn DataPort, symbol: &str) -> Result<Vec<Bar>, TrendscopeError> {
    let bars = data_port.fetch_bars(symbol)?;
    if bars.is_empty() {
        return Err(TrendscopeError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(bars)
}

/// Bars of `symbol` grouped into `timeframe` buckets.
pub fn aggregate_symbol(
    data_port: &dyn DataPort,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<Vec<Bar>, TrendscopeError> {
    let bars = load_bars(data_port, symbol)?;
    info!(symbol, %timeframe, raw_bars = bars.len(), "aggregating");
    Ok(aggregate(&bars, timeframe))
}

pub fn run_analysis(
    data_port: &dyn DataPort,
    symbol: &str,
    timeframe: Timeframe,
    config: &AnalysisConfig,
) -> Result<Analysis, TrendscopeError> {
    let bars = load_bars(data_port, symbol)?;
    info!(symbol, %timeframe, raw_bars = bars.len(), "running analysis");
    let analysis = analyze(&bars, timeframe, config);
    debug!(
        aggregated = analysis.aggregated.len(),
        shown = analysis.display_bars().len(),
        label = %analysis.trend_label(),
        "analysis complete"
    );
    Ok(analysis)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, TrendscopeError> {
    Ok(match path {
        Some(p) => Box::new(File::create(p)?),
        None => Box::new(io::stdout().lock()),
    })
}

fn prepare(
    config: &dyn ConfigPort,
    source: &SourceArgs,
    timeframe: Option<&str>,
) -> Result<(CsvAdapter, Timeframe, AnalysisConfig), TrendscopeError> {
    let analysis_config = build_analysis_config(config)?;
    let timeframe = resolve_timeframe(timeframe, config)?;
    let data_path = resolve_data_path(source.data.as_deref(), config);
    debug!(data = %data_path.display(), %timeframe, "resolved inputs");
    Ok((CsvAdapter::new(data_path), timeframe, analysis_config))
}

fn run_analyze(
    config: &dyn ConfigPort,
    source: &SourceArgs,
    symbol: &str,
    timeframe: Option<&str>,
    output: Option<&Path>,
) -> Result<(), TrendscopeError> {
    let (data_port, timeframe, analysis_config) = prepare(config, source, timeframe)?;
    let analysis = run_analysis(&data_port, symbol, timeframe, &analysis_config)?;
    TextReportAdapter::new().write(symbol, &analysis, output)?;
    if let Some(path) = output {
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn run_aggregate(
    config: &dyn ConfigPort,
    source: &SourceArgs,
    symbol: &str,
    timeframe: Option<&str>,
    output: Option<&Path>,
) -> Result<(), TrendscopeError> {
    let (data_port, timeframe, _) = prepare(config, source, timeframe)?;
    let bars = aggregate_symbol(&data_port, symbol, timeframe)?;
    write_bars_csv(open_output(output)?, &bars)?;
    info!(symbol, bars = bars.len(), "aggregated bars written");
    Ok(())
}

fn run_series(
    config: &dyn ConfigPort,
    source: &SourceArgs,
    symbol: &str,
    timeframe: Option<&str>,
    output: Option<&Path>,
) -> Result<(), TrendscopeError> {
    let (data_port, timeframe, analysis_config) = prepare(config, source, timeframe)?;
    let analysis = run_analysis(&data_port, symbol, timeframe, &analysis_config)?;
    write_frame_csv(open_output(output)?, &analysis.frame)?;
    info!(symbol, rows = analysis.frame.len(), "indicator series written");
    Ok(())
}

fn run_list_symbols(config: &dyn ConfigPort, source: &SourceArgs) -> Result<(), TrendscopeError> {
    let data_path = resolve_data_path(source.data.as_deref(), config);
    let symbols = CsvAdapter::new(data_path.clone()).list_symbols()?;

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_path.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(
    config: &dyn ConfigPort,
    source: &SourceArgs,
    symbol: Option<&str>,
) -> Result<(), TrendscopeError> {
    let data_port = CsvAdapter::new(resolve_data_path(source.data.as_deref(), config));
    let symbols = match symbol {
        Some(s) => vec![s.to_string()],
        None => data_port.list_symbols()?,
    };

    for s in &symbols {
        match data_port.get_data_range(s) {
            Ok(Some((first, last, count))) => {
                println!(
                    "{}: {} bars, {} to {}",
                    s,
                    count,
                    format_time(first),
                    format_time(last)
                );
            }
            Ok(None) => eprintln!("{}: no data found", s),
            Err(e) if symbol.is_some() => return Err(e),
            Err(e) => warn!(symbol = %s, error = %e, "skipping unreadable symbol"),
        }
    }
    Ok(())
}

fn run_validate(config: &dyn ConfigPort, path: &Path) -> Result<(), TrendscopeError> {
    eprintln!("Validating config: {}", path.display());
    let analysis_config = build_analysis_config(config)?;
    let timeframe = resolve_timeframe(None, config)?;
    let periods = &analysis_config.periods;

    eprintln!("  timeframe:       {}", timeframe);
    eprintln!("  data path:       {}", resolve_data_path(None, config).display());
    eprintln!(
        "  pivots:          left {} / right {}",
        analysis_config.pivot_left, analysis_config.pivot_right
    );
    for indicator in periods.indicator_types() {
        eprintln!("  indicator:       {}", indicator);
    }
    eprintln!("  volume lookback: {}", analysis_config.volume_lookback);
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
