use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use graham_screener::analysis::SortSpec;
use graham_screener::api::quotes::fetch_macro_snapshot;
use graham_screener::api::YahooClient;
use graham_screener::error::ScreenError;
use graham_screener::export::{write_csv, DEFAULT_EXPORT_FILE};
use graham_screener::history::{collect_price_history, PriceSeries};
use graham_screener::models::{Column, CompanyRecord, Config, GrahamThresholds, HistoryPeriod};
use graham_screener::pipeline::{run_screen, ScreenReport, ScreenRequest};
use graham_screener::registry;
use graham_screener::ui::components::display_cell;
use graham_screener::ui::run_results_view;

/// Columns printed in the plain-text tables
const TABLE_COLUMNS: [(Column, usize); 10] = [
    (Column::Name, 28),
    (Column::Ticker, 9),
    (Column::Price, 9),
    (Column::PriceEarnings, 7),
    (Column::PriceToBook, 7),
    (Column::DebtToEquity, 12),
    (Column::DividendYield, 19),
    (Column::MarketCap, 18),
    (Column::NetProfitPositive, 14),
    (Column::GrahamScore, 12),
];

#[derive(Parser)]
#[command(name = "graham-screener")]
#[command(about = "Screen SBF 120 companies against Benjamin Graham's value criteria")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, score and display the selected companies
    Screen(ScreenArgs),
    /// Show bond yields and crypto prices
    Macro,
    /// Show price history for the selected companies
    History {
        /// Chart window: 1mo, 3mo, 6mo, 1y or max
        #[arg(long, default_value = "6mo", value_parser = HistoryPeriod::parse_chart_window)]
        period: HistoryPeriod,
        #[command(flatten)]
        selection: Selection,
    },
    /// List the ticker registry
    Tickers {
        /// Fuzzy filter on "Name (SYMBOL)"
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Args)]
struct Selection {
    /// Comma-separated symbols or "Name (SYMBOL)" labels (default: whole registry)
    #[arg(long, value_delimiter = ',')]
    tickers: Option<Vec<String>>,

    /// Add the best fuzzy registry match to the selection
    #[arg(long)]
    search: Option<String>,
}

impl Selection {
    fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = match (&self.tickers, &self.search) {
            (Some(tickers), _) => tickers
                .iter()
                .map(|t| registry::symbol_from_choice(t))
                .filter(|s| !s.is_empty())
                .collect(),
            (None, Some(_)) => Vec::new(),
            (None, None) => registry::all_symbols(),
        };

        if let Some(query) = &self.search {
            match registry::search(query, 1).first() {
                Some(hit) => {
                    info!("🔍 '{}' matched {} ({})", query, hit.name, hit.symbol);
                    symbols.push(hit.symbol.to_string());
                }
                None => eprintln!("No registry entry matches '{}'", query),
            }
        }

        symbols
    }
}

#[derive(Args)]
struct ScreenArgs {
    #[command(flatten)]
    selection: Selection,

    #[arg(long, default_value_t = 15.0)]
    max_pe: f64,

    #[arg(long, default_value_t = 1.5)]
    max_pb: f64,

    /// Percent (100 means debt equals equity)
    #[arg(long, default_value_t = 100.0)]
    max_debt_equity: f64,

    /// Percent
    #[arg(long, default_value_t = 2.0)]
    min_dividend_yield: f64,

    /// Billions of euros
    #[arg(long, default_value_t = 2.0)]
    min_market_cap: f64,

    /// Column header to sort by (default: "Graham Score")
    #[arg(long)]
    sort: Option<Column>,

    #[arg(long)]
    ascending: bool,

    /// Comma-separated column headers for the CSV export
    #[arg(long, value_delimiter = ',')]
    export_columns: Vec<Column>,

    /// Write passing stocks to a CSV file
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
    export: Option<PathBuf>,

    /// Print sector, industry and description of passing stocks
    #[arg(long)]
    details: bool,

    /// Print price history of passing stocks over this window (1mo, 3mo, 6mo, 1y or max)
    #[arg(long, value_parser = HistoryPeriod::parse_chart_window)]
    chart: Option<HistoryPeriod>,

    /// Browse the results in an interactive table
    #[arg(long)]
    tui: bool,
}

impl ScreenArgs {
    fn thresholds(&self) -> GrahamThresholds {
        GrahamThresholds {
            max_pe: self.max_pe,
            max_pb: self.max_pb,
            max_debt_equity: self.max_debt_equity,
            min_dividend_yield: self.min_dividend_yield,
            min_market_cap: self.min_market_cap,
        }
    }

    fn sort(&self) -> SortSpec {
        match self.sort {
            Some(column) => SortSpec {
                column,
                ascending: self.ascending,
            },
            None => SortSpec {
                ascending: self.ascending,
                ..SortSpec::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tui = matches!(&cli.command, Commands::Screen(args) if args.tui);
    let default_filter = if tui { "graham_screener=error" } else { "graham_screener=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = Config::from_env()?;

    match cli.command {
        Commands::Tickers { search } => {
            list_tickers(search.as_deref());
            Ok(())
        }
        Commands::Macro => {
            let client = YahooClient::new(&config)?;
            for line in fetch_macro_snapshot(&client).await.lines() {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::History { period, selection } => {
            let client = YahooClient::new(&config)?;
            let records: Vec<CompanyRecord> = selection
                .symbols()
                .iter()
                .map(|symbol| CompanyRecord {
                    name: registry::display_name(symbol).unwrap_or(symbol.as_str()).to_string(),
                    ..CompanyRecord::placeholder(symbol)
                })
                .collect();
            if records.is_empty() {
                exit_empty_selection();
            }

            let series = collect_price_history(&client, &records, period).await;
            print_history(&series, period);
            Ok(())
        }
        Commands::Screen(args) => screen(&config, args).await,
    }
}

async fn screen(config: &Config, args: ScreenArgs) -> Result<()> {
    let request = match ScreenRequest::new(
        args.selection.symbols(),
        args.thresholds(),
        args.sort(),
        args.export_columns.clone(),
    ) {
        Ok(request) => request,
        Err(ScreenError::EmptySelection) => exit_empty_selection(),
        Err(e) => {
            error!("Invalid screen parameters: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };

    let client = YahooClient::new(config)?;
    let report = run_screen(&client, &request, &config.batch_config()).await?;

    if let Some(path) = &args.export {
        export_passing(&report, path)?;
    }

    if args.tui {
        return run_results_view(report);
    }

    print_report(&report);

    if args.details {
        print_details(&report.view.passing);
    }

    if let Some(period) = args.chart {
        if !report.view.passing.is_empty() {
            let series = collect_price_history(&client, &report.view.passing, period).await;
            print_history(&series, period);
        }
    }

    Ok(())
}

fn exit_empty_selection() -> ! {
    eprintln!("{}", ScreenError::EmptySelection);
    std::process::exit(1);
}

fn export_passing(report: &ScreenReport, path: &Path) -> Result<()> {
    match &report.view.export {
        Some(table) => {
            write_csv(table, path)?;
            println!("💾 Exported {} stocks to {}", table.rows.len(), path.display());
        }
        None => println!("Nothing to export: no stock meets all Graham criteria."),
    }
    Ok(())
}

fn list_tickers(search: Option<&str>) {
    match search {
        Some(query) => {
            for hit in registry::search(query, registry::TICKERS.len()) {
                println!("{}", registry::choice_label(hit.symbol, hit.name));
            }
        }
        None => {
            for choice in registry::choices() {
                println!("{}", choice);
            }
        }
    }
}

fn print_report(report: &ScreenReport) {
    println!("{}", report.thresholds);
    println!();

    println!("All selected companies ({})", report.view.full_table.len());
    print_header();
    for row in &report.view.full_table {
        print_row(&row.record, if row.highlight { "✅" } else { "  " });
    }
    println!();

    if report.view.passing.is_empty() {
        println!("⚠️ No stock meets all Graham criteria with the current thresholds.");
    } else {
        println!("Stocks meeting all Graham criteria ({})", report.view.passing.len());
        print_header();
        for record in &report.view.passing {
            print_row(record, "  ");
        }
    }

    if !report.fetch_errors.is_empty() {
        println!();
        println!("❌ Data unavailable for: {}", report.fetch_errors.join(", "));
    }
}

fn print_header() {
    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .map(|(column, width)| format!("{:<width$}", column.header(), width = *width))
        .collect();
    println!("  {}", header.join(" "));
}

fn print_row(record: &CompanyRecord, marker: &str) {
    let cells: Vec<String> = TABLE_COLUMNS
        .iter()
        .map(|(column, width)| {
            let text: String = display_cell(&record.cell(*column)).chars().take(*width).collect();
            format!("{:<width$}", text, width = *width)
        })
        .collect();
    println!("{}{}", marker, cells.join(" "));
}

fn print_details(passing: &[CompanyRecord]) {
    for record in passing {
        println!();
        println!("{} ({})", record.name, record.ticker);
        println!("  Sector: {}", record.sector);
        println!("  Industry: {}", record.industry);
        println!("  {}", record.description);
    }
}

fn print_history(series: &[PriceSeries], period: HistoryPeriod) {
    println!();
    println!("Price history ({})", period);
    if series.is_empty() {
        println!("No price history available.");
        return;
    }

    for s in series {
        let first = s.first_close().map_or("-".to_string(), |v| format!("{:.2}", v));
        let last = s.last_close().map_or("-".to_string(), |v| format!("{:.2}", v));
        let change = s.change_pct().map_or("-".to_string(), |v| format!("{:+.2}%", v));
        println!(
            "  {:<28} {:<9} {:>10} -> {:>10}  {:>8}  ({} points)",
            s.name,
            s.ticker,
            first,
            last,
            change,
            s.points.len()
        );
    }
}
