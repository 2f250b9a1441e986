//! Terminal front-end for the finanzas tracker.

use std::io::{self, BufRead as _, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use finanzas_rs::chart::{BarChart, ChartSurface};
use finanzas_rs::error::{FinanzasError, Result};
use finanzas_rs::format::Locale;
use finanzas_rs::models::{CsvUpload, NewTransaction, TransactionId};
use finanzas_rs::tracker::TrackerBlocking;
use finanzas_rs::view::{TableRow, Tone, ViewModel};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Environment variable name for the server URL.
const URL_ENV: &str = "FINANZAS_URL";

/// Width of the longest chart bar, in characters.
const CHART_WIDTH: usize = 40;

/// finanzas CLI: browse and edit your income and expenses.
#[derive(Debug, Parser)]
#[command(name = "finanzas", version, about)]
struct Cli {
    /// Server base URL (default: $FINANZAS_URL or http://127.0.0.1:5600).
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    /// Display locale: es-py or en.
    #[arg(long, global = true, default_value = "es-py", value_parser = parse_locale)]
    locale: Locale,
    /// Print the view as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Show totals, transactions grouped by day, monthly summary and chart.
    List,
    /// Record a new transaction.
    Add(AddArgs),
    /// Delete a transaction by id.
    Delete {
        /// Transaction id (shown in the last column of `list`).
        id: TransactionId,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Import a bank statement CSV.
    Import {
        /// CSV file to upload.
        file: Option<PathBuf>,
    },
}

/// Arguments for the `add` subcommand.
#[derive(Debug, Args)]
struct AddArgs {
    /// Free-text label.
    #[arg(long)]
    concepto: String,
    /// Amount (non-negative).
    #[arg(long)]
    monto: String,
    /// `ingreso` or `egreso`.
    #[arg(long)]
    tipo: String,
}

/// Parses a locale name for clap.
fn parse_locale(s: &str) -> core::result::Result<Locale, String> {
    s.parse()
}

/// Chooses the server URL: flag, then environment, then the client default.
fn resolve_base_url(flag: Option<String>, env: Option<String>) -> Option<String> {
    flag.or(env).filter(|url| !url.trim().is_empty())
}

/// Draws charts as horizontal text bars and keeps the live one in memory.
#[derive(Debug)]
struct TerminalSurface {
    /// Locale for bar values.
    locale: Locale,
    /// Live chart: handle and rendered text.
    drawn: Option<(u64, String)>,
    /// Last handle issued.
    next: u64,
}

impl TerminalSurface {
    /// Creates an empty surface.
    const fn new(locale: Locale) -> Self {
        Self {
            locale,
            drawn: None,
            next: 0,
        }
    }

    /// Returns the text of the live chart, if any.
    fn text(&self) -> Option<&str> {
        self.drawn.as_ref().map(|drawn| drawn.1.as_str())
    }
}

impl ChartSurface for TerminalSurface {
    type Handle = u64;

    fn create(&mut self, _target: &str, chart: &BarChart) -> Result<Self::Handle> {
        self.next = self.next.saturating_add(1);
        self.drawn = Some((self.next, draw_bars(chart, self.locale)));
        Ok(self.next)
    }

    fn destroy(&mut self, handle: Self::Handle) {
        if self.drawn.as_ref().is_some_and(|drawn| drawn.0 == handle) {
            self.drawn = None;
        }
    }
}

/// Renders a bar chart as text, one line per bar.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "bar lengths are small non-negative integers"
)]
fn draw_bars(chart: &BarChart, locale: Locale) -> String {
    let max = chart.max_value();
    let label_width = chart
        .bars
        .iter()
        .map(|bar| bar.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!("{}", chart.dataset_label.bold())];
    for (idx, bar) in chart.bars.iter().enumerate() {
        let len = if max > 0.0_f64 {
            ((bar.value / max) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        let body = "\u{2588}".repeat(len);
        let colored = if idx == 0 {
            format!("{}", body.green())
        } else {
            format!("{}", body.red())
        };
        lines.push(format!(
            "{:<label_width$} \u{2502}{colored} {}",
            bar.label,
            locale.format_currency(bar.value)
        ));
    }
    lines.join("\n")
}

/// Asks a yes/no question on the terminal. Anything but yes is no.
fn prompt_confirm(prompt: &str) -> bool {
    let mut err = io::stderr().lock();
    if write!(err, "{prompt} [s/N] ").and_then(|()| err.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}

/// Prints an error as an alert line and logs the full error.
fn report_error(err: &FinanzasError, locale: Locale) -> io::Result<ExitCode> {
    tracing::debug!(error = %err, kind = ?err.kind(), "operation failed");
    writeln!(
        io::stderr().lock(),
        "{} {}",
        "error:".red().bold(),
        err.user_message(locale)
    )?;
    Ok(ExitCode::FAILURE)
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let locale = cli.locale;

    let mut builder = TrackerBlocking::builder(TerminalSurface::new(locale)).locale(locale);
    if let Some(url) = resolve_base_url(cli.base_url, std::env::var(URL_ENV).ok()) {
        builder = builder.base_url(url);
    }
    let mut tracker = match builder.build() {
        Ok(tracker) => tracker,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to build client: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&mut tracker, cli.command, cli.json)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch(
    tracker: &mut TrackerBlocking<TerminalSurface>,
    command: Command,
    json: bool,
) -> io::Result<ExitCode> {
    match command {
        Command::List => cmd_list(tracker, json),
        Command::Add(args) => cmd_add(tracker, &args, json),
        Command::Delete { id, yes } => cmd_delete(tracker, id, yes, json),
        Command::Import { file } => cmd_import(tracker, file, json),
    }
}

/// Executes the `list` subcommand.
fn cmd_list(tracker: &mut TrackerBlocking<TerminalSurface>, json: bool) -> io::Result<ExitCode> {
    let spinner = make_spinner(tracker.locale().loading_message());
    let result = tracker.load();
    spinner.finish_and_clear();
    match result {
        Ok(view) => {
            print_view(&view, tracker.chart().surface().text(), json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report_error(&err, tracker.locale()),
    }
}

/// Executes the `add` subcommand.
fn cmd_add(
    tracker: &mut TrackerBlocking<TerminalSurface>,
    args: &AddArgs,
    json: bool,
) -> io::Result<ExitCode> {
    let payload = match NewTransaction::from_form(&args.concepto, &args.monto, &args.tipo) {
        Ok(payload) => payload,
        Err(err) => return report_error(&err, tracker.locale()),
    };

    let spinner = make_spinner(tracker.locale().saving_message());
    let result = tracker.create(&payload);
    spinner.finish_and_clear();
    match result {
        Ok(view) => {
            print_view(&view, tracker.chart().surface().text(), json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report_error(&err, tracker.locale()),
    }
}

/// Executes the `delete` subcommand.
fn cmd_delete(
    tracker: &mut TrackerBlocking<TerminalSurface>,
    id: TransactionId,
    yes: bool,
    json: bool,
) -> io::Result<ExitCode> {
    let result = if yes {
        tracker.delete(id, &|_: &str| true)
    } else {
        tracker.delete(id, &prompt_confirm)
    };
    match result {
        Ok(Some(view)) => {
            print_view(&view, tracker.chart().surface().text(), json)?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            if json {
                print_json(&serde_json::json!({ "cancelled": true }))?;
            } else {
                writeln!(
                    io::stdout().lock(),
                    "{}",
                    tracker.locale().cancelled_message().dimmed()
                )?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report_error(&err, tracker.locale()),
    }
}

/// Executes the `import` subcommand.
fn cmd_import(
    tracker: &mut TrackerBlocking<TerminalSurface>,
    file: Option<PathBuf>,
    json: bool,
) -> io::Result<ExitCode> {
    let upload = match file.as_deref().map(CsvUpload::from_path).transpose() {
        Ok(upload) => upload,
        Err(err) => return report_error(&err, tracker.locale()),
    };

    let spinner = make_spinner(tracker.locale().importing_message());
    let result = tracker.import_csv(upload.as_ref());
    spinner.finish_and_clear();
    match result {
        Ok(report) => {
            if json {
                print_json(&serde_json::json!({
                    "mensaje": report.message,
                    "view": report.view,
                }))?;
            } else {
                writeln!(io::stdout().lock(), "{}", report.message.green().bold())?;
                print_view(&report.view, tracker.chart().surface().text(), false)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report_error(&err, tracker.locale()),
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints a full view: totals, table, monthly summary and chart.
fn print_view(view: &ViewModel, chart: Option<&str>, json: bool) -> io::Result<()> {
    if json {
        return print_json(view);
    }

    let mut out = io::stdout().lock();

    print_totals(&mut out, view)?;
    writeln!(out)?;
    if view.is_empty() {
        writeln!(out, "{}", view.locale.empty_message().dimmed())?;
    } else {
        writeln!(out, "{}", build_table(view))?;
    }
    writeln!(out)?;
    print_monthly(&mut out, view)?;
    if let Some(text) = chart {
        writeln!(out)?;
        writeln!(out, "{text}")?;
    }
    Ok(())
}

/// Prints any serializable value as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(io::stdout().lock(), "{text}")
}

/// Prints the income, expense and balance line.
fn print_totals<W: io::Write>(out: &mut W, view: &ViewModel) -> io::Result<()> {
    let balance = if view.totals.balance_negative {
        format!("{}", view.totals.balance.red().bold())
    } else {
        format!("{}", view.totals.balance.bold())
    };
    writeln!(
        out,
        "{} {}   {} {}   {} {balance}",
        format!("{}:", view.locale.income_label()).dimmed(),
        view.totals.ingresos.green().bold(),
        format!("{}:", view.locale.expense_label()).dimmed(),
        view.totals.egresos.red().bold(),
        format!("{}:", view.locale.balance_label()).dimmed(),
    )
}

/// Builds the grouped transaction table.
fn build_table(view: &ViewModel) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(
        view.locale
            .table_headers()
            .map(|heading| Cell::new(heading).fg(Color::Cyan)),
    );

    for row in &view.rows {
        match *row {
            TableRow::DateHeader { ref date } => {
                _ = table.add_row(vec![
                    Cell::new(format!("\u{1f4c5} {date}")).fg(Color::DarkGrey),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
            TableRow::Entry(ref entry) => {
                let color = match entry.tone {
                    Tone::Success => Color::Green,
                    Tone::Danger => Color::Red,
                };
                _ = table.add_row(vec![
                    Cell::new(&entry.time),
                    Cell::new(&entry.concepto),
                    Cell::new(&entry.amount).fg(color),
                    Cell::new(&entry.badge).fg(color),
                    Cell::new(entry.id).fg(Color::DarkGrey),
                ]);
            }
        }
    }
    table
}

/// Prints the monthly summary list.
fn print_monthly<W: io::Write>(out: &mut W, view: &ViewModel) -> io::Result<()> {
    writeln!(out, "{}", view.locale.monthly_title().green().bold())?;
    if view.monthly.is_empty() {
        writeln!(out, "  {}", "\u{2014}".dimmed())?;
    }
    for month in &view.monthly {
        writeln!(
            out,
            "  {:<16} {} {}",
            month.label.bold(),
            format!("+{}", month.ingresos).green(),
            format!("-{}", month.egresos).red()
        )?;
    }
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr may itself be broken here.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
