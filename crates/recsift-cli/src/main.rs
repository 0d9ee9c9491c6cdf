//! recsift CLI: load, clean, search, edit, and store record files without a GUI.

use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use recsift_core::config::parse_delimiter;
use recsift_core::prelude::AppConfig;
use recsift_exec::{LineTranscriber, ScriptedVoice, Session, SessionEvent, VoiceCapture};
use recsift_operators::{CellRole, LoadReport, Orientation, TableModel};
use recsift_store::{RecordStore, SqliteStore, TableSpec};

#[derive(Parser)]
#[command(name = "recsift")]
#[command(about = "Clean, search, edit, and store tabular person records", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct GlobalOpts {
    /// YAML file declaring column types (overrides RECSIFT_SCHEMA)
    #[arg(long, global = true)]
    schema: Option<String>,

    /// Infer undeclared column types from the first non-blank value
    #[arg(long, global = true)]
    infer_types: bool,

    /// Field delimiter, e.g. ";" or "tab"
    #[arg(long, global = true)]
    delimiter: Option<String>,

    /// SQLite database file (overrides RECSIFT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a file and print what cleaning did to it
    Clean {
        #[arg(short, long)]
        input: PathBuf,

        /// Print the load report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the rows whose name contains a fragment
    Search {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        name: String,
    },

    /// Load a file and send the cleaned set to the database
    Import {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print every stored row
    Query,

    /// Read a spoken name (one line of stdin) and search with it
    Voice {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Apply one validated cell edit and print the row
    Edit {
        #[arg(short, long)]
        input: PathBuf,

        /// Record id (first column of `search` output)
        #[arg(long)]
        row: usize,

        /// Column header or zero-based column index
        #[arg(long)]
        column: String,

        #[arg(long)]
        value: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Err(e) = apply_overrides(&mut config, &cli.global) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Clean { input, json } => clean(config, &input, json),
        Commands::Search { input, name } => search(config, &input, &name),
        Commands::Import { input } => import(config, &input),
        Commands::Query => query(&config),
        Commands::Voice { input } => voice(config, &input),
        Commands::Edit {
            input,
            row,
            column,
            value,
        } => edit(config, &input, row, &column, &value),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Layer command-line flags over the environment configuration.
fn apply_overrides(cfg: &mut AppConfig, opts: &GlobalOpts) -> Result<(), String> {
    if let Some(schema) = &opts.schema {
        cfg.schema_path = Some(schema.clone());
    }
    if opts.infer_types {
        cfg.infer_types = true;
    }
    if let Some(d) = &opts.delimiter {
        cfg.delimiter =
            parse_delimiter(d).ok_or_else(|| format!("invalid delimiter {d:?}"))?;
    }
    if let Some(db) = &opts.db {
        cfg.db_path = db.clone();
    }
    Ok(())
}

/// Session whose store lives in memory; for commands that never send.
fn offline_session(config: AppConfig) -> Result<Session, Box<dyn std::error::Error>> {
    let store = SqliteStore::open_in_memory(TableSpec::people(&config.table)?)?;
    Ok(Session::with_store(
        config,
        Arc::new(store),
        Arc::new(ScriptedVoice::default()),
    )?)
}

fn clean(config: AppConfig, input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = offline_session(config)?;
    let report = session.load_csv(input)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn search(config: AppConfig, input: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = offline_session(config)?;
    session.load_csv(input)?;
    session.set_fragment(name, Instant::now());
    run_due_search(&mut session);
    print_model(&session)
}

fn import(config: AppConfig, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::from_config(config, Arc::new(ScriptedVoice::default()))?;
    let report = session.load_csv(input)?;
    print_report(&report);

    session.send_to_store()?;
    match session.wait_for_store() {
        Some(event) => {
            if let Some(msg) = event.message() {
                println!("{}", msg);
            }
            match event {
                SessionEvent::Stored(done) => {
                    match done.total {
                        Some(total) => {
                            println!("Stored rows: {} (table now holds {})", done.rows, total)
                        }
                        None => println!("Stored rows: {}", done.rows),
                    }
                    Ok(())
                }
                _ => Err("send failed".into()),
            }
        }
        None => Err("send did not start".into()),
    }
}

fn query(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open_path(&config.db_path, TableSpec::people(&config.table)?)?;
    let rows = store.fetch_all()?;
    let headers: Vec<&str> = store
        .table()
        .columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();

    println!("id\t{}", headers.join("\t"));
    for row in &rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{}\t{}", row.id, cells.join("\t"));
    }
    println!("Total rows: {}", store.count()?);
    Ok(())
}

fn voice(config: AppConfig, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mic: Arc<dyn VoiceCapture> = Arc::new(LineTranscriber::new(BufReader::new(io::stdin())));
    let mut session = offline_session(config)?.with_voice(mic);
    session.load_csv(input)?;

    print!("Say a name: ");
    io::stdout().flush()?;
    session.voice_search()?;
    match session.wait_for_voice(Instant::now()) {
        Some(SessionEvent::VoiceRecognized(text)) => {
            println!("Searching for {:?}", text);
            run_due_search(&mut session);
            print_model(&session)
        }
        Some(event) => {
            println!("{}", event.message().unwrap_or_default());
            Ok(())
        }
        None => Err("voice capture did not start".into()),
    }
}

fn edit(
    config: AppConfig,
    input: &Path,
    row: usize,
    column: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = offline_session(config)?;
    session.load_csv(input)?;

    let model = session.model().ok_or("nothing loaded")?;
    let col = resolve_column(model, column).ok_or_else(|| format!("no column {column:?}"))?;
    let pos = row
        .checked_sub(1)
        .filter(|&p| p < model.row_count())
        .ok_or_else(|| format!("no record with id {row}"))?;

    session.edit(pos, col, value)?;
    let model = session.model().ok_or("nothing loaded")?;
    print_header(model);
    print_row(model, pos);
    Ok(())
}

/// Header name (case- and space-insensitive) or a plain column index.
fn resolve_column(model: &TableModel, column: &str) -> Option<usize> {
    let schema = model.records().schema();
    schema
        .find(column)
        .or_else(|| column.parse::<usize>().ok().filter(|&i| i < schema.len()))
}

/// Let the debounce delay elapse and apply the pending fragment.
fn run_due_search(session: &mut Session) {
    let due = Instant::now() + session.config().search_debounce();
    for event in session.tick(due) {
        if let SessionEvent::Filtered { visible } = event {
            tracing::debug!(visible, "filter applied");
        }
    }
}

fn print_report(report: &LoadReport) {
    println!("Initial length: {}", report.initial_rows);
    println!("Exact duplicates removed: {}", report.exact_duplicates);
    println!("Name duplicates removed: {}", report.name_duplicates);
    println!("Final length: {}", report.final_rows);
    for (column, n) in &report.coercion_failures {
        println!("  {}: {} value(s) did not fit and were cleared", column, n);
    }
    println!("Digest: {}", report.digest);
}

fn print_model(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let model = session.model().ok_or("nothing loaded")?;
    print_header(model);
    for row in 0..model.row_count() {
        print_row(model, row);
    }
    println!("{} of {} rows", model.row_count(), model.records().len());
    Ok(())
}

fn print_header(model: &TableModel) {
    let names: Vec<String> = (0..model.column_count())
        .filter_map(|c| model.header(c, Orientation::Horizontal))
        .collect();
    println!("id\t{}", names.join("\t"));
}

fn print_row(model: &TableModel, row: usize) {
    let id = model.header(row, Orientation::Vertical).unwrap_or_default();
    let cells: Vec<String> = (0..model.column_count())
        .map(|c| model.data(row, c, CellRole::Display).unwrap_or_default())
        .collect();
    println!("{}\t{}", id, cells.join("\t"));
}
