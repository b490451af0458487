//! nlq CLI - ask questions of a relational database in plain language
//!
//! Usage:
//!   nlq --db <file> analyze
//!   nlq --db <file> map "<question>"
//!   nlq --db <file> sql "<question>" [--dialect <dialect>]
//!   nlq --db <file> run "<question>"
//!   nlq --db <file> explain "<question>"
//!   nlq --db <file> validate "<question>"
//!   nlq --db <file> suggest
//!
//! Examples:
//!   nlq --db hr.db sql "how many employees are there?"
//!   nlq --db hr.db sql "show employees hired in 2023" --dialect postgres
//!   nlq --db hr.db run "show top 5 highest paid employees"
//!   nlq --config nlq.toml suggest

use clap::{Parser, Subcommand, ValueEnum};
use nlq::config::{Settings, SettingsError};
use nlq::engine::{EngineError, QuerySession};
use nlq::metadata::SqliteProvider;
use nlq::sql::Dialect;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nlq")]
#[command(about = "nlq - Natural-language questions over auto-discovered database schemas")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to NLQ_CONFIG, ./nlq.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides the configured locator)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover the schema and print it as JSON
    Analyze,

    /// Show how a question maps onto the schema
    Map {
        /// The question to map
        question: String,
    },

    /// Print the SQL generated for a question
    Sql {
        /// The question to translate
        question: String,

        /// Dialect to render (defaults to the configured dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,
    },

    /// Answer a question against the database
    Run {
        /// The question to answer
        question: String,

        /// Skip the document search
        #[arg(long)]
        no_documents: bool,
    },

    /// Explain how a question would be processed
    Explain {
        /// The question to explain
        question: String,
    },

    /// Check whether a question can be answered, without running it
    Validate {
        /// The question to check
        question: String,
    },

    /// Suggest sample questions for the database
    Suggest,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum DialectArg {
    Sqlite,
    Postgres,
    Duckdb,
    Mysql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Mysql => Dialect::MySql,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the loaded settings.
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(db) = &self.db {
            settings.database.locator = Some(db.clone());
        }
        if let Commands::Sql {
            dialect: Some(dialect),
            ..
        } = &self.command
        {
            settings.database.dialect = (*dialect).into();
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    cli.apply_overrides(&mut settings);

    let render_dialect = settings.database.dialect;
    let locator = settings.database.resolved_locator()?;
    let include_documents = settings.query.include_documents;
    let session = QuerySession::<SqliteProvider>::open(&locator, settings).await?;

    match cli.command {
        Commands::Analyze => print_json(&*session.schema().await?)?,
        Commands::Map { question } => print_json(&session.map_query(&question).await?)?,
        Commands::Sql { question, .. } => {
            match session.render_sql(&question, render_dialect).await? {
                (_, Some(sql)) => println!("{}", sql),
                (_, None) => println!("-- No relevant tables found for this question"),
            }
        }
        Commands::Run {
            question,
            no_documents,
        } => {
            let bundle = session
                .run_query(&question, include_documents && !no_documents)
                .await?;
            print_json(&bundle)?;
        }
        Commands::Explain { question } => print_json(&session.explain(&question).await?)?,
        Commands::Validate { question } => print_json(&session.validate(&question).await?)?,
        Commands::Suggest => {
            for suggestion in session.suggestions().await? {
                println!("[{}] {}", suggestion.category, suggestion.text);
            }
        }
    }

    session.close();
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
