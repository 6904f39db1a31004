use clap::{Parser, Subcommand};
use sqlmigrate::{connect, init_project, read_config, MigrateConfig, MigrationResult, Migrator};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_CONFIG: &str = "sqlmigrate.json";

/// sqlmigrate - apply forward-only SQL migrations and guard their history
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the JSON configuration file
    #[arg(short, long, env = "SQLMIGRATE_CONFIG", default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Database connection URL (postgres://... or sqlite:...)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Directory holding the .sql migration files
    #[arg(short, long, env = "SQLMIGRATE_DIR")]
    dir: Option<String>,

    /// Name of the bookkeeping table
    #[arg(short, long, env = "SQLMIGRATE_TABLE")]
    table: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Apply new migrations (default)
    Up,
    /// Validate history and list pending migrations without running them
    Status,
    /// Write a configuration file and create the migrations directory
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout is reserved for the result
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse CLI arguments
    let args = Args::parse();

    let config = read_config(&args.config)
        .await?
        .unwrap_or_default()
        .with_overrides(args.database_url.clone(), args.dir.clone(), args.table.clone());

    let command = args.command.unwrap_or(Command::Up);
    if command == Command::Init {
        return init(&args.config, &config).await;
    }

    let database_url = config
        .database_url
        .as_deref()
        .ok_or("No database URL configured; pass --database-url or set DATABASE_URL")?;

    let mut db = connect(database_url).await?;
    let migrator = Migrator::new(&config.directory).table(&config.table);

    let result = match command {
        Command::Status => migrator.status(db.as_mut()).await,
        _ => migrator.run(db.as_mut()).await,
    };

    print_result(&result, args.json)?;

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

async fn init(config_path: &Path, config: &MigrateConfig) -> Result<(), Box<dyn std::error::Error>> {
    if init_project(config_path, config).await? {
        info!(config = %config_path.display(), "Wrote configuration file");
    } else {
        info!(config = %config_path.display(), "Configuration file already exists, leaving it as is");
    }

    println!("Migrations directory: {}", config.directory);
    Ok(())
}

fn print_result(result: &MigrationResult, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match result.code {
        Some(code) => println!("[{code}] {}", result.message),
        None => println!("{}", result.message),
    }
    if let Some(cause) = &result.error {
        println!("  caused by: {cause}");
    }
    match result.code {
        Some(code) if code.is_retryable() => {
            println!("  hint: fix the cause and run again")
        }
        Some(_) => println!("  hint: restore the applied migration files before running again"),
        None => {}
    }
    for pending in &result.pending {
        println!("  pending: {pending}");
    }
    Ok(())
}
