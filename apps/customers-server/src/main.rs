use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use customers::{api::rest::openapi::openapi_for, Customers, CustomersConfig};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const CUSTOMERS_MODULE: &str = "customers";
const INGRESS_MODULE: &str = "api_ingress";

/// Customers Server - REST API over customer records
#[derive(Parser)]
#[command(name = "customers-server")]
#[command(about = "Customers Server - REST API over customer records")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Customers Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, &args).await,
        Commands::Check => check_config(config, &args),
    }
}

/// Module sections resolved from the config bag.
struct ModuleConfigs {
    customers: CustomersConfig,
    ingress: ApiIngressConfig,
}

fn module_configs(config: &AppConfig, args: &CliArgs) -> Result<ModuleConfigs> {
    let customers: CustomersConfig = config.module_config(CUSTOMERS_MODULE)?;
    let mut ingress: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;

    // server.host/port decide the bind address unless the ingress section sets
    // one explicitly; an explicit --port always wins.
    let explicit_bind = config
        .modules
        .get(INGRESS_MODULE)
        .and_then(|m| m.get("bind_addr"))
        .is_some();
    if !explicit_bind || args.port.is_some() {
        ingress.bind_addr = format!("{}:{}", config.server.host, config.server.port);
    }

    Ok(ModuleConfigs { customers, ingress })
}

async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = match &config.database {
        Some(db) => db.clone(),
        None => {
            tracing::warn!("No database configuration found, using the default SQLite file");
            DatabaseConfig::default()
        }
    };

    let url = db_config.resolved_url(&config.home_dir())?;
    let in_memory = url.contains(":memory:");

    let mut opts = ConnectOptions::new(url);
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    // Every pooled connection to an in-memory SQLite database sees its own empty database.
    if in_memory {
        opts.max_connections(1).min_connections(1);
    } else if let Some(max) = db_config.max_conns {
        opts.max_connections(max);
    }
    if let Some(ms) = db_config.busy_timeout_ms {
        let busy = Duration::from_millis(u64::from(ms));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));
    }

    tracing::info!("Connecting to database: {}", db_config.redacted_url());
    let db = Database::connect(opts)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

async fn run_server(config: AppConfig, args: &CliArgs) -> Result<()> {
    let modules = module_configs(&config, args)?;

    let db = connect_database(&config).await?;
    Customers::migrate(&db).await?;

    tracing::info!("Initializing modules...");
    let base_path = modules.customers.base_path.clone();
    let customers = Customers::init(db, modules.customers);
    let api = customers.register_rest(Router::new());

    let ingress = ApiIngress::new(modules.ingress);
    let router = ingress.build_router(api, Some(openapi_for(&base_path)))?;

    ingress.serve(router, shutdown_signal()).await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

fn check_config(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let modules = module_configs(&config, args)?;
    if let Some(db) = &config.database {
        db.resolved_url(Path::new(&config.server.home_dir))
            .context("database.url is not usable")?;
    }
    tracing::info!(
        customers_base_path = %modules.customers.base_path,
        bind_addr = %modules.ingress.bind_addr,
        "Configuration is valid"
    );

    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
