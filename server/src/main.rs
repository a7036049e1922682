mod config;
mod http;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use platform_db::{
    DatabaseSettings, DbEmployeeStore, DbPool, EmployeeStore, StaticEmployeeStore, connect,
};
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "lumon-server", version, about = "Lumon employees API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert the default employees into an empty table.
    Seed,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing(ObsConfig::from_env()?)?;
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    let result = match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&app_config).await,
            MigrateCommand::Down => migrate_down(&app_config).await,
        },
        Command::Seed => run_seed(&app_config).await,
    };
    shutdown_tracing();
    result
}

fn database_settings(config: &AppConfig) -> DatabaseSettings {
    let settings = DatabaseSettings::new(config.database_uri.clone());
    match config.db_max_connections {
        Some(max) => settings.with_max_connections(max),
        None => settings,
    }
}

async fn setup_pool(settings: &DatabaseSettings) -> Result<DbPool> {
    connect(settings)
        .await
        .context("failed to connect to the database")
}

async fn open_store(config: &AppConfig, allow_dirty: bool) -> Result<Arc<dyn EmployeeStore>> {
    if let Some(path) = &config.employees_json {
        let store = StaticEmployeeStore::from_path(path).await?;
        if config.pre_populate {
            info!("static employee file in use; pre-population skipped");
        }
        return Ok(Arc::new(store));
    }

    let settings = database_settings(config);
    let pool = setup_pool(&settings).await?;
    ensure_migrations(&pool, &settings, allow_dirty).await?;
    let store = DbEmployeeStore::new(pool);
    if config.pre_populate {
        platform_db::ensure_seeded(&store).await?;
    }
    Ok(Arc::new(store))
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    if config.api_key.is_none() {
        warn!("LUMON_API_KEY is not set; every protected request will be rejected");
    }
    let store = open_store(&config, cmd.allow_dirty).await?;
    let state = AppState::new(store, config.clone());
    http::serve((&cmd).into(), state).await
}

/// SQLite databases are usually scratch files or in-memory, so they are
/// migrated on start; other backends must be migrated explicitly.
async fn ensure_migrations(
    pool: &DbPool,
    settings: &DatabaseSettings,
    allow_dirty: bool,
) -> Result<()> {
    if settings.is_sqlite() {
        Migrator::up(pool, None).await?;
        return Ok(());
    }
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `lumon-server migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    let settings = database_settings(config);
    let pool = setup_pool(&settings).await?;
    ensure_migrations(&pool, &settings, false).await?;
    let store = DbEmployeeStore::new(pool);
    let inserted = platform_db::ensure_seeded(&store).await?;
    if inserted == 0 {
        info!("employees table already populated; nothing seeded");
    }
    Ok(())
}

async fn migrate_up(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(&database_settings(config)).await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(&database_settings(config)).await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
