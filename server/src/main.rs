mod config;
mod graphql;
mod http;
#[cfg(test)]
mod test_support;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect};
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::{EmployeeInput, HrModule, SalaryCalculator, TaxTable};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "payroll-server", version, about = "Employee payroll service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert a small set of fixture employees.
    Seed,
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
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
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    let outcome = match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&app_config).await,
            MigrateCommand::Down => migrate_down(&app_config).await,
        },
        Command::Seed => run_seed(&app_config).await,
        Command::SchemaPrint { output } => schema_print(output),
    };
    shutdown_tracing();
    outcome
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database).await.map_err(Into::into)
}

fn build_hr(pool: DbPool) -> HrModule {
    HrModule::new(pool, Arc::new(SalaryCalculator::new(TaxTable::standard())))
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let hr = build_hr(pool);
    let schema = graphql::build_schema(hr.clone(), config.clone());
    let state = AppState { hr, schema, config };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `payroll-server migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}

const SEED_EMPLOYEES: &[(&str, &str, &str, f64)] = &[
    ("Jane Doe", "Software Engineer", "India", 50000.0),
    ("John Smith", "Manager", "United States", 10000.0),
    ("Hans Muller", "Engineer", "Germany", 10000.0),
    ("Dev X", "Specialist", "UK", 3000.0),
    ("Dev Y", "Specialist", "UK", 4000.0),
];

async fn run_seed(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::up(&pool, None).await?;
    let hr = build_hr(pool);
    for (full_name, job_title, country, salary) in SEED_EMPLOYEES {
        let employee = hr
            .create_employee(EmployeeInput {
                full_name: full_name.to_string(),
                job_title: job_title.to_string(),
                country: country.to_string(),
                salary: *salary,
            })
            .await
            .with_context(|| format!("failed to seed {full_name}"))?;
        info!(id = employee.id, full_name = %employee.full_name, "seeded employee");
    }
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let target = path.unwrap_or_else(|| PathBuf::from("schema.graphql"));
    std::fs::write(&target, graphql::schema_sdl())
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(path = %target.display(), "schema snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn seed_fixtures_are_valid() {
        for (full_name, job_title, country, salary) in SEED_EMPLOYEES {
            let input = EmployeeInput {
                full_name: full_name.to_string(),
                job_title: job_title.to_string(),
                country: country.to_string(),
                salary: *salary,
            };
            assert!(input.validate().is_ok(), "{full_name}");
        }
    }
}
