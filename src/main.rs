use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod api;
mod cli;
mod config;
mod db;
mod load;
mod model;
mod report;
mod store;

use api::client::{EmployeeFetcher, FetchSettings};
use api::transport::HttpTransport;
use cli::{Cli, Command};
use config::Config;
use db::Target;
use load::{Schema, bulk_load, seed_samples};
use model::envelope::load_employees_from_json;
use store::{EmployeeStore, MySqlEmployeeStore};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    let _guard = init_tracing(&config);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Command failed");
            ExitCode::FAILURE
        }
    }
}

/// Daily rolling log file, teed to stdout.
fn init_tracing(config: &Config) -> WorkerGuard {
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking.and(std::io::stdout))
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    guard
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Fetch { echo } => {
            let transport = HttpTransport::new(HTTP_TIMEOUT)?;
            let fetcher = EmployeeFetcher::new(transport, FetchSettings::from_config(config));

            let doc = fetcher.fetch().await?;
            if echo {
                println!("Employee Data:");
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
        }

        Command::Show { limit } => {
            let employees = load_employees_from_json(&config.employees_file).await?;
            print!("{}", report::employee_summary(&employees, limit));
        }

        Command::Load { keep_existing } => {
            let employees = load_employees_from_json(&config.employees_file).await?;
            info!(count = employees.len(), "Loaded employees from JSON file");
            match employees.first() {
                Some(sample) => print!("{}", report::sample_employee(sample)),
                None => warn!("JSON file contains no employees"),
            }

            let mut conn = db::connect(config, Target::Database).await?;
            let result = bulk_load(
                &mut MySqlEmployeeStore::new(&mut conn),
                &employees,
                !keep_existing,
            )
            .await;
            db::close(conn).await;

            let report = result.context("Failed to insert employees into database")?;
            info!(
                cleared = report.cleared,
                inserted = report.inserted,
                "Inserted employees with computed yearly salaries"
            );
            println!(
                "Total employees in database after insertion: {}",
                report.total
            );
        }

        Command::Init { skip_seed } => {
            let mut conn = db::connect(config, Target::Server).await?;
            let result = init_database(&mut conn, config, skip_seed).await;
            db::close(conn).await;

            let rows = result.context("Failed to create database or table")?;
            println!("\nCurrent employees in the database:");
            print!("{}", report::table_rows(&rows));
        }

        Command::Reset => {
            let mut conn = db::connect(config, Target::Database).await?;
            let result =
                seed_samples(&mut MySqlEmployeeStore::new(&mut conn), Schema::DropAndRecreate).await;
            db::close(conn).await;

            let report = result.context("Failed to update table structure")?;
            println!(
                "Total records in the new employees table: {}",
                report.total
            );
        }

        Command::List => {
            let mut conn = db::connect(config, Target::Database).await?;
            let result = MySqlEmployeeStore::new(&mut conn).list().await;
            db::close(conn).await;

            let rows = result.context("Failed to read employees")?;
            print!("{}", report::table_rows(&rows));
        }

        Command::Ping => {
            let mut conn = db::connect(config, Target::Server)
                .await
                .context("Failed to connect to database; check that MySQL is running, the credentials are correct and the host and port are reachable")?;
            let version = db::server_version(&mut conn).await;
            db::close(conn).await;

            println!("MySQL Server version: {}", version?);
        }
    }

    Ok(())
}

async fn init_database(
    conn: &mut sqlx::MySqlConnection,
    config: &Config,
    skip_seed: bool,
) -> Result<Vec<model::employee::EmployeeRow>, sqlx::Error> {
    db::ensure_database(conn, &config.db_name).await?;

    let mut store = MySqlEmployeeStore::new(conn);
    if skip_seed {
        store.ensure_table().await?;
    } else {
        let report = seed_samples(&mut store, Schema::CreateIfMissing).await?;
        info!(inserted = report.inserted, "Seeded sample employees");
    }

    store.list().await
}
