use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Executor};
use tracing::{debug, info, warn};

use crate::config::Config;

/// What a fresh connection should be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Server only, no default schema.
    Server,
    /// The configured database.
    Database,
}

pub fn connect_options(config: &Config, target: Target) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password);

    match target {
        Target::Server => options,
        Target::Database => options.database(&config.db_name),
    }
}

/// Opens a single, unpooled connection.
pub async fn connect(config: &Config, target: Target) -> Result<MySqlConnection, sqlx::Error> {
    let database = match target {
        Target::Server => "",
        Target::Database => config.db_name.as_str(),
    };
    info!(
        user = %config.db_user,
        host = %config.db_host,
        port = config.db_port,
        database,
        "Connecting to MySQL"
    );

    let mut conn = connect_options(config, target).connect().await?;

    let version = server_version(&mut conn).await?;
    info!(%version, "Connected to MySQL");

    Ok(conn)
}

pub async fn server_version(conn: &mut MySqlConnection) -> Result<String, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT VERSION()")
        .fetch_one(&mut *conn)
        .await
}

/// `CREATE DATABASE IF NOT EXISTS` then switch the connection to it.
///
/// `name` must already be validated as a plain identifier.
pub async fn ensure_database(conn: &mut MySqlConnection, name: &str) -> Result<(), sqlx::Error> {
    // &str executes over the text protocol; USE cannot be prepared.
    (&mut *conn)
        .execute(format!("CREATE DATABASE IF NOT EXISTS `{name}`").as_str())
        .await?;
    info!(database = name, "Database created or already exists");

    (&mut *conn)
        .execute(format!("USE `{name}`").as_str())
        .await?;
    debug!(database = name, "Using database");

    Ok(())
}

pub async fn close(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close MySQL connection cleanly");
    } else {
        info!("MySQL connection closed");
    }
}
