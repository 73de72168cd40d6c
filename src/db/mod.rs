use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Open the database connection pool.
///
/// The traffic pattern is many short availability reads and small roster
/// writes, so the pool stays modest and recycles connections aggressively
/// rather than holding long-lived sessions.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(false);

    Ok(Database::connect(opts).await?)
}
