//! Database connection pool.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Open the connection pool. The caller owns it and hands it to the app as
/// `web::Data<DatabaseConnection>`.
pub async fn connect(database_url: String) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let conn = Database::connect(opts).await?;
    log::info!("Database pool initialized");
    Ok(conn)
}
