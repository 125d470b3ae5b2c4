use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::error::AppResult;

pub async fn connect_and_migrate(options: impl Into<ConnectOptions>) -> AppResult<DatabaseConnection> {
    let db = Database::connect(options).await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA journal_mode=WAL".to_string(),
    ))
    .await?;

    // Every handler commits before it responds; FULL keeps that commit on disk.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA synchronous=FULL".to_string(),
    ))
    .await?;

    Migrator::up(&db, None).await?;
    tracing::debug!("database migrations applied");

    Ok(db)
}
