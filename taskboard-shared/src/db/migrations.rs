/// Embedded schema migrations
///
/// The SQL files under `taskboard-shared/migrations/` are compiled into the
/// binary with `sqlx::migrate!`, so a deployed server can bring its database up
/// to date without the source tree. Applied versions are tracked by sqlx in the
/// `_sqlx_migrations` table.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::migrations::{applied_migrations, run_migrations};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// run_migrations(&pool).await?;
/// println!("{} migrations applied", applied_migrations(&pool).await?);
/// # Ok(())
/// # }
/// ```

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPool;
use tracing::{error, info};

/// Migrations embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies every pending migration
///
/// Each migration runs in its own transaction; a failure leaves earlier ones
/// applied and stops.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Running database migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema up to date");
    Ok(())
}

/// Number of successfully applied migrations
pub async fn applied_migrations(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !exists {
        return Ok(0);
    }

    sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
        .fetch_one(pool)
        .await
}
