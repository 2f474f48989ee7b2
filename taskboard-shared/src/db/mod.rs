/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health check
/// - `migrations`: Embedded schema migrations
///
/// Models (and their SQL) live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
