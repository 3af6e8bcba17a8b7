//! PostgreSQL connectivity shared by the services in this workspace.
//!
//! # Features
//!
//! - `config` - load [`postgres::PostgresConfig`] through `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "products_api").await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
