//! Common library for the storefront backend
//!
//! This crate provides shared functionality used by the storefront service,
//! including database connectivity, schema migrations and error handling.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     health_check(&pool).await?;
//!     run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
