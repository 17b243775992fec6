//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool, no shared connection behind a mutex
//! - List operations fetch relations set-wise, no N+1 queries
//! - Rely on DB constraints and map violations, no check-then-insert
//! - Transactions for multi-step operations

pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;

pub use pool::{create_pool, ping, PoolSettings};
pub use sqlx::PgPool;
pub use repos::*;
