//! fleet-adapter-postgres - PostgreSQL 适配器

mod connection;
mod error_mapper;
mod naming;
mod query;
mod storage;

pub use connection::*;
pub use error_mapper::map_sqlx_error;
pub use storage::PostgresStorage;
