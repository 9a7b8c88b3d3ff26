//! 数据库错误映射工具
//!
//! 所有 SQLx 错误都是存储故障，统一转换为 `AppError::Database`，不做重试

use fleet_errors::AppError;
use tracing::warn;

/// 将 SQLx 错误转换为 AppError
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    let message = match &e {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("Database error ({}): {}", code, db_err),
            None => db_err.to_string(),
        },
        sqlx::Error::PoolTimedOut => "Database connection pool timeout".to_string(),
        sqlx::Error::PoolClosed => "Database connection pool is closed".to_string(),
        sqlx::Error::ColumnDecode { index, source } => {
            format!("Failed to decode column {}: {}", index, source)
        }
        sqlx::Error::Protocol(msg) => format!("Database protocol error: {}", msg),
        other => other.to_string(),
    };
    warn!(error = %message, "Storage query failed");
    AppError::database(message)
}
