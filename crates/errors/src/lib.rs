//! fleet-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use serde::{Deserialize, Serialize};
use thiserror::Error;

const PROBLEM_BASE: &str = "https://fleet-access.local/problems";

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 访问策略拒绝，消息为稳定的拒绝原因，可直接返回给客户端
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 存储层故障（连接、查询、解码、缺失的单例记录）
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// 是否为访问拒绝（策略结论，而非系统故障）
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    /// 拒绝原因；非 Forbidden 错误返回 None
    pub fn denial_reason(&self) -> Option<&str> {
        match self {
            Self::Forbidden(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
            Self::Database(_) => 500,
        }
    }

    /// 转换为 gRPC 状态码
    pub fn grpc_code(&self) -> tonic::Code {
        match self {
            Self::Forbidden(_) => tonic::Code::PermissionDenied,
            Self::Database(_) => tonic::Code::Internal,
        }
    }

    /// 对外可见的描述，存储层细节不外泄
    fn public_detail(&self) -> String {
        match self {
            Self::Forbidden(_) => self.to_string(),
            Self::Database(_) => "Storage unavailable".to_string(),
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: format!("{}/{}", PROBLEM_BASE, self.problem_slug()),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail: self.public_detail(),
            instance: None,
        }
    }

    fn problem_slug(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "forbidden",
            Self::Database(_) => "database",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "Forbidden",
            Self::Database(_) => "Database Error",
        }
    }
}

impl From<AppError> for tonic::Status {
    fn from(err: AppError) -> Self {
        tonic::Status::new(err.grpc_code(), err.public_detail())
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
