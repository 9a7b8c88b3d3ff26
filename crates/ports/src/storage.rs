//! 存储端口
//!
//! 存储故障统一以 `AppError::Database` 返回，调用方原样传播，不重试。

use async_trait::async_trait;
use fleet_common::EntityId;
use fleet_errors::AppResult;

use crate::model::{EntityKind, PermissionLink, Server, User};
use crate::query::Request;

/// 存储 trait
#[async_trait]
pub trait Storage: Send + Sync {
    /// 获取服务器配置（单行）
    async fn get_server(&self, request: &Request) -> AppResult<Option<Server>>;

    /// 获取用户记录
    async fn get_user(&self, request: &Request) -> AppResult<Option<User>>;

    /// 查找满足条件的对象，返回其 ID
    async fn get_object_id(&self, kind: EntityKind, request: &Request)
    -> AppResult<Option<EntityId>>;

    /// 统计 owner 指向 `target` 类型的权限关联数量
    async fn count_permissions(
        &self,
        owner: EntityKind,
        owner_id: EntityId,
        target: EntityKind,
    ) -> AppResult<u64>;

    /// 权限关联是否存在
    async fn permission_exists(&self, link: &PermissionLink) -> AppResult<bool>;
}
