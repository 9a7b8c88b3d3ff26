//! 权限检查服务
//!
//! 每个请求创建一个实例。服务器配置与用户记录在实例生命周期内最多各查询一次，
//! 之后不刷新；需要最新数据时请创建新实例。

use std::collections::HashMap;
use std::sync::Arc;

use fleet_common::EntityId;
use fleet_errors::{AppError, AppResult};
use fleet_ports::{
    Columns, Condition, EditRule, EntityKind, EntityRef, PermissionLink, Request, Server, Storage,
    User, UserRestrictions,
};
use metrics::counter;
use tokio::sync::{OnceCell, RwLock};
use tracing::debug;

use crate::reasons;

/// 权限检查服务
///
/// 判定顺序:
/// 1. 自身访问（用户访问自己的记录）直接允许
/// 2. 管理员直接允许
/// 3. 服务器或用户任一方设置了限制标志即拒绝
/// 4. 归属类检查需要存在对应的权限关联
pub struct PermissionsService<S>
where
    S: Storage,
{
    storage: Arc<S>,
    server: OnceCell<Server>,
    users: RwLock<HashMap<EntityId, Arc<User>>>,
}

impl<S> PermissionsService<S>
where
    S: Storage,
{
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            server: OnceCell::new(),
            users: RwLock::new(HashMap::new()),
        }
    }

    async fn server(&self) -> AppResult<&Server> {
        self.server
            .get_or_try_init(|| async {
                self.storage
                    .get_server(&Request::all())
                    .await?
                    .ok_or_else(|| AppError::database("Server configuration not found"))
            })
            .await
    }

    async fn user(&self, user_id: EntityId) -> AppResult<Arc<User>> {
        if let Some(user) = self.users.read().await.get(&user_id) {
            return Ok(user.clone());
        }

        let request = Request::all().with_condition(Condition::id(user_id));
        let user = self
            .storage
            .get_user(&request)
            .await?
            .ok_or_else(|| AppError::database(format!("User {} not found", user_id)))?;

        let mut users = self.users.write().await;
        Ok(users.entry(user_id).or_insert_with(|| Arc::new(user)).clone())
    }

    /// 用户是否不是管理员
    pub async fn not_admin(&self, user_id: EntityId) -> AppResult<bool> {
        Ok(!self.user(user_id).await?.administrator)
    }

    /// 要求管理员权限
    pub async fn check_admin(&self, user_id: EntityId) -> AppResult<()> {
        if self.not_admin(user_id).await? {
            return Err(denied("check_admin", user_id, None, reasons::ADMIN_REQUIRED));
        }
        granted("check_admin")
    }

    /// 检查任意限制标志
    ///
    /// `restricted` 对服务器配置与用户记录分别求值，任一返回 true 即拒绝。
    pub async fn check_restriction<F>(&self, user_id: EntityId, restricted: F) -> AppResult<()>
    where
        F: Fn(&dyn UserRestrictions) -> bool,
    {
        let user = self.user(user_id).await?;
        if user.administrator {
            return granted("check_restriction");
        }

        let server: &dyn UserRestrictions = self.server().await?;
        let user: &dyn UserRestrictions = &*user;
        if restricted(server) || restricted(user) {
            return Err(denied("check_restriction", user_id, None, reasons::OPERATION_RESTRICTED));
        }
        granted("check_restriction")
    }

    /// 检查对某类实体的写权限
    pub async fn check_edit(
        &self,
        user_id: EntityId,
        kind: EntityKind,
        addition: bool,
    ) -> AppResult<()> {
        let user = self.user(user_id).await?;
        if user.administrator {
            return granted("check_edit");
        }

        let server = self.server().await?;
        let rejected = if server.readonly || user.readonly {
            true
        } else {
            match kind.edit_rule() {
                // 新增设备只看配额，不叠加 device_readonly
                EditRule::Device if addition => {
                    let count = self
                        .storage
                        .count_permissions(EntityKind::User, user_id, EntityKind::Device)
                        .await?;
                    quota_exceeded(count, user.device_limit)
                }
                EditRule::Device => server.device_readonly || user.device_readonly,
                EditRule::Command => server.limit_commands || user.limit_commands,
                EditRule::Unrestricted => false,
            }
        };

        if rejected {
            return Err(denied("check_edit", user_id, Some(kind), reasons::WRITE_DENIED));
        }
        granted("check_edit")
    }

    /// 检查对具体实体的写权限，包括分组与日历归属
    pub async fn check_edit_entity(
        &self,
        user_id: EntityId,
        entity: &EntityRef,
        addition: bool,
    ) -> AppResult<()> {
        if !self.not_admin(user_id).await? {
            return granted("check_edit_entity");
        }

        self.check_edit(user_id, entity.kind, addition).await?;

        if let Some(group_id) = entity.group() {
            self.check_permission(EntityKind::Group, user_id, group_id)
                .await?;
        }

        if let Some(calendar_id) = entity.calendar() {
            let link = PermissionLink::user(user_id, EntityKind::Calendar, calendar_id);
            if !self.storage.permission_exists(&link).await? {
                return Err(denied(
                    "check_edit_entity",
                    user_id,
                    Some(entity.kind),
                    reasons::WRITE_DENIED,
                ));
            }
        }

        granted("check_edit_entity")
    }

    /// 检查对其他用户的管理权限
    pub async fn check_user(&self, user_id: EntityId, managed_user_id: EntityId) -> AppResult<()> {
        if user_id == managed_user_id {
            return granted("check_user");
        }

        let user = self.user(user_id).await?;
        if user.administrator {
            return granted("check_user");
        }

        let manages = user.manager
            && self
                .storage
                .permission_exists(&PermissionLink::user(
                    user_id,
                    EntityKind::ManagedUser,
                    managed_user_id,
                ))
                .await?;
        if !manages {
            return Err(denied(
                "check_user",
                user_id,
                Some(EntityKind::User),
                reasons::USER_DENIED,
            ));
        }
        granted("check_user")
    }

    /// 检查对某个对象的访问权限
    pub async fn check_permission(
        &self,
        kind: EntityKind,
        user_id: EntityId,
        object_id: EntityId,
    ) -> AppResult<()> {
        if kind == EntityKind::User && user_id == object_id {
            return granted("check_permission");
        }

        if !self.not_admin(user_id).await? {
            return granted("check_permission");
        }

        let request = Request::new(Columns::Include(vec!["id"])).with_condition(
            Condition::id(object_id).and(Condition::permission(
                EntityKind::User,
                user_id,
                kind.permission_target(),
            )),
        );
        if self.storage.get_object_id(kind, &request).await?.is_none() {
            return Err(denied(
                "check_permission",
                user_id,
                Some(kind),
                reasons::object_denied(kind),
            ));
        }
        granted("check_permission")
    }
}

/// 已有设备数达到上限。上限为负数时同样视为已满。
fn quota_exceeded(count: u64, limit: i32) -> bool {
    i64::try_from(count).unwrap_or(i64::MAX) >= i64::from(limit)
}

fn granted(check: &'static str) -> AppResult<()> {
    counter!("permission_checks_total", "check" => check, "allowed" => "true").increment(1);
    Ok(())
}

/// 记录拒绝并生成 Forbidden 错误。`kind` 为空表示该检查不针对具体实体类型。
fn denied(
    check: &'static str,
    user_id: EntityId,
    kind: Option<EntityKind>,
    reason: impl Into<String>,
) -> AppError {
    let reason = reason.into();
    let kind = kind.map(|kind| kind.name());
    debug!(%user_id, check, kind, %reason, "Permission denied");
    counter!("permission_checks_total", "check" => check, "allowed" => "false").increment(1);
    AppError::forbidden(reason)
}
