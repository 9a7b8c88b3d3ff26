//! 实体模型
//!
//! 只包含访问策略需要读取的属性，完整实体由存储层维护。

use fleet_common::EntityId;

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Server,
    User,
    /// 被管理用户，仅作为权限关联的目标类型出现
    ManagedUser,
    Device,
    Group,
    Calendar,
    Command,
    Geofence,
    Driver,
    Notification,
    Maintenance,
    Attribute,
}

/// 写操作的附加限制规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRule {
    /// 只受全局只读限制
    Unrestricted,
    /// 受 `device_readonly` 与设备配额限制
    Device,
    /// 受 `limit_commands` 限制
    Command,
}

impl EntityKind {
    /// 类型名称，用于拒绝原因 "<Type> access denied"
    pub fn name(&self) -> &'static str {
        match self {
            Self::Server => "Server",
            Self::User => "User",
            Self::ManagedUser => "ManagedUser",
            Self::Device => "Device",
            Self::Group => "Group",
            Self::Calendar => "Calendar",
            Self::Command => "Command",
            Self::Geofence => "Geofence",
            Self::Driver => "Driver",
            Self::Notification => "Notification",
            Self::Maintenance => "Maintenance",
            Self::Attribute => "Attribute",
        }
    }

    pub fn edit_rule(&self) -> EditRule {
        match self {
            Self::Device => EditRule::Device,
            Self::Command => EditRule::Command,
            _ => EditRule::Unrestricted,
        }
    }

    /// 对该类型对象的权限关联所使用的目标类型。
    ///
    /// 对用户的权限以 ManagedUser 关联表示，而不是 User 关联。
    pub fn permission_target(&self) -> EntityKind {
        match self {
            Self::User => Self::ManagedUser,
            other => *other,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 限制标志，服务器配置与用户记录共享同一组标志
pub trait UserRestrictions {
    fn readonly(&self) -> bool;

    fn device_readonly(&self) -> bool;

    fn limit_commands(&self) -> bool;

    fn disable_reports(&self) -> bool;
}

/// 服务器全局配置（单行记录）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Server {
    pub id: EntityId,
    pub readonly: bool,
    pub device_readonly: bool,
    pub limit_commands: bool,
    pub disable_reports: bool,
}

impl UserRestrictions for Server {
    fn readonly(&self) -> bool {
        self.readonly
    }

    fn device_readonly(&self) -> bool {
        self.device_readonly
    }

    fn limit_commands(&self) -> bool {
        self.limit_commands
    }

    fn disable_reports(&self) -> bool {
        self.disable_reports
    }
}

/// 用户记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: EntityId,
    pub administrator: bool,
    pub readonly: bool,
    pub device_readonly: bool,
    pub limit_commands: bool,
    pub disable_reports: bool,
    /// 是否可以管理其他用户
    pub manager: bool,
    /// 可拥有的设备数量上限
    pub device_limit: i32,
}

impl User {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl UserRestrictions for User {
    fn readonly(&self) -> bool {
        self.readonly
    }

    fn device_readonly(&self) -> bool {
        self.device_readonly
    }

    fn limit_commands(&self) -> bool {
        self.limit_commands
    }

    fn disable_reports(&self) -> bool {
        self.disable_reports
    }
}

/// 待校验实体的描述
///
/// 分组与日历为可选归属，缺失或非正数 ID 表示未归属，不做归属校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub group_id: Option<EntityId>,
    pub calendar_id: Option<EntityId>,
}

impl EntityRef {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            group_id: None,
            calendar_id: None,
        }
    }

    pub fn with_group(mut self, group_id: impl Into<EntityId>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<EntityId>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    /// 有效的分组归属
    pub fn group(&self) -> Option<EntityId> {
        EntityId::assigned(self.group_id)
    }

    /// 有效的日历归属
    pub fn calendar(&self) -> Option<EntityId> {
        EntityId::assigned(self.calendar_id)
    }
}

/// 权限关联：所有者 (owner) 可以访问目标 (target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionLink {
    pub owner_kind: EntityKind,
    pub owner_id: EntityId,
    pub target_kind: EntityKind,
    pub target_id: EntityId,
}

impl PermissionLink {
    /// 用户对目标对象的权限关联
    pub fn user(
        user_id: impl Into<EntityId>,
        target_kind: EntityKind,
        target_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            owner_kind: EntityKind::User,
            owner_id: user_id.into(),
            target_kind,
            target_id: target_id.into(),
        }
    }
}
