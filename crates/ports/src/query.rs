//! 查询模型
//!
//! 存储层查询请求：列投影 + 过滤条件。列名均为编译期常量。

use fleet_common::EntityId;

use crate::model::EntityKind;

/// 列投影
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    All,
    Include(Vec<&'static str>),
}

/// 过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals {
        column: &'static str,
        value: i64,
    },
    And(Box<Condition>, Box<Condition>),
    /// 仅保留 owner 通过权限关联（目标类型为 `target`）可达的行
    Permission {
        owner: EntityKind,
        owner_id: EntityId,
        target: EntityKind,
    },
}

impl Condition {
    pub fn equals(column: &'static str, value: i64) -> Self {
        Self::Equals { column, value }
    }

    pub fn id(id: EntityId) -> Self {
        Self::equals("id", id.value())
    }

    pub fn permission(owner: EntityKind, owner_id: EntityId, target: EntityKind) -> Self {
        Self::Permission {
            owner,
            owner_id,
            target,
        }
    }

    pub fn and(self, other: Condition) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }
}

/// 查询请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub columns: Columns,
    pub condition: Option<Condition>,
}

impl Request {
    pub fn new(columns: Columns) -> Self {
        Self {
            columns,
            condition: None,
        }
    }

    pub fn all() -> Self {
        Self::new(Columns::All)
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}
