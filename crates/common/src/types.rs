//! 通用类型定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 实体 ID
///
/// 存储层使用自增整数主键；`0` 或负数表示"未分配"，例如设备未归属任何分组。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 是否为有效的已分配 ID (> 0)
    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }

    /// 将可选 ID 归一化：缺失或非正数都视为未设置
    pub fn assigned(id: Option<EntityId>) -> Option<EntityId> {
        id.filter(EntityId::is_assigned)
    }
}
