//! 拒绝原因
//!
//! 稳定的、可直接暴露给客户端的原因字符串，只包含实体类型名，不包含数据。

use fleet_ports::EntityKind;

pub const ADMIN_REQUIRED: &str = "Administrator access required";

pub const OPERATION_RESTRICTED: &str = "Operation restricted";

pub const WRITE_DENIED: &str = "Write access denied";

pub const USER_DENIED: &str = "User access denied";

/// "<Type> access denied"
pub fn object_denied(kind: EntityKind) -> String {
    format!("{} access denied", kind.name())
}
