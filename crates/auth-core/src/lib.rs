//! fleet-auth-core - 鉴权核心库
//!
//! 针对单个请求中的操作用户，判定其对目标实体的操作是否被允许：
//! 管理员豁免、服务器/用户级限制标志、设备配额、分组/日历归属以及被管理用户关系。

mod permissions;

pub mod reasons;

pub use permissions::PermissionsService;
