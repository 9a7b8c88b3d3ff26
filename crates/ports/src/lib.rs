//! ports - 抽象 trait 层
//!
//! 定义鉴权所需的实体模型、查询模型与存储端口

mod model;
mod query;
mod storage;

pub use model::*;
pub use query::*;
pub use storage::*;
