//! SeaORM 实体定义
//!
//! 实体只描述表结构，业务字段（时间戳转 DateTime、枚举等）在 models 里。
//! Storage 层查询后通过各实体的 into_* 方法转换成业务模型再向上返回。

pub mod prelude;

pub mod checkins;
pub mod enrollments;
pub mod help_orders;
pub mod plans;
pub mod students;
pub mod users;
