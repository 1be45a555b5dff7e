//! 应用配置
//!
//! config.toml / config.{APP_ENV}.toml / GYMSYSTEM_* 环境变量三层叠加，
//! 启动时冻结为全局只读实例。

mod r#impl;
mod structs;

pub use structs::*;
