//! 通知队列后端实现

pub mod memory;
pub mod redis;
