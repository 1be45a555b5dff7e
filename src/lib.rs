//! GymSystem - 健身房管理平台后端服务
//!
//! 基于 Actix Web 构建的健身房管理系统后端。
//!
//! # 架构
//! - `config`: 分层配置加载（文件 + 环境变量）
//! - `entity`: SeaORM 表实体
//! - `errors`: 错误类型与错误码
//! - `mailer`: 邮件投递（HTTP 网关）
//! - `middlewares`: JWT 认证、管理员鉴权、限流
//! - `models`: 请求/响应与业务模型
//! - `queue`: 通知任务队列（Memory/Redis）
//! - `routes`: 路由注册
//! - `runtime`: 启动播种与优雅停机
//! - `services`: 业务逻辑
//! - `storage`: 存储抽象与 SeaORM 实现
//! - `utils`: JWT、密码、校验等工具

pub mod config;
pub mod entity;
pub mod errors;
pub mod mailer;
pub mod middlewares;
pub mod models;
pub mod queue;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
