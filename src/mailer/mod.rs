//! 邮件投递模块
//!
//! 配置了网关地址时通过 HTTP JSON 投递，留空则只记录日志（开发模式）。

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::{GymSystemError, Result};

/// 待发送邮件
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 邮件投递器
pub struct Mailer {
    endpoint: Option<String>,
    from: String,
    client: reqwest::Client,
}

impl Mailer {
    pub fn new(endpoint: Option<String>, from: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| GymSystemError::mail_delivery(format!("邮件客户端初始化失败: {e}")))?;

        Ok(Self {
            endpoint,
            from,
            client,
        })
    }

    /// 按配置构建投递器
    pub fn from_config() -> Result<Self> {
        let config = AppConfig::get();
        let endpoint = if config.mail.endpoint.trim().is_empty() {
            info!("未配置邮件网关，邮件将只记录日志");
            None
        } else {
            Some(config.mail.endpoint.clone())
        };

        Self::new(endpoint, config.mail.from.clone(), config.mail.timeout)
    }

    /// 投递一封邮件
    pub async fn send(&self, mail: OutgoingMail) -> Result<()> {
        let Some(endpoint) = &self.endpoint else {
            info!("开发模式，邮件未实际发送: {} ({})", mail.to, mail.subject);
            return Ok(());
        };

        let response = self
            .client
            .post(endpoint)
            .json(&MailPayload {
                from: &self.from,
                to: &mail.to,
                subject: &mail.subject,
                body: &mail.body,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GymSystemError::mail_delivery(format!(
                "邮件网关返回错误状态: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// 投递给网关的请求体
#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_only_mode_accepts_mail() {
        let mailer = Mailer::new(None, "GymSystem <noreply@gym.test>".to_string(), 5).unwrap();

        mailer
            .send(OutgoingMail {
                to: "Ana Souza <ana@gym.test>".to_string(),
                subject: "Confirmação de matrícula".to_string(),
                body: "Olá!".to_string(),
            })
            .await
            .unwrap();
    }
}
