//! 通知任务定义与邮件渲染
//!
//! 线格式为 {"job": "...", "payload": {...}}，redis 后端落盘的就是这个 JSON，
//! 外部 worker 也可以按同样的格式消费。

use serde::{Deserialize, Serialize};

use crate::errors::{GymSystemError, Result};
use crate::mailer::OutgoingMail;
use crate::models::{
    enrollments::responses::EnrollmentListItem, help_orders::responses::HelpOrderWithStudent,
};

/// 通知任务
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "job", content = "payload")]
pub enum NotifyJob {
    /// 报名确认邮件（载荷带学员与套餐摘要）
    ConfirmationMail(EnrollmentListItem),
    /// 工单回复邮件（载荷带学员摘要）
    AnswerMail(HelpOrderWithStudent),
}

impl NotifyJob {
    /// 任务类型名，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            NotifyJob::ConfirmationMail(_) => "ConfirmationMail",
            NotifyJob::AnswerMail(_) => "AnswerMail",
        }
    }

    /// 渲染为待发送邮件
    ///
    /// 载荷缺少学员/套餐摘要时无法定位收件人，返回错误由 worker 记录后跳过。
    pub fn into_mail(self) -> Result<OutgoingMail> {
        match self {
            NotifyJob::ConfirmationMail(item) => {
                let student = item.student.as_ref().ok_or_else(|| {
                    GymSystemError::validation("报名确认任务缺少学员摘要")
                })?;
                let plan = item.plan.as_ref().ok_or_else(|| {
                    GymSystemError::validation("报名确认任务缺少套餐摘要")
                })?;

                Ok(OutgoingMail {
                    to: format!("{} <{}>", student.name, student.email),
                    subject: "Confirmação de matrícula".to_string(),
                    body: format!(
                        "Olá, {}!\n\n\
                         Sua matrícula no plano {} foi confirmada.\n\
                         Início: {}\n\
                         Término: {}\n\
                         Valor total: R$ {}\n",
                        student.name,
                        plan.title,
                        item.enrollment.start_date.format("%d / %m / %Y"),
                        item.enrollment.end_date.format("%d / %m / %Y"),
                        format_price(item.enrollment.price),
                    ),
                })
            }
            NotifyJob::AnswerMail(order) => {
                let student = order.student.as_ref().ok_or_else(|| {
                    GymSystemError::validation("工单回复任务缺少学员摘要")
                })?;
                let answer_at = order.help_order.answer_at.ok_or_else(|| {
                    GymSystemError::validation("工单回复任务缺少回复时间")
                })?;

                Ok(OutgoingMail {
                    to: format!("{} <{}>", student.name, student.email),
                    subject: "Resposta para sua pergunta".to_string(),
                    body: format!(
                        "Olá, {}!\n\n\
                         Pergunta: {}\n\
                         Resposta: {}\n\
                         Respondido em: {}\n",
                        student.name,
                        order.help_order.question,
                        order.help_order.answer.as_deref().unwrap_or_default(),
                        answer_at.format("%d/%m/%Y"),
                    ),
                })
            }
        }
    }
}

/// 金额渲染为两位小数、逗号作小数分隔符
fn format_price(price: rust_decimal::Decimal) -> String {
    format!("{price:.2}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::Enrollment;
    use crate::models::help_orders::entities::HelpOrder;
    use crate::models::plans::responses::PlanSummary;
    use crate::models::students::responses::StudentSummary;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn confirmation_job() -> NotifyJob {
        NotifyJob::ConfirmationMail(EnrollmentListItem {
            enrollment: Enrollment {
                id: 1,
                student_id: 7,
                plan_id: 2,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
                price: dec("327.00"),
                created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            },
            student: Some(StudentSummary {
                name: "Ana Souza".to_string(),
                email: "ana@gym.test".to_string(),
            }),
            plan: Some(PlanSummary {
                title: "Gold".to_string(),
                duration: 3,
                price: dec("109.00"),
            }),
        })
    }

    fn answer_job() -> NotifyJob {
        NotifyJob::AnswerMail(HelpOrderWithStudent {
            help_order: HelpOrder {
                id: 3,
                student_id: 7,
                question: "Posso treinar todo dia?".to_string(),
                answer: Some("Pode, respeitando o limite semanal.".to_string()),
                answer_at: Some(Utc.with_ymd_and_hms(2024, 2, 5, 14, 30, 0).unwrap()),
                created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            },
            student: Some(StudentSummary {
                name: "Ana Souza".to_string(),
                email: "ana@gym.test".to_string(),
            }),
        })
    }

    #[test]
    fn wire_format_is_tagged() {
        let json = serde_json::to_value(confirmation_job()).unwrap();
        assert_eq!(json["job"], "ConfirmationMail");
        assert_eq!(json["payload"]["student"]["email"], "ana@gym.test");
        assert_eq!(json["payload"]["plan"]["title"], "Gold");
        // 报名字段被拍平进 payload
        assert_eq!(json["payload"]["start_date"], "2024-01-31");

        let back: NotifyJob = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), "ConfirmationMail");
    }

    #[test]
    fn confirmation_mail_rendering() {
        let mail = confirmation_job().into_mail().unwrap();
        assert_eq!(mail.to, "Ana Souza <ana@gym.test>");
        assert_eq!(mail.subject, "Confirmação de matrícula");
        assert!(mail.body.contains("Gold"));
        assert!(mail.body.contains("31 / 01 / 2024"));
        assert!(mail.body.contains("30 / 04 / 2024"));
        assert!(mail.body.contains("327,00"));
    }

    #[test]
    fn answer_mail_rendering() {
        let mail = answer_job().into_mail().unwrap();
        assert_eq!(mail.to, "Ana Souza <ana@gym.test>");
        assert_eq!(mail.subject, "Resposta para sua pergunta");
        assert!(mail.body.contains("Posso treinar todo dia?"));
        assert!(mail.body.contains("respeitando o limite semanal"));
        assert!(mail.body.contains("05/02/2024"));
    }

    #[test]
    fn missing_student_summary_is_rejected() {
        let job = match confirmation_job() {
            NotifyJob::ConfirmationMail(mut item) => {
                item.student = None;
                NotifyJob::ConfirmationMail(item)
            }
            other => other,
        };
        assert!(job.into_mail().is_err());
    }
}
