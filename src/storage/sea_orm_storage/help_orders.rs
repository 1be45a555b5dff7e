//! 求助工单存储操作
//!
//! 回复是一次性状态跃迁，通过 answer_at IS NULL 的守卫更新保证幂等。

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::help_orders::{ActiveModel, Column, Entity as HelpOrders};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{GymSystemError, Result};
use crate::models::{
    help_orders::{entities::HelpOrder, responses::HelpOrderWithStudent},
    students::responses::StudentSummary,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 学员提问
    pub async fn create_help_order_impl(
        &self,
        student_id: i64,
        question: String,
    ) -> Result<HelpOrder> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(student_id),
            question: Set(question),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("创建工单失败: {e}")))?;

        Ok(result.into_help_order())
    }

    /// 通过 ID 获取工单
    pub async fn get_help_order_by_id_impl(&self, id: i64) -> Result<Option<HelpOrder>> {
        let result = HelpOrders::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询工单失败: {e}")))?;

        Ok(result.map(|m| m.into_help_order()))
    }

    /// 列出全部未回复工单（带学员摘要）
    pub async fn list_open_help_orders_impl(&self) -> Result<Vec<HelpOrderWithStudent>> {
        let orders: Vec<HelpOrder> = HelpOrders::find()
            .filter(Column::AnswerAt.is_null())
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询未回复工单失败: {e}")))?
            .into_iter()
            .map(|m| m.into_help_order())
            .collect();

        // 批量查学员摘要
        let mut student_map: HashMap<i64, StudentSummary> = HashMap::new();
        if !orders.is_empty() {
            let student_ids: Vec<i64> = orders
                .iter()
                .map(|o| o.student_id)
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            let students = Students::find()
                .filter(StudentColumn::Id.is_in(student_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    GymSystemError::database_operation(format!("查询学员摘要失败: {e}"))
                })?;
            for s in students {
                student_map.insert(
                    s.id,
                    StudentSummary {
                        name: s.name,
                        email: s.email,
                    },
                );
            }
        }

        Ok(orders
            .into_iter()
            .map(|help_order| {
                let student = student_map.get(&help_order.student_id).cloned();
                HelpOrderWithStudent {
                    help_order,
                    student,
                }
            })
            .collect())
    }

    /// 列出学员的全部工单
    pub async fn list_help_orders_by_student_impl(&self, student_id: i64) -> Result<Vec<HelpOrder>> {
        let orders = HelpOrders::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询学员工单失败: {e}")))?;

        Ok(orders.into_iter().map(|m| m.into_help_order()).collect())
    }

    /// 回复工单
    ///
    /// 只更新 answer_at 仍为空的行，命中 0 行返回 None（已回复或不存在）。
    pub async fn answer_help_order_impl(
        &self,
        id: i64,
        answer: String,
    ) -> Result<Option<HelpOrderWithStudent>> {
        let now = chrono::Utc::now().timestamp();

        let result = HelpOrders::update_many()
            .col_expr(Column::Answer, Expr::value(answer))
            .col_expr(Column::AnswerAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::AnswerAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("回复工单失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let order = self
            .get_help_order_by_id_impl(id)
            .await?
            .ok_or_else(|| GymSystemError::database_operation("回复后的工单读取失败"))?;

        let student = self
            .get_student_by_id_impl(order.student_id)
            .await?
            .map(|s| StudentSummary {
                name: s.name,
                email: s.email,
            });

        Ok(Some(HelpOrderWithStudent {
            help_order: order,
            student,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::requests::CreateStudentRequest;
    use chrono::NaiveDate;

    async fn seed_student(storage: &SeaOrmStorage, email: &str) -> i64 {
        storage
            .create_student_impl(CreateStudentRequest {
                name: "Ana Souza".to_string(),
                email: email.to_string(),
                birthdate: NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
                weight: 72.5,
                height: 1.78,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn ask_creates_open_order() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;

        let order = storage
            .create_help_order_impl(student_id, "Posso treinar todo dia?".to_string())
            .await
            .unwrap();
        assert_eq!(order.question, "Posso treinar todo dia?");
        assert!(order.answer.is_none());
        assert!(order.answer_at.is_none());

        let fetched = storage
            .get_help_order_by_id_impl(order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.student_id, student_id);
    }

    #[tokio::test]
    async fn ask_for_missing_student_hits_foreign_key() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let err = storage
            .create_help_order_impl(9999, "Ola?".to_string())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("FOREIGN KEY constraint failed"));
    }

    #[tokio::test]
    async fn open_list_excludes_answered() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;

        let first = storage
            .create_help_order_impl(student_id, "Pergunta 1".to_string())
            .await
            .unwrap();
        storage
            .create_help_order_impl(student_id, "Pergunta 2".to_string())
            .await
            .unwrap();

        storage
            .answer_help_order_impl(first.id, "Resposta 1".to_string())
            .await
            .unwrap()
            .unwrap();

        let open = storage.list_open_help_orders_impl().await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].help_order.question, "Pergunta 2");
        assert_eq!(open[0].student.as_ref().unwrap().email, "ana@gym.test");
    }

    #[tokio::test]
    async fn student_list_only_contains_own_orders() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let ana = seed_student(&storage, "ana@gym.test").await;
        let carlos = seed_student(&storage, "carlos@gym.test").await;

        storage
            .create_help_order_impl(ana, "Pergunta da Ana".to_string())
            .await
            .unwrap();
        storage
            .create_help_order_impl(carlos, "Pergunta do Carlos".to_string())
            .await
            .unwrap();

        let orders = storage.list_help_orders_by_student_impl(ana).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].question, "Pergunta da Ana");
    }

    #[tokio::test]
    async fn answer_transitions_exactly_once() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;

        let order = storage
            .create_help_order_impl(student_id, "Pergunta".to_string())
            .await
            .unwrap();

        let answered = storage
            .answer_help_order_impl(order.id, "Resposta".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(answered.help_order.answer.as_deref(), Some("Resposta"));
        assert!(answered.help_order.answer_at.is_some());
        assert_eq!(answered.student.as_ref().unwrap().name, "Ana Souza");

        // 第二次回复命中 0 行
        let again = storage
            .answer_help_order_impl(order.id, "Outra resposta".to_string())
            .await
            .unwrap();
        assert!(again.is_none());

        // 原回答保持不变
        let fetched = storage
            .get_help_order_by_id_impl(order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.answer.as_deref(), Some("Resposta"));
    }

    #[tokio::test]
    async fn missing_order_returns_none() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let result = storage
            .answer_help_order_impl(9999, "Resposta".to_string())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn racing_answers_admit_exactly_one() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;

        let order = storage
            .create_help_order_impl(student_id, "Pergunta".to_string())
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            storage.answer_help_order_impl(order.id, "Resposta A".to_string()),
            storage.answer_help_order_impl(order.id, "Resposta B".to_string()),
        );
        let wins = [a.unwrap().is_some(), b.unwrap().is_some()]
            .iter()
            .filter(|won| **won)
            .count();
        assert_eq!(wins, 1);
    }
}
