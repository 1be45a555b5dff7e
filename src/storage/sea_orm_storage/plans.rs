//! 套餐存储操作

use super::SeaOrmStorage;
use crate::entity::plans::{ActiveModel, Column, Entity as Plans};
use crate::errors::{GymSystemError, Result};
use crate::models::plans::{
    entities::Plan,
    requests::{CreatePlanRequest, UpdatePlanRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建套餐
    pub async fn create_plan_impl(&self, req: CreatePlanRequest) -> Result<Plan> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            duration: Set(req.duration),
            price: Set(req.price),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("创建套餐失败: {e}")))?;

        Ok(result.into_plan())
    }

    /// 通过 ID 获取套餐
    pub async fn get_plan_by_id_impl(&self, id: i64) -> Result<Option<Plan>> {
        let result = Plans::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询套餐失败: {e}")))?;

        Ok(result.map(|m| m.into_plan()))
    }

    /// 通过标题获取套餐
    pub async fn get_plan_by_title_impl(&self, title: &str) -> Result<Option<Plan>> {
        let result = Plans::find()
            .filter(Column::Title.eq(title))
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询套餐失败: {e}")))?;

        Ok(result.map(|m| m.into_plan()))
    }

    /// 列出全部套餐（按标题升序）
    pub async fn list_plans_impl(&self) -> Result<Vec<Plan>> {
        let plans = Plans::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询套餐列表失败: {e}")))?;

        Ok(plans.into_iter().map(|m| m.into_plan()).collect())
    }

    /// 更新套餐信息
    pub async fn update_plan_impl(
        &self,
        id: i64,
        update: UpdatePlanRequest,
    ) -> Result<Option<Plan>> {
        // 先检查套餐是否存在
        let existing = self.get_plan_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(duration) = update.duration {
            model.duration = Set(duration);
        }

        if let Some(price) = update.price {
            model.price = Set(price);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("更新套餐失败: {e}")))?;

        self.get_plan_by_id_impl(id).await
    }

    /// 删除套餐（被报名引用时外键约束会拒绝删除）
    pub async fn delete_plan_impl(&self, id: i64) -> Result<bool> {
        let result = Plans::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("删除套餐失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::NewEnrollment;
    use crate::models::students::requests::CreateStudentRequest;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn plan_request(title: &str, duration: i32, price: &str) -> CreatePlanRequest {
        CreatePlanRequest {
            title: title.to_string(),
            duration,
            price: dec(price),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_plan() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let plan = storage
            .create_plan_impl(plan_request("Gold", 3, "109.00"))
            .await
            .unwrap();
        assert_eq!(plan.duration, 3);
        assert_eq!(plan.price, dec("109.00"));

        let fetched = storage.get_plan_by_id_impl(plan.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Gold");

        let by_title = storage
            .get_plan_by_title_impl("Gold")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_title.id, plan.id);
        assert!(storage.get_plan_by_title_impl("Silver").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_title_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await;

        storage
            .create_plan_impl(plan_request("Gold", 3, "109.00"))
            .await
            .unwrap();
        let err = storage
            .create_plan_impl(plan_request("Gold", 6, "89.00"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("UNIQUE constraint failed"));
    }

    #[tokio::test]
    async fn list_orders_by_title() {
        let storage = SeaOrmStorage::new_in_memory().await;

        storage
            .create_plan_impl(plan_request("Start", 1, "129.00"))
            .await
            .unwrap();
        storage
            .create_plan_impl(plan_request("Diamond", 6, "89.00"))
            .await
            .unwrap();
        storage
            .create_plan_impl(plan_request("Gold", 3, "109.00"))
            .await
            .unwrap();

        let plans = storage.list_plans_impl().await.unwrap();
        let titles: Vec<&str> = plans.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Diamond", "Gold", "Start"]);
    }

    #[tokio::test]
    async fn partial_update() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let plan = storage
            .create_plan_impl(plan_request("Gold", 3, "109.00"))
            .await
            .unwrap();

        let updated = storage
            .update_plan_impl(
                plan.id,
                UpdatePlanRequest {
                    title: None,
                    duration: None,
                    price: Some(dec("99.90")),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Gold");
        assert_eq!(updated.duration, 3);
        assert_eq!(updated.price, dec("99.90"));

        assert!(
            storage
                .update_plan_impl(9999, UpdatePlanRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_plan() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let plan = storage
            .create_plan_impl(plan_request("Gold", 3, "109.00"))
            .await
            .unwrap();
        assert!(storage.delete_plan_impl(plan.id).await.unwrap());
        assert!(!storage.delete_plan_impl(plan.id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_referenced_plan_hits_foreign_key() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let plan = storage
            .create_plan_impl(plan_request("Gold", 3, "109.00"))
            .await
            .unwrap();
        let student = storage
            .create_student_impl(CreateStudentRequest {
                name: "Ana Souza".to_string(),
                email: "ana@gym.test".to_string(),
                birthdate: NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
                weight: 72.5,
                height: 1.78,
            })
            .await
            .unwrap();
        storage
            .create_enrollment_impl(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                price: dec("327.00"),
            })
            .await
            .unwrap();

        let err = storage.delete_plan_impl(plan.id).await.unwrap_err();
        assert!(err.to_string().contains("FOREIGN KEY constraint failed"));
    }
}
