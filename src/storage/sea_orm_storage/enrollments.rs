//! 报名存储操作
//!
//! 创建走学员锁内的"复查重叠再落库"流程，保证并发请求最多一个成功。

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::plans::{Column as PlanColumn, Entity as Plans};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{GymSystemError, Result};
use crate::models::{
    PAGE_SIZE, PageQuery, PaginationInfo,
    enrollments::{
        entities::{Enrollment, EnrollmentChanges, NewEnrollment},
        responses::{EnrollmentListItem, EnrollmentListResponse},
    },
    plans::responses::PlanSummary,
    students::responses::StudentSummary,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建报名
    ///
    /// 在学员锁内复查重叠后插入，锁外的预检查只用于提前返回。
    pub async fn create_enrollment_impl(&self, new: NewEnrollment) -> Result<Enrollment> {
        let lock = self.student_lock(new.student_id);
        let _guard = lock.lock().await;

        if self
            .find_blocking_enrollment_impl(new.student_id, new.start_date)
            .await?
            .is_some()
        {
            return Err(GymSystemError::conflict(format!(
                "学员 {} 在 {} 已有未结束的报名",
                new.student_id, new.start_date
            )));
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(new.student_id),
            plan_id: Set(new.plan_id),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            price: Set(new.price),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("创建报名失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    /// 通过 ID 获取报名
    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询报名失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 查找挡住指定开始日期的既有报名
    ///
    /// 规则只看 end_date >= start_date，不比较既有报名的开始日期。
    pub async fn find_blocking_enrollment_impl(
        &self,
        student_id: i64,
        start_date: NaiveDate,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::EndDate.gte(start_date))
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询报名冲突失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出报名（按开始日期升序，带学员与套餐摘要）
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: PageQuery,
    ) -> Result<EnrollmentListResponse> {
        let page = query.page.max(1) as u64;
        let size = PAGE_SIZE as u64;

        let select = Enrollments::find().order_by_asc(Column::StartDate);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询报名总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询报名页数失败: {e}")))?;

        let enrollments: Vec<Enrollment> = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询报名列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_enrollment())
            .collect();

        // 批量查学员和套餐摘要，避免逐行查询
        let mut student_map: HashMap<i64, StudentSummary> = HashMap::new();
        let mut plan_map: HashMap<i64, PlanSummary> = HashMap::new();
        if !enrollments.is_empty() {
            let student_ids: Vec<i64> = enrollments
                .iter()
                .map(|e| e.student_id)
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

            let plan_ids: Vec<i64> = enrollments
                .iter()
                .map(|e| e.plan_id)
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            let plans = Plans::find()
                .filter(PlanColumn::Id.is_in(plan_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    GymSystemError::database_operation(format!("查询套餐摘要失败: {e}"))
                })?;
            for p in plans {
                plan_map.insert(
                    p.id,
                    PlanSummary {
                        title: p.title,
                        duration: p.duration,
                        price: p.price,
                    },
                );
            }
        }

        let items: Vec<EnrollmentListItem> = enrollments
            .into_iter()
            .map(|enrollment| {
                let student = student_map.get(&enrollment.student_id).cloned();
                let plan = plan_map.get(&enrollment.plan_id).cloned();
                EnrollmentListItem {
                    enrollment,
                    student,
                    plan,
                }
            })
            .collect();

        Ok(EnrollmentListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新报名（变更集由服务层推导完毕）
    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        changes: EnrollmentChanges,
    ) -> Result<Option<Enrollment>> {
        // 先检查报名是否存在
        let existing = self.get_enrollment_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(student_id) = changes.student_id {
            model.student_id = Set(student_id);
        }

        if let Some(plan_id) = changes.plan_id {
            model.plan_id = Set(plan_id);
        }

        if let Some(start_date) = changes.start_date {
            model.start_date = Set(start_date);
        }

        if let Some(end_date) = changes.end_date {
            model.end_date = Set(end_date);
        }

        if let Some(price) = changes.price {
            model.price = Set(price);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("更新报名失败: {e}")))?;

        self.get_enrollment_by_id_impl(id).await
    }

    /// 删除报名
    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("删除报名失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plans::requests::CreatePlanRequest;
    use crate::models::students::requests::CreateStudentRequest;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_student(storage: &SeaOrmStorage, email: &str) -> i64 {
        storage
            .create_student_impl(CreateStudentRequest {
                name: "Ana Souza".to_string(),
                email: email.to_string(),
                birthdate: date(1995, 4, 12),
                weight: 72.5,
                height: 1.78,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_plan(storage: &SeaOrmStorage, title: &str) -> i64 {
        storage
            .create_plan_impl(CreatePlanRequest {
                title: title.to_string(),
                duration: 3,
                price: dec("109.00"),
            })
            .await
            .unwrap()
            .id
    }

    fn new_enrollment(
        student_id: i64,
        plan_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> NewEnrollment {
        NewEnrollment {
            student_id,
            plan_id,
            start_date: start,
            end_date: end,
            price: dec("327.00"),
        }
    }

    #[tokio::test]
    async fn create_persists_derived_fields() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        let enrollment = storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 1, 31),
                date(2024, 4, 30),
            ))
            .await
            .unwrap();
        assert_eq!(enrollment.start_date, date(2024, 1, 31));
        assert_eq!(enrollment.end_date, date(2024, 4, 30));
        assert_eq!(enrollment.price, dec("327.00"));

        let fetched = storage
            .get_enrollment_by_id_impl(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.price, dec("327.00"));
    }

    #[tokio::test]
    async fn overlapping_start_date_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap();

        // 开始日期落在既有报名结束之前
        let err = storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 3, 15),
                date(2024, 6, 15),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, GymSystemError::Conflict(_)));

        // 开始日期恰好等于既有结束日期，同样拒绝
        let err = storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 4, 1),
                date(2024, 7, 1),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, GymSystemError::Conflict(_)));

        // 结束之后一天则允许
        storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 4, 2),
                date(2024, 7, 2),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rule_ignores_existing_start_dates() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        // 未来的报名也会挡住更早的开始日期，这是规则只看 end_date 的结果
        storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 6, 1),
                date(2024, 9, 1),
            ))
            .await
            .unwrap();

        let err = storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, GymSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn different_students_do_not_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let ana = seed_student(&storage, "ana@gym.test").await;
        let carlos = seed_student(&storage, "carlos@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        storage
            .create_enrollment_impl(new_enrollment(
                ana,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap();
        storage
            .create_enrollment_impl(new_enrollment(
                carlos,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn racing_creates_admit_exactly_one() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        let (a, b) = tokio::join!(
            storage.create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            )),
            storage.create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 2, 1),
                date(2024, 5, 1),
            )),
        );

        let succeeded = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(succeeded, 1);

        let loser = if a.is_err() {
            a.unwrap_err()
        } else {
            b.unwrap_err()
        };
        assert!(matches!(loser, GymSystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_student_hits_foreign_key() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let plan_id = seed_plan(&storage, "Gold").await;

        let err = storage
            .create_enrollment_impl(new_enrollment(
                9999,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("FOREIGN KEY constraint failed"));
    }

    #[tokio::test]
    async fn list_orders_by_start_date_with_summaries() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let ana = seed_student(&storage, "ana@gym.test").await;
        let carlos = seed_student(&storage, "carlos@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        storage
            .create_enrollment_impl(new_enrollment(
                carlos,
                plan_id,
                date(2024, 3, 1),
                date(2024, 6, 1),
            ))
            .await
            .unwrap();
        storage
            .create_enrollment_impl(new_enrollment(
                ana,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap();

        let listed = storage
            .list_enrollments_with_pagination_impl(PageQuery { page: 1 })
            .await
            .unwrap();
        assert_eq!(listed.items.len(), 2);
        assert_eq!(listed.items[0].enrollment.start_date, date(2024, 1, 1));
        assert_eq!(
            listed.items[0].student.as_ref().unwrap().email,
            "ana@gym.test"
        );
        assert_eq!(listed.items[0].plan.as_ref().unwrap().title, "Gold");
        assert_eq!(listed.pagination.total, 2);
    }

    #[tokio::test]
    async fn update_applies_changes() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        let enrollment = storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap();

        let updated = storage
            .update_enrollment_impl(
                enrollment.id,
                EnrollmentChanges {
                    start_date: Some(date(2024, 2, 1)),
                    end_date: Some(date(2024, 5, 1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.start_date, date(2024, 2, 1));
        assert_eq!(updated.end_date, date(2024, 5, 1));
        assert_eq!(updated.price, dec("327.00"));

        assert!(
            storage
                .update_enrollment_impl(9999, EnrollmentChanges::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_enrollment() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        let plan_id = seed_plan(&storage, "Gold").await;

        let enrollment = storage
            .create_enrollment_impl(new_enrollment(
                student_id,
                plan_id,
                date(2024, 1, 1),
                date(2024, 4, 1),
            ))
            .await
            .unwrap();
        assert!(storage.delete_enrollment_impl(enrollment.id).await.unwrap());
        assert!(!storage.delete_enrollment_impl(enrollment.id).await.unwrap());
    }
}
