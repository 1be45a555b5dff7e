//! 打卡存储操作
//!
//! 准入判定（报名有效 + 滚动窗口限额）与落库在同一把学员锁内完成。

use super::SeaOrmStorage;
use crate::entity::checkins::{ActiveModel, Column, Entity as Checkins};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::errors::{GymSystemError, Result};
use crate::models::{
    PAGE_SIZE, PageQuery, PaginationInfo,
    checkins::{
        entities::CheckinOutcome,
        responses::{CheckinListItem, CheckinListResponse},
    },
    students::responses::StudentSummary,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// 滚动窗口内允许的最大打卡次数
const CHECKIN_LIMIT: u64 = 5;
/// 滚动窗口长度，7 天
const CHECKIN_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

impl SeaOrmStorage {
    /// 记录打卡
    ///
    /// 窗口为 (now - 7d, now]，刚好落在窗口起点的旧记录不计入。
    pub async fn record_checkin_impl(&self, student_id: i64) -> Result<CheckinOutcome> {
        let lock = self.student_lock(student_id);
        let _guard = lock.lock().await;

        let now = chrono::Utc::now();
        let today = now.date_naive();

        // 当天必须有生效中的报名
        let active = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::StartDate.lte(today))
            .filter(EnrollmentColumn::EndDate.gte(today))
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询有效报名失败: {e}")))?;

        if active.is_none() {
            return Ok(CheckinOutcome::NoActiveEnrollment);
        }

        // 滚动窗口限额
        let now_ts = now.timestamp();
        let window_start = now_ts - CHECKIN_WINDOW_SECS;

        let recent = Checkins::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CreatedAt.gt(window_start))
            .count(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("统计打卡次数失败: {e}")))?;

        if recent >= CHECKIN_LIMIT {
            return Ok(CheckinOutcome::LimitReached);
        }

        let model = ActiveModel {
            student_id: Set(student_id),
            created_at: Set(now_ts),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("记录打卡失败: {e}")))?;

        Ok(CheckinOutcome::Recorded(result.into_checkin()))
    }

    /// 分页列出学员打卡记录（按 ID 升序，带学员摘要）
    pub async fn list_checkins_with_pagination_impl(
        &self,
        student_id: i64,
        query: PageQuery,
    ) -> Result<CheckinListResponse> {
        let page = query.page.max(1) as u64;
        let size = PAGE_SIZE as u64;

        let select = Checkins::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询打卡总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询打卡页数失败: {e}")))?;

        let checkins = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询打卡列表失败: {e}")))?;

        // 同一学员的列表，摘要查一次即可
        let student = self
            .get_student_by_id_impl(student_id)
            .await?
            .map(|s| StudentSummary {
                name: s.name,
                email: s.email,
            });

        let items: Vec<CheckinListItem> = checkins
            .into_iter()
            .map(|m| CheckinListItem {
                checkin: m.into_checkin(),
                student: student.clone(),
            })
            .collect();

        Ok(CheckinListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::NewEnrollment;
    use crate::models::plans::requests::CreatePlanRequest;
    use crate::models::students::requests::CreateStudentRequest;
    use chrono::{Duration, NaiveDate, Utc};
    use rust_decimal::Decimal;

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

    /// 给学员造一条今天生效的报名
    async fn seed_active_enrollment(storage: &SeaOrmStorage, student_id: i64) {
        let plan = storage
            .create_plan_impl(CreatePlanRequest {
                title: format!("Plan for {student_id}"),
                duration: 3,
                price: "109.00".parse::<Decimal>().unwrap(),
            })
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        storage
            .create_enrollment_impl(NewEnrollment {
                student_id,
                plan_id: plan.id,
                start_date: today - Duration::days(30),
                end_date: today + Duration::days(30),
                price: "327.00".parse::<Decimal>().unwrap(),
            })
            .await
            .unwrap();
    }

    /// 直接落一条指定时间的打卡，用于模拟窗口外的历史记录
    async fn seed_checkin_at(storage: &SeaOrmStorage, student_id: i64, created_at: i64) {
        ActiveModel {
            student_id: Set(student_id),
            created_at: Set(created_at),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn denied_without_enrollment() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;

        let outcome = storage.record_checkin_impl(student_id).await.unwrap();
        assert!(matches!(outcome, CheckinOutcome::NoActiveEnrollment));
    }

    #[tokio::test]
    async fn denied_with_expired_enrollment() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;

        let plan = storage
            .create_plan_impl(CreatePlanRequest {
                title: "Gold".to_string(),
                duration: 3,
                price: "109.00".parse::<Decimal>().unwrap(),
            })
            .await
            .unwrap();
        let today = Utc::now().date_naive();
        storage
            .create_enrollment_impl(NewEnrollment {
                student_id,
                plan_id: plan.id,
                start_date: today - Duration::days(120),
                end_date: today - Duration::days(30),
                price: "327.00".parse::<Decimal>().unwrap(),
            })
            .await
            .unwrap();

        let outcome = storage.record_checkin_impl(student_id).await.unwrap();
        assert!(matches!(outcome, CheckinOutcome::NoActiveEnrollment));
    }

    #[tokio::test]
    async fn five_allowed_sixth_denied() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        seed_active_enrollment(&storage, student_id).await;

        for _ in 0..5 {
            let outcome = storage.record_checkin_impl(student_id).await.unwrap();
            assert!(matches!(outcome, CheckinOutcome::Recorded(_)));
        }

        let sixth = storage.record_checkin_impl(student_id).await.unwrap();
        assert!(matches!(sixth, CheckinOutcome::LimitReached));
    }

    #[tokio::test]
    async fn old_checkins_age_out() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        seed_active_enrollment(&storage, student_id).await;

        // 五条都在窗口之外（8 天前），不挡新的打卡
        let eight_days_ago = Utc::now().timestamp() - 8 * 24 * 60 * 60;
        for _ in 0..5 {
            seed_checkin_at(&storage, student_id, eight_days_ago).await;
        }

        let outcome = storage.record_checkin_impl(student_id).await.unwrap();
        assert!(matches!(outcome, CheckinOutcome::Recorded(_)));
    }

    #[tokio::test]
    async fn window_start_is_exclusive() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        seed_active_enrollment(&storage, student_id).await;

        // 恰好落在窗口起点的记录不计数，窗口内的计数
        let now_ts = Utc::now().timestamp();
        for _ in 0..4 {
            seed_checkin_at(&storage, student_id, now_ts - CHECKIN_WINDOW_SECS).await;
        }
        for _ in 0..4 {
            seed_checkin_at(&storage, student_id, now_ts - 3600).await;
        }

        let outcome = storage.record_checkin_impl(student_id).await.unwrap();
        assert!(matches!(outcome, CheckinOutcome::Recorded(_)));

        // 此时窗口内已有 5 条，继续打卡被拒
        let next = storage.record_checkin_impl(student_id).await.unwrap();
        assert!(matches!(next, CheckinOutcome::LimitReached));
    }

    #[tokio::test]
    async fn racing_checkins_at_limit_admit_exactly_one() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        seed_active_enrollment(&storage, student_id).await;

        for _ in 0..4 {
            let outcome = storage.record_checkin_impl(student_id).await.unwrap();
            assert!(matches!(outcome, CheckinOutcome::Recorded(_)));
        }

        let (a, b) = tokio::join!(
            storage.record_checkin_impl(student_id),
            storage.record_checkin_impl(student_id),
        );
        let outcomes = [a.unwrap(), b.unwrap()];
        let recorded = outcomes
            .iter()
            .filter(|o| matches!(o, CheckinOutcome::Recorded(_)))
            .count();
        let denied = outcomes
            .iter()
            .filter(|o| matches!(o, CheckinOutcome::LimitReached))
            .count();
        assert_eq!(recorded, 1);
        assert_eq!(denied, 1);
    }

    #[tokio::test]
    async fn list_in_insertion_order_with_student_summary() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let student_id = seed_student(&storage, "ana@gym.test").await;
        seed_active_enrollment(&storage, student_id).await;

        for _ in 0..3 {
            storage.record_checkin_impl(student_id).await.unwrap();
        }

        let listed = storage
            .list_checkins_with_pagination_impl(student_id, PageQuery { page: 1 })
            .await
            .unwrap();
        assert_eq!(listed.items.len(), 3);
        assert!(listed.items[0].checkin.id < listed.items[1].checkin.id);
        assert_eq!(
            listed.items[0].student.as_ref().unwrap().email,
            "ana@gym.test"
        );
        assert_eq!(listed.pagination.total, 3);
        assert_eq!(listed.pagination.page_size, PAGE_SIZE);
    }
}
