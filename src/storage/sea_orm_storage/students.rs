//! 学员存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{GymSystemError, Result};
use crate::models::{
    PAGE_SIZE, PaginationInfo,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListParams, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建学员
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            birthdate: Set(req.birthdate),
            weight: Set(req.weight),
            height: Set(req.height),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("创建学员失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学员
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询学员失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过邮箱获取学员
    pub async fn get_student_by_email_impl(&self, email: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询学员失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学员（按姓名升序，可选大小写不敏感的姓名搜索）
    pub async fn list_students_with_pagination_impl(
        &self,
        params: StudentListParams,
    ) -> Result<StudentListResponse> {
        let page = params.pagination.page.max(1) as u64;
        let size = PAGE_SIZE as u64;

        let mut select = Students::find();

        // 姓名搜索条件
        if let Some(ref q) = params.q
            && !q.trim().is_empty()
        {
            use sea_orm::ExprTrait;
            let escaped = escape_like_pattern(q.trim()).to_lowercase();
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(Column::Name))).like(format!("%{escaped}%")),
            );
        }

        // 排序
        select = select.order_by_asc(Column::Name);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询学员总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询学员页数失败: {e}")))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询学员列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新学员信息
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        // 先检查学员是否存在
        let existing = self.get_student_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(birthdate) = update.birthdate {
            model.birthdate = Set(birthdate);
        }

        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }

        if let Some(height) = update.height {
            model.height = Set(height);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("更新学员失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageQuery;
    use chrono::NaiveDate;

    pub(crate) fn student_request(name: &str, email: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            name: name.to_string(),
            email: email.to_string(),
            birthdate: NaiveDate::from_ymd_opt(1995, 4, 12).unwrap(),
            weight: 72.5,
            height: 1.78,
        }
    }

    fn list_params(page: i64, q: Option<&str>) -> StudentListParams {
        StudentListParams {
            pagination: PageQuery { page },
            q: q.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_student() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let student = storage
            .create_student_impl(student_request("Ana Souza", "ana@gym.test"))
            .await
            .unwrap();
        assert_eq!(student.name, "Ana Souza");
        assert_eq!(student.weight, 72.5);

        let fetched = storage
            .get_student_by_id_impl(student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.email, "ana@gym.test");

        let by_email = storage
            .get_student_by_email_impl("ana@gym.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, student.id);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await;

        storage
            .create_student_impl(student_request("Ana Souza", "ana@gym.test"))
            .await
            .unwrap();
        let err = storage
            .create_student_impl(student_request("Outra Ana", "ana@gym.test"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("UNIQUE constraint failed"));
    }

    #[tokio::test]
    async fn list_paginates_at_fixed_size_ordered_by_name() {
        let storage = SeaOrmStorage::new_in_memory().await;

        for i in 1..=25 {
            storage
                .create_student_impl(student_request(
                    &format!("Student {i:02}"),
                    &format!("student{i:02}@gym.test"),
                ))
                .await
                .unwrap();
        }

        let first = storage
            .list_students_with_pagination_impl(list_params(1, None))
            .await
            .unwrap();
        assert_eq!(first.items.len(), PAGE_SIZE as usize);
        assert_eq!(first.items[0].name, "Student 01");
        assert_eq!(first.pagination.total, 25);
        assert_eq!(first.pagination.total_pages, 2);
        assert_eq!(first.pagination.page_size, PAGE_SIZE);

        let second = storage
            .list_students_with_pagination_impl(list_params(2, None))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 5);
        assert_eq!(second.items[0].name, "Student 21");
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let storage = SeaOrmStorage::new_in_memory().await;

        storage
            .create_student_impl(student_request("Carlos Lima", "carlos@gym.test"))
            .await
            .unwrap();
        storage
            .create_student_impl(student_request("Beatriz Costa", "bia@gym.test"))
            .await
            .unwrap();

        let found = storage
            .list_students_with_pagination_impl(list_params(1, Some("CARLOS")))
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].name, "Carlos Lima");

        let partial = storage
            .list_students_with_pagination_impl(list_params(1, Some("cos")))
            .await
            .unwrap();
        assert_eq!(partial.items.len(), 1);
        assert_eq!(partial.items[0].name, "Beatriz Costa");
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let student = storage
            .create_student_impl(student_request("Ana Souza", "ana@gym.test"))
            .await
            .unwrap();

        let updated = storage
            .update_student_impl(
                student.id,
                UpdateStudentRequest {
                    name: None,
                    email: Some("ana.souza@gym.test".to_string()),
                    birthdate: None,
                    weight: Some(70.0),
                    height: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ana Souza");
        assert_eq!(updated.email, "ana.souza@gym.test");
        assert_eq!(updated.weight, 70.0);
        assert_eq!(updated.height, 1.78);

        assert!(
            storage
                .update_student_impl(9999, UpdateStudentRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
