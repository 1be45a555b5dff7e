//! 管理员账号存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{GymSystemError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建账号（密码已由调用方完成哈希）
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            password_hash: Set(req.password),
            is_admin: Set(req.is_admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("创建账号失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取账号
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取账号
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新账号最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计账号数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("统计账号数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Admin".to_string(),
            email: email.to_string(),
            password: "argon2-hash-placeholder".to_string(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_user() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let user = storage
            .create_user_impl(admin_request("admin@gym.test"))
            .await
            .unwrap();
        assert!(user.is_admin);
        assert!(user.last_login.is_none());

        let by_id = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "admin@gym.test");

        let by_email = storage
            .get_user_by_email_impl("admin@gym.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(
            storage
                .get_user_by_email_impl("nobody@gym.test")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await;

        storage
            .create_user_impl(admin_request("admin@gym.test"))
            .await
            .unwrap();
        let err = storage
            .create_user_impl(admin_request("admin@gym.test"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("UNIQUE constraint failed"));
    }

    #[tokio::test]
    async fn last_login_and_count() {
        let storage = SeaOrmStorage::new_in_memory().await;
        assert_eq!(storage.count_users_impl().await.unwrap(), 0);

        let user = storage
            .create_user_impl(admin_request("admin@gym.test"))
            .await
            .unwrap();
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);

        assert!(storage.update_last_login_impl(user.id).await.unwrap());
        let updated = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert!(updated.last_login.is_some());

        assert!(!storage.update_last_login_impl(9999).await.unwrap());
    }
}
