//! 基于 SeaORM 的存储层，SQLite、PostgreSQL、MySQL 通用。
//!
//! 报名与打卡的"先检查后写入"序列通过每学员一把的异步锁串行化。

mod checkins;
mod enrollments;
mod help_orders;
mod plans;
mod students;
mod users;

use crate::config::AppConfig;
use crate::errors::{GymSystemError, Result};
use dashmap::DashMap;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    /// 每学员一把锁，守住报名重叠检查与打卡限额判定
    student_locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl SeaOrmStorage {
    /// 连接数据库并跑完迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // SQLite 走带 pragma 调优的专用入口
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| GymSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("数据库连接就绪: {}", db_url);

        Ok(Self {
            db,
            student_locks: Arc::new(DashMap::new()),
        })
    }

    /// SQLite 连接，开 WAL 并调大缓存相关 pragma
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GymSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GymSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// PostgreSQL/MySQL 走 SeaORM 默认连接池
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GymSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 规范化数据库 URL，裸文件路径按 SQLite 处理
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GymSystemError::database_config(format!(
                "无法识别的数据库 URL: {url}（支持 sqlite:// postgres:// mysql://，或 .db/.sqlite 文件路径）"
            )))
        }
    }

    /// 取出指定学员的锁，首次访问时创建
    pub(crate) fn student_lock(&self, student_id: i64) -> Arc<Mutex<()>> {
        self.student_locks
            .entry(student_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 测试用内存数据库实例（单连接，迁移已就绪）
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .expect("connect to in-memory sqlite");
        Migrator::up(&db, None).await.expect("run migrations");

        Self {
            db,
            student_locks: Arc::new(DashMap::new()),
        }
    }
}

// trait 方法全部转发到各领域文件里的 *_impl
use chrono::NaiveDate;

use crate::models::{
    PageQuery,
    checkins::{entities::CheckinOutcome, responses::CheckinListResponse},
    enrollments::{
        entities::{Enrollment, EnrollmentChanges, NewEnrollment},
        responses::EnrollmentListResponse,
    },
    help_orders::{entities::HelpOrder, responses::HelpOrderWithStudent},
    plans::{
        entities::Plan,
        requests::{CreatePlanRequest, UpdatePlanRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListParams, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 管理员账号模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学员模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.get_student_by_email_impl(email).await
    }

    async fn list_students_with_pagination(
        &self,
        params: StudentListParams,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(params).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    // 套餐模块
    async fn create_plan(&self, plan: CreatePlanRequest) -> Result<Plan> {
        self.create_plan_impl(plan).await
    }

    async fn get_plan_by_id(&self, id: i64) -> Result<Option<Plan>> {
        self.get_plan_by_id_impl(id).await
    }

    async fn get_plan_by_title(&self, title: &str) -> Result<Option<Plan>> {
        self.get_plan_by_title_impl(title).await
    }

    async fn list_plans(&self) -> Result<Vec<Plan>> {
        self.list_plans_impl().await
    }

    async fn update_plan(&self, id: i64, update: UpdatePlanRequest) -> Result<Option<Plan>> {
        self.update_plan_impl(id, update).await
    }

    async fn delete_plan(&self, id: i64) -> Result<bool> {
        self.delete_plan_impl(id).await
    }

    // 报名模块
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn find_blocking_enrollment(
        &self,
        student_id: i64,
        start_date: NaiveDate,
    ) -> Result<Option<Enrollment>> {
        self.find_blocking_enrollment_impl(student_id, start_date)
            .await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: PageQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        changes: EnrollmentChanges,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, changes).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    // 打卡模块
    async fn record_checkin(&self, student_id: i64) -> Result<CheckinOutcome> {
        self.record_checkin_impl(student_id).await
    }

    async fn list_checkins_with_pagination(
        &self,
        student_id: i64,
        query: PageQuery,
    ) -> Result<CheckinListResponse> {
        self.list_checkins_with_pagination_impl(student_id, query)
            .await
    }

    // 求助工单模块
    async fn create_help_order(&self, student_id: i64, question: String) -> Result<HelpOrder> {
        self.create_help_order_impl(student_id, question).await
    }

    async fn get_help_order_by_id(&self, id: i64) -> Result<Option<HelpOrder>> {
        self.get_help_order_by_id_impl(id).await
    }

    async fn list_open_help_orders(&self) -> Result<Vec<HelpOrderWithStudent>> {
        self.list_open_help_orders_impl().await
    }

    async fn list_help_orders_by_student(&self, student_id: i64) -> Result<Vec<HelpOrder>> {
        self.list_help_orders_by_student_impl(student_id).await
    }

    async fn answer_help_order(
        &self,
        id: i64,
        answer: String,
    ) -> Result<Option<HelpOrderWithStudent>> {
        self.answer_help_order_impl(id, answer).await
    }
}
