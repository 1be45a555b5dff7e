use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 管理员账号方法
    // 创建账号
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取账号信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取账号信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 更新账号最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计账号数量（用于首次启动播种判断）
    async fn count_users(&self) -> Result<u64>;

    /// 学员管理方法
    // 创建学员
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    // 通过ID获取学员信息
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 通过邮箱获取学员信息
    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>>;
    // 列出学员（固定页大小，可按姓名搜索）
    async fn list_students_with_pagination(
        &self,
        params: StudentListParams,
    ) -> Result<StudentListResponse>;
    // 更新学员信息
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;

    /// 套餐管理方法
    // 创建套餐
    async fn create_plan(&self, plan: CreatePlanRequest) -> Result<Plan>;
    // 通过ID获取套餐信息
    async fn get_plan_by_id(&self, id: i64) -> Result<Option<Plan>>;
    // 通过标题获取套餐信息
    async fn get_plan_by_title(&self, title: &str) -> Result<Option<Plan>>;
    // 列出全部套餐（按标题升序，不分页）
    async fn list_plans(&self) -> Result<Vec<Plan>>;
    // 更新套餐信息
    async fn update_plan(&self, id: i64, update: UpdatePlanRequest) -> Result<Option<Plan>>;
    // 删除套餐（被报名引用时由外键约束拒绝）
    async fn delete_plan(&self, id: i64) -> Result<bool>;

    /// 报名管理方法
    // 创建报名（学员锁内复查重叠后落库）
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment>;
    // 通过ID获取报名信息
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    // 查找挡住指定开始日期的既有报名（end_date >= start_date）
    async fn find_blocking_enrollment(
        &self,
        student_id: i64,
        start_date: NaiveDate,
    ) -> Result<Option<Enrollment>>;
    // 列出报名（按开始日期升序，带学员/套餐摘要）
    async fn list_enrollments_with_pagination(
        &self,
        query: PageQuery,
    ) -> Result<EnrollmentListResponse>;
    // 更新报名（变更集由服务层推导）
    async fn update_enrollment(
        &self,
        id: i64,
        changes: EnrollmentChanges,
    ) -> Result<Option<Enrollment>>;
    // 删除报名
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;

    /// 打卡方法
    // 记录打卡（学员锁内判定报名有效性与滚动窗口限额）
    async fn record_checkin(&self, student_id: i64) -> Result<CheckinOutcome>;
    // 列出学员打卡记录（按ID升序）
    async fn list_checkins_with_pagination(
        &self,
        student_id: i64,
        query: PageQuery,
    ) -> Result<CheckinListResponse>;

    /// 求助工单方法
    // 学员提问
    async fn create_help_order(&self, student_id: i64, question: String) -> Result<HelpOrder>;
    // 通过ID获取工单信息
    async fn get_help_order_by_id(&self, id: i64) -> Result<Option<HelpOrder>>;
    // 列出未回复工单（不分页，带学员摘要）
    async fn list_open_help_orders(&self) -> Result<Vec<HelpOrderWithStudent>>;
    // 列出学员的全部工单（不分页）
    async fn list_help_orders_by_student(&self, student_id: i64) -> Result<Vec<HelpOrder>>;
    // 回复工单（仅未回复的工单可被更新，重复回复返回 None）
    async fn answer_help_order(&self, id: i64, answer: String)
    -> Result<Option<HelpOrderWithStudent>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
