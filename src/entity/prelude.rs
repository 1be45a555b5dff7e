//! 常用实体别名预导入

pub use super::checkins::{
    ActiveModel as CheckinActiveModel, Entity as Checkins, Model as CheckinModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::help_orders::{
    ActiveModel as HelpOrderActiveModel, Entity as HelpOrders, Model as HelpOrderModel,
};
pub use super::plans::{ActiveModel as PlanActiveModel, Entity as Plans, Model as PlanModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
