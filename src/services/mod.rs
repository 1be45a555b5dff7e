pub mod auth;
pub mod checkins;
pub mod enrollments;
pub mod help_orders;
pub mod plans;
pub mod students;

pub use auth::AuthService;
pub use checkins::CheckinService;
pub use enrollments::EnrollmentService;
pub use help_orders::HelpOrderService;
pub use plans::PlanService;
pub use students::StudentService;
