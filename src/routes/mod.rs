pub mod auth;

pub mod checkins;

pub mod enrollments;

pub mod help_orders;

pub mod plans;

pub mod students;

pub use auth::configure_auth_routes;
pub use checkins::configure_checkins_routes;
pub use enrollments::configure_enrollments_routes;
pub use help_orders::configure_help_orders_routes;
pub use plans::configure_plans_routes;
pub use students::configure_students_routes;
