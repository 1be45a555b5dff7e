pub mod pagination;
pub mod response;

pub use pagination::{PAGE_SIZE, PageQuery, PaginationInfo};
pub use response::ApiResponse;
