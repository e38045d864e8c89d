//! 数据模型定义
//!
//! 业务模型与数据库实体（`crate::entity`）分离，路由与服务层只使用这里的类型。

pub mod attachments;
pub mod common;
pub mod submissions;
pub mod tasks;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间（用于统计服务运行时长）
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
