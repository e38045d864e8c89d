use serde::Deserialize;

use crate::models::common::pagination::PaginationQuery;
use crate::models::users::entities::UserRole;

/// 用户列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
}
