use serde::{Deserialize, Serialize};

use crate::models::PaginationInfo;
use crate::models::users::entities::User;

/// 用户列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}
