use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::requests::{UserListParams, UserListQuery};
use crate::models::{ApiResponse, ErrorCode};

/// 列出用户
/// GET /users
///
/// 路由层已用 RequireRole 限定教师角色（教师挑选指派学生时使用）。
pub async fn list_users(
    service: &UserService,
    request: &HttpRequest,
    params: UserListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let query = UserListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        role: params.role,
    };

    match storage.list_users_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询用户列表失败: {e}"),
            )),
        ),
    }
}
