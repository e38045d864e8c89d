use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 获取用户详情
/// GET /users/{id}
///
/// 教师可以查看任何用户；学生只能查看自己或其他学生。
pub async fn get_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => {
            if current_user.role == UserRole::Student
                && user.role == UserRole::Professor
                && current_user.id != user.id
            {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "学生只能查看自己或其他学生的信息",
                )));
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "用户不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询用户失败: {e}"),
            )),
        ),
    }
}
