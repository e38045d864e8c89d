use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TaskService;
use crate::authz::ensure_task_owner;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;

/// 删除任务
/// DELETE /tasks/{id}
///
/// 已有的提交保留为孤儿记录，学生仍可读取自己的历史提交。
pub async fn delete_task(
    service: &TaskService,
    request: &HttpRequest,
    task_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let task = match storage.get_task_by_id(task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TaskNotFound,
                "任务不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询任务失败: {e}"),
                )),
            );
        }
    };

    if let Err(reason) = ensure_task_owner(&user, &task) {
        return Ok(deny_response(reason));
    }

    match storage.delete_task(task_id).await {
        Ok(true) => {
            info!("Task {} deleted by professor {}", task_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("任务已删除")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TaskNotFound,
            "任务不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除任务失败: {e}"),
            )),
        ),
    }
}
