use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::authz::ensure_task_visible;
use crate::middlewares::RequireJWT;
use crate::models::tasks::responses::TaskResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;

/// 获取任务详情
/// GET /tasks/{id}
pub async fn get_task(
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

    if let Err(reason) = ensure_task_visible(&user, &task) {
        return Ok(deny_response(reason));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(TaskResponse::from_task(task), "查询成功")))
}
