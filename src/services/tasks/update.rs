use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::authz::ensure_task_owner;
use crate::middlewares::RequireJWT;
use crate::models::tasks::requests::UpdateTaskRequest;
use crate::models::tasks::responses::TaskResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;
use crate::utils::validate::validate_update_task;

/// 更新任务
/// PUT /tasks/{id}
///
/// 只应用请求中出现的字段；附件只追加。状态变更不走这里。
pub async fn update_task(
    service: &TaskService,
    request: &HttpRequest,
    task_id: i64,
    req: UpdateTaskRequest,
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

    let validation = validate_update_task(
        req.title.as_deref(),
        req.description.as_deref(),
        req.max_score,
        req.instructions.as_deref(),
        req.attachments.as_ref().map_or(0, |a| a.len()),
    );
    if !validation.is_valid() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            validation.error_message(),
        )));
    }

    match storage.update_task(task_id, req).await {
        Ok(Some(task)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TaskResponse::from_task(task),
            "任务已更新",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TaskNotFound,
            "任务不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新任务失败: {e}"),
            )),
        ),
    }
}
