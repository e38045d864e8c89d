use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TaskService;
use crate::authz::ensure_task_owner;
use crate::middlewares::RequireJWT;
use crate::models::tasks::entities::TaskStatus;
use crate::models::tasks::responses::TaskResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;

/// 发布任务
/// POST /tasks/{id}/publish
///
/// 草稿正常发布；重复发布已发布的任务视为幂等成功；已关闭的任务拒绝。
pub async fn publish_task(
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

    if !task.status.can_publish() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidState,
            "已关闭的任务不能发布",
        )));
    }

    // 已发布的任务重复发布：不落库，直接返回当前状态
    if task.status == TaskStatus::Published {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            TaskResponse::from_task(task),
            "任务已是发布状态",
        )));
    }

    match storage.update_task_status(task_id, TaskStatus::Published).await {
        Ok(Some(task)) => {
            info!("Task {} published by professor {}", task_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                TaskResponse::from_task(task),
                "任务已发布",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TaskNotFound,
            "任务不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("发布任务失败: {e}"),
            )),
        ),
    }
}
