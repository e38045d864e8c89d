use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TaskService;
use crate::authz::ensure_task_owner;
use crate::middlewares::RequireJWT;
use crate::models::tasks::entities::TaskStatus;
use crate::models::tasks::responses::TaskResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;

/// 关闭任务
/// POST /tasks/{id}/close
///
/// 任何状态都可以关闭（含未发布的草稿）；重复关闭视为幂等成功。
/// 关闭后任务不再接受新提交，也不再计入逾期。
pub async fn close_task(
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

    if task.status == TaskStatus::Closed {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            TaskResponse::from_task(task),
            "任务已是关闭状态",
        )));
    }

    match storage.update_task_status(task_id, TaskStatus::Closed).await {
        Ok(Some(task)) => {
            info!("Task {} closed by professor {}", task_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                TaskResponse::from_task(task),
                "任务已关闭",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TaskNotFound,
            "任务不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("关闭任务失败: {e}"),
            )),
        ),
    }
}
