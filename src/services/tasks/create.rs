use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TaskService;
use crate::middlewares::RequireJWT;
use crate::models::tasks::requests::CreateTaskRequest;
use crate::models::tasks::responses::TaskResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_create_task;

/// 创建任务
/// POST /tasks
///
/// 路由层已用 RequireRole 限定教师角色；任务初始为草稿状态。
pub async fn create_task(
    service: &TaskService,
    request: &HttpRequest,
    req: CreateTaskRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    if user.role != UserRole::Professor {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只有教师可以创建任务",
        )));
    }

    // 一次校验返回全部违规字段
    let validation = validate_create_task(
        &req.title,
        &req.description,
        req.max_score.unwrap_or(100.0),
        req.instructions.as_deref(),
    );
    if !validation.is_valid() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            validation.error_message(),
        )));
    }

    match storage.create_task(user.id, req).await {
        Ok(task) => {
            info!("Task {} created by professor {}", task.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                TaskResponse::from_task(task),
                "任务已创建",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建任务失败: {e}"),
            )),
        ),
    }
}
