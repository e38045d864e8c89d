use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::authz::ensure_submission_create;
use crate::errors::TaskSystemError;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;
use crate::utils::validate::validate_create_submission;

/// 创建提交
/// POST /submissions
///
/// 拒绝原因有固定优先级：任务存在性 → 发布状态 → 指派关系 → 重复提交。
/// 重复提交由存储层的唯一索引在插入时原子判定。
pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let validation = validate_create_submission(req.content.as_deref(), req.attachment.is_some());
    if !validation.is_valid() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            validation.error_message(),
        )));
    }

    let task = match storage.get_task_by_id(req.task_id).await {
        Ok(task) => task,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询任务失败: {e}"),
                )),
            );
        }
    };

    if let Err(reason) = ensure_submission_create(&user, task.as_ref()) {
        return Ok(deny_response(reason));
    }
    let Some(task) = task else {
        return Ok(deny_response(crate::authz::DenyReason::TaskNotFound));
    };

    match storage.create_submission(user.id, &task, req).await {
        Ok(submission) => {
            info!(
                "Submission {} created by student {} for task {}",
                submission.id, user.id, task.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmissionResponse::from_submission(submission, Some(&task)),
                "提交成功",
            )))
        }
        Err(TaskSystemError::UniqueViolation(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubmissionAlreadyExists,
                "该任务已有提交，请修改现有提交",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建提交失败: {e}"),
            )),
        ),
    }
}
