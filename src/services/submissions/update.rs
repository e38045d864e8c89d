use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::authz::ensure_student_mutation;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::UpdateSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;
use crate::utils::validate::validate_update_submission;

/// 学生修改提交
/// PUT /submissions/{id}
///
/// 只有提交者本人，且尚未评分（已退回的提交可以修改后再交）。
/// content 覆盖，附件只追加；is_late 不重算。
pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    req: UpdateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(sub)) => sub,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    if let Err(reason) = ensure_student_mutation(&user, &submission) {
        return Ok(deny_response(reason));
    }

    let validation = validate_update_submission(
        req.content.as_deref(),
        req.attachments.as_ref().map_or(0, |a| a.len()),
    );
    if !validation.is_valid() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            validation.error_message(),
        )));
    }

    let updated = match storage.update_submission(submission_id, req).await {
        Ok(Some(sub)) => sub,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("更新提交失败: {e}"),
                )),
            );
        }
    };

    let task = match storage.get_task_by_id(updated.task_id).await {
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

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionResponse::from_submission(updated, task.as_ref()),
        "提交已更新",
    )))
}
