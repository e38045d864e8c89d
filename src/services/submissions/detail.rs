use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::authz::ensure_submission_visible;
use crate::middlewares::RequireJWT;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;

/// 获取提交详情
/// GET /submissions/{id}
///
/// 任务可能已被删除；此时只有提交者本人可见，任务摘要与
/// grade_percentage 为空。
pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
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

    let task = match storage.get_task_by_id(submission.task_id).await {
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

    if let Err(reason) = ensure_submission_visible(&user, &submission, task.as_ref()) {
        return Ok(deny_response(reason));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionResponse::from_submission(submission, task.as_ref()),
        "查询成功",
    )))
}
