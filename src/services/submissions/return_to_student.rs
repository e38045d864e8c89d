use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::authz::ensure_grader;
use crate::middlewares::RequireJWT;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;

/// 教师退回提交
/// POST /submissions/{id}/return
///
/// 已评分或未评分的提交都可以退回（教师可不打分直接退回）；
/// 已有的分数与反馈保留。退回后学生可以修改再交。
pub async fn return_submission(
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

    if let Err(reason) = ensure_grader(&user, task.as_ref()) {
        return Ok(deny_response(reason));
    }

    if submission.status == SubmissionStatus::Returned {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidState,
            "提交已是退回状态",
        )));
    }

    match storage.return_submission(submission_id).await {
        Ok(Some(returned)) => {
            info!(
                "Submission {} returned to student by professor {}",
                submission_id, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse::from_submission(returned, task.as_ref()),
                "提交已退回",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("退回提交失败: {e}"),
            )),
        ),
    }
}
