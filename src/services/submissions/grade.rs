use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::authz::{ensure_grader, validate_score};
use crate::middlewares::RequireJWT;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::deny_response;
use crate::utils::validate::validate_feedback;

/// 教师评分
/// POST /submissions/{id}/grade
///
/// 只接受 submitted 状态的提交；分数范围 [0, max_score]，两端均合法。
pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    req: GradeSubmissionRequest,
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

    // 任务已删除的孤儿提交无法评分
    if let Err(reason) = ensure_grader(&user, task.as_ref()) {
        return Ok(deny_response(reason));
    }
    let Some(task) = task else {
        return Ok(deny_response(crate::authz::DenyReason::AccessDenied));
    };

    if submission.status != SubmissionStatus::Submitted {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidState,
            "只能对未评分的提交打分",
        )));
    }

    if let Err(reason) = validate_score(req.score, task.max_score) {
        return Ok(deny_response(reason));
    }

    let validation = validate_feedback(req.feedback.as_deref());
    if !validation.is_valid() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            validation.error_message(),
        )));
    }

    match storage.grade_submission(submission_id, user.id, req).await {
        Ok(Some(graded)) => {
            info!(
                "Submission {} graded by professor {} with score {:?}",
                submission_id, user.id, graded.score
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse::from_submission(graded, Some(&task)),
                "评分成功",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("评分失败: {e}"),
            )),
        ),
    }
}
