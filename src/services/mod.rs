//! 业务服务模块

pub mod submissions;
pub mod tasks;
pub mod users;

pub use submissions::SubmissionService;
pub use tasks::TaskService;
pub use users::UserService;

use actix_web::HttpResponse;

use crate::authz::DenyReason;
use crate::models::{ApiResponse, ErrorCode};

/// 把授权模块的拒绝原因映射为统一的 HTTP 响应
pub(crate) fn deny_response(reason: DenyReason) -> HttpResponse {
    match reason {
        DenyReason::AccessDenied => HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "没有执行该操作的权限",
        )),
        DenyReason::TaskNotFound => HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TaskNotFound,
            "任务不存在",
        )),
        DenyReason::TaskNotPublished => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::TaskNotPublished, "任务未发布，不接受提交"),
        ),
        DenyReason::NotAssigned => HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::NotAssigned,
            "您不在该任务的指派名单中",
        )),
        DenyReason::InvalidState => HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidState,
            "当前状态下不允许该操作",
        )),
        DenyReason::ScoreOutOfRange => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::ScoreOutOfRange, "分数超出允许范围"),
        ),
    }
}
