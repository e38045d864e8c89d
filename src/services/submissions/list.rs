use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::{SubmissionListParams, SubmissionListQuery};
use crate::models::submissions::responses::{SubmissionListResponse, SubmissionResponse};
use crate::models::tasks::entities::Task;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 列出提交
/// GET /submissions
///
/// 可见范围在查询层收敛：学生只看到自己的提交，教师只看到自己
/// 任务下的提交。grade_percentage 等派生字段用批量取回的任务数据
/// 在组装响应时计算。
pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    params: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let query = match user.role {
        UserRole::Professor => SubmissionListQuery {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            task_id: params.task_id,
            student_id: params.student_id,
            status: params.status,
            task_owner_id: Some(user.id),
        },
        UserRole::Student => SubmissionListQuery {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            task_id: params.task_id,
            // 学生只能看到自己的提交，忽略请求中的筛选参数
            student_id: Some(user.id),
            status: params.status,
            task_owner_id: None,
        },
    };

    let page = match storage.list_submissions_with_pagination(query).await {
        Ok(page) => page,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交列表失败: {e}"),
                )),
            );
        }
    };

    // 批量取回关联任务，已删除的任务留空
    let mut task_ids: Vec<i64> = page.submissions.iter().map(|s| s.task_id).collect();
    task_ids.sort_unstable();
    task_ids.dedup();

    let task_map: HashMap<i64, Task> = match storage.get_tasks_by_ids(&task_ids).await {
        Ok(tasks) => tasks.into_iter().map(|t| (t.id, t)).collect(),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询关联任务失败: {e}"),
                )),
            );
        }
    };

    let response = SubmissionListResponse {
        items: page
            .submissions
            .into_iter()
            .map(|s| {
                let task = task_map.get(&s.task_id);
                SubmissionResponse::from_submission(s, task)
            })
            .collect(),
        pagination: page.pagination,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
