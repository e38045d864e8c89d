use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::middlewares::RequireJWT;
use crate::models::tasks::requests::{TaskListParams, TaskListQuery};
use crate::models::tasks::responses::{TaskListResponse, TaskResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 列出任务
/// GET /tasks
///
/// 可见范围在查询层收敛：教师只看到自己创建的任务，学生只看到
/// 指派给自己的任务。没有全局列表。
pub async fn list_tasks(
    service: &TaskService,
    request: &HttpRequest,
    params: TaskListParams,
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
        UserRole::Professor => TaskListQuery {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            professor_id: Some(user.id),
            // 教师可以按指派学生进一步筛选
            assigned_to: params.assigned_to,
        },
        UserRole::Student => TaskListQuery {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            professor_id: None,
            // 学生只能看到指派给自己的任务，忽略请求中的筛选参数
            assigned_to: Some(user.id),
        },
    };

    match storage.list_tasks_with_pagination(query).await {
        Ok(page) => {
            let response = TaskListResponse {
                items: page.tasks.into_iter().map(TaskResponse::from_task).collect(),
                pagination: page.pagination,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询任务列表失败: {e}"),
            )),
        ),
    }
}
