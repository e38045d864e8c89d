use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::tasks::requests::{CreateTaskRequest, TaskListParams, UpdateTaskRequest};
use crate::models::users::entities::UserRole;
use crate::services::TaskService;

// 懒加载的全局 TaskService 实例
static TASK_SERVICE: Lazy<TaskService> = Lazy::new(TaskService::new_lazy);

// 列出任务
pub async fn list_tasks(
    req: HttpRequest,
    query: web::Query<TaskListParams>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.list_tasks(&req, query.into_inner()).await
}

// 创建任务
pub async fn create_task(
    req: HttpRequest,
    body: web::Json<CreateTaskRequest>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.create_task(&req, body.into_inner()).await
}

// 获取任务详情
pub async fn get_task(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    TASK_SERVICE.get_task(&req, path.into_inner()).await
}

// 更新任务
pub async fn update_task(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateTaskRequest>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE
        .update_task(&req, path.into_inner(), body.into_inner())
        .await
}

// 发布任务
pub async fn publish_task(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    TASK_SERVICE.publish_task(&req, path.into_inner()).await
}

// 关闭任务
pub async fn close_task(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    TASK_SERVICE.close_task(&req, path.into_inner()).await
}

// 删除任务
pub async fn delete_task(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    TASK_SERVICE.delete_task(&req, path.into_inner()).await
}

// 配置路由
pub fn configure_tasks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tasks")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_tasks))
            .route("/{id}", web::get().to(get_task))
            .service(
                // 写操作只对教师开放；资源级归属在服务层判定
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Professor))
                    .route("", web::post().to(create_task))
                    .route("/{id}", web::put().to(update_task))
                    .route("/{id}", web::delete().to(delete_task))
                    .route("/{id}/publish", web::post().to(publish_task))
                    .route("/{id}/close", web::post().to(close_task)),
            ),
    );
}
