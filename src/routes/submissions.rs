use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, SubmissionListParams, UpdateSubmissionRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出提交
pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

// 创建提交
pub async fn create_submission(
    req: HttpRequest,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, body.into_inner())
        .await
}

// 获取提交详情
pub async fn get_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, path.into_inner())
        .await
}

// 学生修改提交
pub async fn update_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_submission(&req, path.into_inner(), body.into_inner())
        .await
}

// 教师评分
pub async fn grade_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, path.into_inner(), body.into_inner())
        .await
}

// 教师退回提交
pub async fn return_submission(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .return_submission(&req, path.into_inner())
        .await
}

// 学生撤回提交
pub async fn delete_submission(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .delete_submission(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_submissions))
            .route("", web::post().to(create_submission))
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}", web::put().to(update_submission))
            .route("/{id}", web::delete().to(delete_submission))
            .service(
                // 评分与退回只对教师开放；任务归属在服务层判定
                web::scope("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Professor))
                    .route("/{id}/grade", web::post().to(grade_submission))
                    .route("/{id}/return", web::post().to(return_submission)),
            ),
    );
}
