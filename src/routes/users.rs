use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::UserListParams;
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// 列出用户
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(&req, query.into_inner()).await
}

// 获取用户详情
pub async fn get_user(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(&req, path.into_inner()).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::get().to(get_user))
            .service(
                // 用户列表只对教师开放（挑选指派学生时使用）
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::professor_roles()))
                    .route("", web::get().to(list_users)),
            ),
    );
}
