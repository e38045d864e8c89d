pub mod close;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod publish;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::tasks::requests::{CreateTaskRequest, TaskListParams, UpdateTaskRequest};
use crate::storage::Storage;

pub struct TaskService {
    storage: Option<Arc<dyn Storage>>,
}

impl TaskService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 列出任务（按角色收敛可见范围）
    pub async fn list_tasks(
        &self,
        request: &HttpRequest,
        params: TaskListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_tasks(self, request, params).await
    }

    /// 创建任务
    pub async fn create_task(
        &self,
        request: &HttpRequest,
        req: CreateTaskRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_task(self, request, req).await
    }

    /// 获取任务详情
    pub async fn get_task(&self, request: &HttpRequest, task_id: i64) -> ActixResult<HttpResponse> {
        detail::get_task(self, request, task_id).await
    }

    /// 更新任务
    pub async fn update_task(
        &self,
        request: &HttpRequest,
        task_id: i64,
        req: UpdateTaskRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_task(self, request, task_id, req).await
    }

    /// 发布任务
    pub async fn publish_task(
        &self,
        request: &HttpRequest,
        task_id: i64,
    ) -> ActixResult<HttpResponse> {
        publish::publish_task(self, request, task_id).await
    }

    /// 关闭任务
    pub async fn close_task(
        &self,
        request: &HttpRequest,
        task_id: i64,
    ) -> ActixResult<HttpResponse> {
        close::close_task(self, request, task_id).await
    }

    /// 删除任务
    pub async fn delete_task(
        &self,
        request: &HttpRequest,
        task_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_task(self, request, task_id).await
    }
}
