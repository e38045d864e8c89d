pub mod create;
pub mod delete;
pub mod detail;
pub mod grade;
pub mod list;
pub mod return_to_student;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, SubmissionListParams, UpdateSubmissionRequest,
};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    /// 列出提交（按角色收敛可见范围）
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        params: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, params).await
    }

    /// 创建提交
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        req: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, req).await
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, submission_id).await
    }

    /// 学生修改提交
    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        req: UpdateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, submission_id, req).await
    }

    /// 教师评分
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, request, submission_id, req).await
    }

    /// 教师退回提交
    pub async fn return_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        return_to_student::return_submission(self, request, submission_id).await
    }

    /// 学生撤回提交
    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_submission(self, request, submission_id).await
    }
}
