use std::sync::Arc;

use crate::models::{
    submissions::{
        entities::Submission,
        requests::{
            CreateSubmissionRequest, GradeSubmissionRequest, SubmissionListQuery,
            UpdateSubmissionRequest,
        },
        responses::SubmissionListPage,
    },
    tasks::{
        entities::{Task, TaskStatus},
        requests::{CreateTaskRequest, TaskListQuery, UpdateTaskRequest},
        responses::TaskListPage,
    },
    users::{entities::User, requests::UserListQuery, responses::UserListResponse},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户查询方法（账号生命周期由外部身份服务管理）
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;

    /// 任务管理方法
    // 创建任务（草稿状态）
    async fn create_task(&self, professor_id: i64, task: CreateTaskRequest) -> Result<Task>;
    // 通过ID获取任务
    async fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>>;
    // 批量获取任务（按任意顺序返回存在的任务）
    async fn get_tasks_by_ids(&self, task_ids: &[i64]) -> Result<Vec<Task>>;
    // 列出任务
    async fn list_tasks_with_pagination(&self, query: TaskListQuery) -> Result<TaskListPage>;
    // 更新任务字段（附件追加，指派名单整体替换）
    async fn update_task(&self, task_id: i64, update: UpdateTaskRequest) -> Result<Option<Task>>;
    // 更新任务状态（publish / close）
    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<Option<Task>>;
    // 删除任务（不级联删除提交）
    async fn delete_task(&self, task_id: i64) -> Result<bool>;

    /// 提交管理方法
    // 创建提交；(task_id, student_id) 重复时返回 UniqueViolation。
    // 迟交标志在此一次性计算，之后不再变化。
    async fn create_submission(
        &self,
        student_id: i64,
        task: &Task,
        submission: CreateSubmissionRequest,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 列出提交
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListPage>;
    // 学生修改提交内容（附件追加）
    async fn update_submission(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>>;
    // 教师评分
    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<Submission>>;
    // 教师退回提交
    async fn return_submission(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 删除提交
    async fn delete_submission(&self, submission_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
