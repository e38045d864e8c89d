use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::attachments::entities::AttachmentUpload;
use crate::models::common::pagination::PaginationQuery;
use crate::models::tasks::entities::TaskStatus;

/// 创建任务请求
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub assigned_to: Option<Vec<i64>>,
    pub due_date: DateTime<Utc>, // ISO 8601 格式，如 "2026-09-24T12:00:00Z"
    pub max_score: Option<f64>,
    pub instructions: Option<String>,
    pub tags: Option<Vec<String>>,
    pub attachments: Option<Vec<AttachmentUpload>>,
}

/// 更新任务请求
///
/// 只应用请求中出现的字段；附件只追加不替换。
/// 状态变更不走这里，只能通过 publish / close 操作。
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Vec<i64>>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: Option<f64>,
    pub instructions: Option<String>,
    pub tags: Option<Vec<String>>,
    pub attachments: Option<Vec<AttachmentUpload>>,
}

/// 任务列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize)]
pub struct TaskListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<i64>,
}

// 用于存储层的内部查询参数（服务层按角色收敛可见范围后填充）
#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<TaskStatus>,
    // 只返回该教师创建的任务
    pub professor_id: Option<i64>,
    // 只返回指派给该学生的任务
    pub assigned_to: Option<i64>,
}
