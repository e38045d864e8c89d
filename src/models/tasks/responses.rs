use serde::{Deserialize, Serialize};

use crate::models::PaginationInfo;
use crate::models::attachments::entities::Attachment;
use crate::models::tasks::entities::{Task, TaskStatus};

/// 任务响应（含派生字段 is_overdue，读取时计算）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i64,
    pub professor_id: i64,
    pub title: String,
    pub description: String,
    pub assigned_to: Vec<i64>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub status: TaskStatus,
    pub max_score: f64,
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub tags: Vec<String>,
    pub is_overdue: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TaskResponse {
    pub fn from_task(task: Task) -> Self {
        let is_overdue = task.is_overdue(chrono::Utc::now());
        Self {
            id: task.id,
            professor_id: task.professor_id,
            title: task.title,
            description: task.description,
            assigned_to: task.assigned_to,
            due_date: task.due_date,
            status: task.status,
            max_score: task.max_score,
            attachments: task.attachments,
            instructions: task.instructions,
            tags: task.tags,
            is_overdue,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// 任务列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub items: Vec<TaskResponse>,
    pub pagination: PaginationInfo,
}

// 存储层返回的原始分页结果，派生字段由服务层补齐
#[derive(Debug, Clone)]
pub struct TaskListPage {
    pub tasks: Vec<Task>,
    pub pagination: PaginationInfo,
}
