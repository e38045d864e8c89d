use serde::{Deserialize, Serialize};

use crate::models::PaginationInfo;
use crate::models::attachments::entities::Attachment;
use crate::models::submissions::entities::{Submission, SubmissionStatus, grade_percentage};
use crate::models::tasks::entities::Task;

/// 提交关联的任务摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionTaskInfo {
    pub id: i64,
    pub title: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_score: f64,
}

impl SubmissionTaskInfo {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            due_date: task.due_date,
            max_score: task.max_score,
        }
    }
}

/// 提交响应（含派生字段 grade_percentage，读取时计算）
///
/// 任务可能已被删除（删除任务不级联删除提交），此时 task 与
/// grade_percentage 均为 None。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub task_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub attachments: Vec<Attachment>,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_late: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<SubmissionTaskInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SubmissionResponse {
    pub fn from_submission(submission: Submission, task: Option<&Task>) -> Self {
        let percentage = task.and_then(|t| grade_percentage(submission.score, t.max_score));
        Self {
            id: submission.id,
            task_id: submission.task_id,
            student_id: submission.student_id,
            content: submission.content,
            attachments: submission.attachments,
            status: submission.status,
            score: submission.score,
            feedback: submission.feedback,
            graded_by: submission.graded_by,
            graded_at: submission.graded_at,
            is_late: submission.is_late,
            grade_percentage: percentage,
            task: task.map(SubmissionTaskInfo::from_task),
            created_at: submission.created_at,
            updated_at: submission.updated_at,
        }
    }
}

/// 提交列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionResponse>,
    pub pagination: PaginationInfo,
}

// 存储层返回的原始分页结果，任务摘要与派生字段由服务层补齐
#[derive(Debug, Clone)]
pub struct SubmissionListPage {
    pub submissions: Vec<Submission>,
    pub pagination: PaginationInfo,
}
