use serde::Deserialize;

use crate::models::attachments::entities::AttachmentUpload;
use crate::models::common::pagination::PaginationQuery;
use crate::models::submissions::entities::SubmissionStatus;

/// 创建提交请求
///
/// 附件是必填的（外部文件服务已完成字节存储，这里收元数据引用）。
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub task_id: i64,
    pub content: Option<String>,
    pub attachment: Option<AttachmentUpload>,
}

/// 更新提交请求
///
/// content 覆盖，附件只追加不替换。
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub content: Option<String>,
    pub attachments: Option<Vec<AttachmentUpload>>,
}

/// 评分请求
#[derive(Debug, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

/// 提交列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub task_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

// 用于存储层的内部查询参数（服务层按角色收敛可见范围后填充）
#[derive(Debug, Clone)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub task_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
    // 只返回该教师名下任务的提交
    pub task_owner_id: Option<i64>,
}
