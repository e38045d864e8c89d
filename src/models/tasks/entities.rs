use serde::{Deserialize, Serialize};

use crate::models::attachments::entities::Attachment;

// 任务状态
//
// 状态机只允许 draft → published → closed 单向推进，不允许回退。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Draft,
    Published,
    Closed,
}

impl TaskStatus {
    pub const DRAFT: &'static str = "draft";
    pub const PUBLISHED: &'static str = "published";
    pub const CLOSED: &'static str = "closed";

    /// 是否允许发布：draft 可发布，published 重复发布视为幂等成功，closed 拒绝。
    /// 关闭操作没有对应的检查，任何状态（含未发布的草稿）都可以关闭。
    pub fn can_publish(&self) -> bool {
        !matches!(self, TaskStatus::Closed)
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            TaskStatus::DRAFT => Ok(TaskStatus::Draft),
            TaskStatus::PUBLISHED => Ok(TaskStatus::Published),
            TaskStatus::CLOSED => Ok(TaskStatus::Closed),
            _ => Err(serde::de::Error::custom(format!(
                "无效的任务状态: '{s}'. 支持的状态: draft, published, closed"
            ))),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Draft => write!(f, "{}", TaskStatus::DRAFT),
            TaskStatus::Published => write!(f, "{}", TaskStatus::PUBLISHED),
            TaskStatus::Closed => write!(f, "{}", TaskStatus::CLOSED),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TaskStatus::Draft),
            "published" => Ok(TaskStatus::Published),
            "closed" => Ok(TaskStatus::Closed),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

// 任务实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    // 创建任务的教师 ID，创建后不可变更
    pub professor_id: i64,
    pub title: String,
    pub description: String,
    // 被指派的学生 ID 集合
    pub assigned_to: Vec<i64>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub status: TaskStatus,
    pub max_score: f64,
    pub attachments: Vec<Attachment>,
    pub instructions: Option<String>,
    pub tags: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Task {
    /// 任务是否已逾期（每次读取时重新计算，不落库）
    pub fn is_overdue(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_date < now && self.status != TaskStatus::Closed
    }

    /// 学生是否在指派名单中
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assigned_to.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn task_with(status: TaskStatus, due_date: chrono::DateTime<Utc>) -> Task {
        Task {
            id: 1,
            professor_id: 10,
            title: "Essay".to_string(),
            description: "Write an essay".to_string(),
            assigned_to: vec![20, 21],
            due_date,
            status,
            max_score: 100.0,
            attachments: vec![],
            instructions: None,
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_publish_allowed_from_draft_and_published_only() {
        assert!(TaskStatus::Draft.can_publish());
        assert!(TaskStatus::Published.can_publish());
        assert!(!TaskStatus::Closed.can_publish());
    }

    #[test]
    fn test_overdue_requires_past_due_and_not_closed() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        let future = now + Duration::hours(1);

        assert!(task_with(TaskStatus::Published, past).is_overdue(now));
        assert!(!task_with(TaskStatus::Published, future).is_overdue(now));
        // 已关闭的任务不算逾期
        assert!(!task_with(TaskStatus::Closed, past).is_overdue(now));
    }

    #[test]
    fn test_assignment_membership() {
        let task = task_with(TaskStatus::Published, Utc::now());
        assert!(task.is_assigned_to(20));
        assert!(!task.is_assigned_to(99));
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["draft", "published", "closed"] {
            let status: TaskStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("archived".parse::<TaskStatus>().is_err());
    }
}
