use serde::{Deserialize, Serialize};

use crate::models::attachments::entities::Attachment;

// 提交状态
//
// 前向路径 submitted → graded → returned；submitted → returned 也允许
// （教师可不评分直接退回）。不允许回退。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
    Returned,
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";
    pub const RETURNED: &'static str = "returned";
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            SubmissionStatus::SUBMITTED => Ok(SubmissionStatus::Submitted),
            SubmissionStatus::GRADED => Ok(SubmissionStatus::Graded),
            SubmissionStatus::RETURNED => Ok(SubmissionStatus::Returned),
            _ => Err(serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: submitted, graded, returned"
            ))),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "{}", SubmissionStatus::SUBMITTED),
            SubmissionStatus::Graded => write!(f, "{}", SubmissionStatus::GRADED),
            SubmissionStatus::Returned => write!(f, "{}", SubmissionStatus::RETURNED),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(SubmissionStatus::Submitted),
            "graded" => Ok(SubmissionStatus::Graded),
            "returned" => Ok(SubmissionStatus::Returned),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
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
    // 创建时一次性计算，之后不再变化（即使任务截止时间被修改）
    pub is_late: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 迟交判定：提交时刻严格晚于截止时间才算迟交
pub fn compute_is_late(
    submitted_at: chrono::DateTime<chrono::Utc>,
    due_date: chrono::DateTime<chrono::Utc>,
) -> bool {
    submitted_at > due_date
}

/// 成绩百分比：score / max_score * 100，未评分时为 None
///
/// 每次读取时用已取到的任务数据计算，不落库、不做隐式查询。
pub fn grade_percentage(score: Option<f64>, max_score: f64) -> Option<f64> {
    score.filter(|_| max_score > 0.0).map(|s| s / max_score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_is_late_strictly_after_due_date() {
        let due = Utc::now();
        assert!(compute_is_late(due + Duration::seconds(1), due));
        // 恰好在截止时间提交不算迟交
        assert!(!compute_is_late(due, due));
        assert!(!compute_is_late(due - Duration::seconds(1), due));
    }

    #[test]
    fn test_grade_percentage() {
        assert_eq!(grade_percentage(Some(85.0), 100.0), Some(85.0));
        assert_eq!(grade_percentage(Some(5.0), 20.0), Some(25.0));
        assert_eq!(grade_percentage(Some(0.0), 100.0), Some(0.0));
        assert_eq!(grade_percentage(None, 100.0), None);
        // max_score 为 0 时无法计算
        assert_eq!(grade_percentage(Some(1.0), 0.0), None);
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["submitted", "graded", "returned"] {
            let status: SubmissionStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("pending".parse::<SubmissionStatus>().is_err());
    }
}
