//! 授权判定模块
//!
//! 纯函数：输入主体与已取到的实体，输出放行或带原因的拒绝，不做任何 I/O。
//! 服务层先从存储取实体，再调用这里判定，最后才执行变更。
//!
//! 没有超级角色：教师只能操作自己创建的任务及其提交。

use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::tasks::entities::{Task, TaskStatus};
use crate::models::users::entities::{User, UserRole};

/// 拒绝原因，服务层据此映射为 ErrorCode 与 HTTP 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// 主体无权访问该实体
    AccessDenied,
    /// 关联任务不存在
    TaskNotFound,
    /// 任务未发布，不接受提交
    TaskNotPublished,
    /// 学生不在任务指派名单中
    NotAssigned,
    /// 当前生命周期状态下不允许该操作
    InvalidState,
    /// 分数超出 [0, max_score]
    ScoreOutOfRange,
}

pub type Decision = Result<(), DenyReason>;

/// 读取单个任务：学生须在指派名单中，教师须是任务创建者
pub fn ensure_task_visible(user: &User, task: &Task) -> Decision {
    match user.role {
        UserRole::Student if task.is_assigned_to(user.id) => Ok(()),
        UserRole::Professor if task.professor_id == user.id => Ok(()),
        _ => Err(DenyReason::AccessDenied),
    }
}

/// 变更任务（update / publish / close / delete）：只有创建者本人
pub fn ensure_task_owner(user: &User, task: &Task) -> Decision {
    if user.role == UserRole::Professor && task.professor_id == user.id {
        Ok(())
    } else {
        Err(DenyReason::AccessDenied)
    }
}

/// 创建提交的前置检查
///
/// 拒绝原因有固定的优先级：任务存在性 → 发布状态 → 指派关系。
/// 重复提交由存储层的唯一索引原子保证，不在这里判定。
pub fn ensure_submission_create(user: &User, task: Option<&Task>) -> Decision {
    if user.role != UserRole::Student {
        return Err(DenyReason::AccessDenied);
    }
    let task = task.ok_or(DenyReason::TaskNotFound)?;
    if task.status != TaskStatus::Published {
        return Err(DenyReason::TaskNotPublished);
    }
    if !task.is_assigned_to(user.id) {
        return Err(DenyReason::NotAssigned);
    }
    Ok(())
}

/// 读取单个提交：提交者本人，或任务创建者
///
/// 任务可能已被删除（孤儿提交）；此时只有提交者本人可见。
pub fn ensure_submission_visible(user: &User, submission: &Submission, task: Option<&Task>) -> Decision {
    match user.role {
        UserRole::Student if submission.student_id == user.id => Ok(()),
        UserRole::Professor if task.is_some_and(|t| t.professor_id == user.id) => Ok(()),
        _ => Err(DenyReason::AccessDenied),
    }
}

/// 学生对提交的变更（update / delete）：须是提交者本人，且尚未评分
pub fn ensure_student_mutation(user: &User, submission: &Submission) -> Decision {
    if user.role != UserRole::Student || submission.student_id != user.id {
        return Err(DenyReason::AccessDenied);
    }
    if submission.status == SubmissionStatus::Graded {
        return Err(DenyReason::InvalidState);
    }
    Ok(())
}

/// 评分与退回：只有提交所属任务的创建者
pub fn ensure_grader(user: &User, task: Option<&Task>) -> Decision {
    if user.role != UserRole::Professor {
        return Err(DenyReason::AccessDenied);
    }
    match task {
        Some(t) if t.professor_id == user.id => Ok(()),
        _ => Err(DenyReason::AccessDenied),
    }
}

/// 分数范围校验：[0, max_score]，两端均为合法值
pub fn validate_score(score: f64, max_score: f64) -> Decision {
    if score < 0.0 || score > max_score {
        Err(DenyReason::ScoreOutOfRange)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn professor(id: i64) -> User {
        User {
            id,
            name: format!("prof-{id}"),
            email: format!("prof{id}@example.edu"),
            role: UserRole::Professor,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student(id: i64) -> User {
        User {
            id,
            name: format!("student-{id}"),
            email: format!("student{id}@example.edu"),
            role: UserRole::Student,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(professor_id: i64, status: TaskStatus, assigned_to: Vec<i64>) -> Task {
        Task {
            id: 1,
            professor_id,
            title: "Essay".to_string(),
            description: "Write an essay".to_string(),
            assigned_to,
            due_date: Utc::now() + Duration::days(7),
            status,
            max_score: 100.0,
            attachments: vec![],
            instructions: None,
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(student_id: i64, status: SubmissionStatus) -> Submission {
        Submission {
            id: 5,
            task_id: 1,
            student_id,
            content: None,
            attachments: vec![],
            status,
            score: None,
            feedback: None,
            graded_by: None,
            graded_at: None,
            is_late: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_visibility() {
        let t = task(10, TaskStatus::Published, vec![20]);
        assert!(ensure_task_visible(&student(20), &t).is_ok());
        assert_eq!(
            ensure_task_visible(&student(21), &t),
            Err(DenyReason::AccessDenied)
        );
        assert!(ensure_task_visible(&professor(10), &t).is_ok());
        // 其他教师无权查看，教师没有全局可见性
        assert_eq!(
            ensure_task_visible(&professor(11), &t),
            Err(DenyReason::AccessDenied)
        );
    }

    #[test]
    fn test_task_ownership() {
        let t = task(10, TaskStatus::Draft, vec![]);
        assert!(ensure_task_owner(&professor(10), &t).is_ok());
        assert_eq!(
            ensure_task_owner(&professor(11), &t),
            Err(DenyReason::AccessDenied)
        );
        assert_eq!(
            ensure_task_owner(&student(20), &t),
            Err(DenyReason::AccessDenied)
        );
    }

    #[test]
    fn test_submission_create_deny_precedence() {
        let s = student(20);

        // 存在性优先于发布状态
        assert_eq!(
            ensure_submission_create(&s, None),
            Err(DenyReason::TaskNotFound)
        );

        // 未发布优先于未指派：草稿任务 + 未指派学生 → TaskNotPublished
        let draft_unassigned = task(10, TaskStatus::Draft, vec![]);
        assert_eq!(
            ensure_submission_create(&s, Some(&draft_unassigned)),
            Err(DenyReason::TaskNotPublished)
        );

        let published_unassigned = task(10, TaskStatus::Published, vec![21]);
        assert_eq!(
            ensure_submission_create(&s, Some(&published_unassigned)),
            Err(DenyReason::NotAssigned)
        );

        let ok_task = task(10, TaskStatus::Published, vec![20]);
        assert!(ensure_submission_create(&s, Some(&ok_task)).is_ok());

        // 教师不能创建提交
        assert_eq!(
            ensure_submission_create(&professor(10), Some(&ok_task)),
            Err(DenyReason::AccessDenied)
        );
    }

    #[test]
    fn test_submission_create_rejects_closed_task() {
        let closed = task(10, TaskStatus::Closed, vec![20]);
        assert_eq!(
            ensure_submission_create(&student(20), Some(&closed)),
            Err(DenyReason::TaskNotPublished)
        );
    }

    #[test]
    fn test_submission_visibility() {
        let t = task(10, TaskStatus::Published, vec![20]);
        let sub = submission(20, SubmissionStatus::Submitted);

        assert!(ensure_submission_visible(&student(20), &sub, Some(&t)).is_ok());
        assert_eq!(
            ensure_submission_visible(&student(21), &sub, Some(&t)),
            Err(DenyReason::AccessDenied)
        );
        assert!(ensure_submission_visible(&professor(10), &sub, Some(&t)).is_ok());
        assert_eq!(
            ensure_submission_visible(&professor(11), &sub, Some(&t)),
            Err(DenyReason::AccessDenied)
        );
        // 任务已删除：只有提交者本人可见
        assert!(ensure_submission_visible(&student(20), &sub, None).is_ok());
        assert_eq!(
            ensure_submission_visible(&professor(10), &sub, None),
            Err(DenyReason::AccessDenied)
        );
    }

    #[test]
    fn test_student_mutation_blocked_once_graded() {
        let owned = submission(20, SubmissionStatus::Submitted);
        assert!(ensure_student_mutation(&student(20), &owned).is_ok());

        let graded = submission(20, SubmissionStatus::Graded);
        assert_eq!(
            ensure_student_mutation(&student(20), &graded),
            Err(DenyReason::InvalidState)
        );

        // 非本人：即使未评分也拒绝
        assert_eq!(
            ensure_student_mutation(&student(21), &owned),
            Err(DenyReason::AccessDenied)
        );

        // 已退回的提交学生仍可修改
        let returned = submission(20, SubmissionStatus::Returned);
        assert!(ensure_student_mutation(&student(20), &returned).is_ok());
    }

    #[test]
    fn test_grader_must_own_task() {
        let t = task(10, TaskStatus::Published, vec![20]);
        assert!(ensure_grader(&professor(10), Some(&t)).is_ok());
        assert_eq!(
            ensure_grader(&professor(11), Some(&t)),
            Err(DenyReason::AccessDenied)
        );
        assert_eq!(
            ensure_grader(&student(20), Some(&t)),
            Err(DenyReason::AccessDenied)
        );
        assert_eq!(
            ensure_grader(&professor(10), None),
            Err(DenyReason::AccessDenied)
        );
    }

    #[test]
    fn test_score_bounds_inclusive() {
        assert!(validate_score(0.0, 100.0).is_ok());
        assert!(validate_score(100.0, 100.0).is_ok());
        assert!(validate_score(85.0, 100.0).is_ok());
        assert_eq!(
            validate_score(-0.5, 100.0),
            Err(DenyReason::ScoreOutOfRange)
        );
        assert_eq!(
            validate_score(100.5, 100.0),
            Err(DenyReason::ScoreOutOfRange)
        );
    }
}
