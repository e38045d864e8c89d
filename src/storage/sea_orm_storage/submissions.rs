use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::tasks;
use crate::errors::{Result, TaskSystemError};
use crate::models::{
    PaginationInfo,
    attachments::entities::Attachment,
    submissions::{
        entities::{Submission, SubmissionStatus, compute_is_late},
        requests::{
            CreateSubmissionRequest, GradeSubmissionRequest, SubmissionListQuery,
            UpdateSubmissionRequest,
        },
        responses::SubmissionListPage,
    },
    tasks::entities::Task,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr, sea_query,
};

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// 迟交标志在插入前一次性计算，之后即使任务截止时间被修改也不再变化。
    /// (task_id, student_id) 的唯一性由数据库唯一索引保证，并发重复插入
    /// 只有一个会成功，其余映射为 UniqueViolation。
    pub async fn create_submission_impl(
        &self,
        student_id: i64,
        task: &Task,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        let now = chrono::Utc::now();
        let is_late = compute_is_late(now, task.due_date);

        let attachments: Vec<Attachment> = req
            .attachment
            .into_iter()
            .map(|a| a.into_attachment())
            .collect();

        let model = ActiveModel {
            task_id: Set(task.id),
            student_id: Set(student_id),
            content: Set(req.content),
            attachments: Set(Some(serde_json::to_string(&attachments)?)),
            status: Set(SubmissionStatus::Submitted.to_string()),
            score: Set(None),
            feedback: Set(None),
            graded_by: Set(None),
            graded_at: Set(None),
            is_late: Set(is_late),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok(result.into_submission()),
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Err(TaskSystemError::unique_violation(format!(
                        "学生 {student_id} 已提交过任务 {}",
                        task.id
                    )))
                } else {
                    Err(TaskSystemError::database_operation(format!(
                        "创建提交失败: {e}"
                    )))
                }
            }
        }
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出提交
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListPage> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Submissions::find();

        if let Some(task_id) = query.task_id {
            select = select.filter(Column::TaskId.eq(task_id));
        }

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 按任务创建教师收敛（子查询命中 tasks；已删除任务的提交自然被排除）
        if let Some(owner_id) = query.task_owner_id {
            select = select.filter(
                Column::TaskId.in_subquery(
                    sea_query::Query::select()
                        .column(tasks::Column::Id)
                        .from(tasks::Entity)
                        .and_where(tasks::Column::ProfessorId.eq(owner_id))
                        .to_owned(),
                ),
            );
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询提交总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询提交页数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(SubmissionListPage {
            submissions: models.into_iter().map(|m| m.into_submission()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 学生修改提交内容
    ///
    /// content 覆盖，附件只追加不替换；is_late 不重算。
    pub async fn update_submission_impl(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询提交失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(submission_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(content) = update.content {
            model.content = Set(Some(content));
        }

        // 附件追加到现有列表
        if let Some(uploads) = update.attachments {
            let mut attachments: Vec<Attachment> = existing
                .attachments
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok())
                .unwrap_or_default();
            attachments.extend(uploads.into_iter().map(|a| a.into_attachment()));
            model.attachments = Set(Some(serde_json::to_string(&attachments)?));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("更新提交失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 教师评分（分数范围与状态机校验在服务层完成）
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grader_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询提交失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(submission_id),
            status: Set(SubmissionStatus::Graded.to_string()),
            score: Set(Some(grade.score)),
            feedback: Set(grade.feedback),
            graded_by: Set(Some(grader_id)),
            graded_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("评分失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 教师退回提交（分数与反馈保留）
    pub async fn return_submission_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询提交失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(submission_id),
            status: Set(SubmissionStatus::Returned.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("退回提交失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 删除提交
    pub async fn delete_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(submission_id)
            .exec(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("删除提交失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{task_assignees, tasks, users};
    use crate::models::tasks::entities::TaskStatus;
    use crate::models::tasks::requests::UpdateTaskRequest;
    use crate::storage::Storage;
    use chrono::{Duration, Utc};

    async fn seed_user(storage: &SeaOrmStorage, name: &str, role: &str) -> i64 {
        let now = Utc::now().timestamp();
        let model = users::ActiveModel {
            name: Set(name.to_string()),
            email: Set(format!("{name}@example.edu")),
            role: Set(role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        model.insert(&storage.db).await.unwrap().id
    }

    async fn seed_task(
        storage: &SeaOrmStorage,
        professor_id: i64,
        student_id: i64,
        due_date: chrono::DateTime<Utc>,
    ) -> Task {
        let now = Utc::now().timestamp();
        let model = tasks::ActiveModel {
            professor_id: Set(professor_id),
            title: Set("Essay".to_string()),
            description: Set("Write an essay".to_string()),
            due_date: Set(due_date.timestamp()),
            status: Set(TaskStatus::Published.to_string()),
            max_score: Set(100.0),
            attachments: Set(Some("[]".to_string())),
            instructions: Set(None),
            tags: Set(Some("[]".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let task = model.insert(&storage.db).await.unwrap();

        let assignee = task_assignees::ActiveModel {
            task_id: Set(task.id),
            student_id: Set(student_id),
            created_at: Set(now),
        };
        assignee.insert(&storage.db).await.unwrap();

        storage.get_task_by_id_impl(task.id).await.unwrap().unwrap()
    }

    fn submission_request(task_id: i64) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            task_id,
            content: Some("My answer".to_string()),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_submission() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let student = seed_user(&storage, "alice", "student").await;
        let task = seed_task(&storage, prof, student, Utc::now() + Duration::days(1)).await;

        let created = storage
            .create_submission_impl(student, &task, submission_request(task.id))
            .await
            .unwrap();

        assert_eq!(created.status, SubmissionStatus::Submitted);
        assert!(!created.is_late);
        assert_eq!(created.score, None);

        let fetched = storage
            .get_submission_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.task_id, task.id);
        assert_eq!(fetched.student_id, student);
    }

    #[tokio::test]
    async fn test_duplicate_submission_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let student = seed_user(&storage, "alice", "student").await;
        let task = seed_task(&storage, prof, student, Utc::now() + Duration::days(1)).await;

        storage
            .create_submission_impl(student, &task, submission_request(task.id))
            .await
            .unwrap();

        let err = storage
            .create_submission_impl(student, &task, submission_request(task.id))
            .await
            .unwrap_err();

        assert!(matches!(err, TaskSystemError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_only_one_succeeds() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let student = seed_user(&storage, "alice", "student").await;
        let task = seed_task(&storage, prof, student, Utc::now() + Duration::days(1)).await;

        let (a, b) = tokio::join!(
            storage.create_submission_impl(student, &task, submission_request(task.id)),
            storage.create_submission_impl(student, &task, submission_request(task.id)),
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|&&ok| ok).count();
        assert_eq!(successes, 1);

        let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(failure, TaskSystemError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_is_late_frozen_after_due_date_change() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let student = seed_user(&storage, "alice", "student").await;
        // 截止时间已过，提交必然迟交
        let task = seed_task(&storage, prof, student, Utc::now() - Duration::days(1)).await;

        let created = storage
            .create_submission_impl(student, &task, submission_request(task.id))
            .await
            .unwrap();
        assert!(created.is_late);

        // 教师把截止时间改到未来，已有提交的迟交标志不变
        storage
            .update_task(
                task.id,
                UpdateTaskRequest {
                    title: None,
                    description: None,
                    assigned_to: None,
                    due_date: Some(Utc::now() + Duration::days(7)),
                    max_score: None,
                    instructions: None,
                    tags: None,
                    attachments: None,
                },
            )
            .await
            .unwrap();

        let fetched = storage
            .get_submission_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.is_late);
    }

    #[tokio::test]
    async fn test_grade_then_return_keeps_score() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let student = seed_user(&storage, "alice", "student").await;
        let task = seed_task(&storage, prof, student, Utc::now() + Duration::days(1)).await;

        let created = storage
            .create_submission_impl(student, &task, submission_request(task.id))
            .await
            .unwrap();

        let graded = storage
            .grade_submission_impl(
                created.id,
                prof,
                GradeSubmissionRequest {
                    score: 85.0,
                    feedback: Some("Good work".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.score, Some(85.0));
        assert_eq!(graded.graded_by, Some(prof));
        assert!(graded.graded_at.is_some());

        let returned = storage
            .return_submission_impl(created.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(returned.status, SubmissionStatus::Returned);
        assert_eq!(returned.score, Some(85.0));
        assert_eq!(returned.feedback, Some("Good work".to_string()));
    }

    #[tokio::test]
    async fn test_task_deletion_keeps_submissions() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let student = seed_user(&storage, "alice", "student").await;
        let task = seed_task(&storage, prof, student, Utc::now() + Duration::days(1)).await;

        let created = storage
            .create_submission_impl(student, &task, submission_request(task.id))
            .await
            .unwrap();

        assert!(storage.delete_task_impl(task.id).await.unwrap());
        assert!(storage.get_task_by_id_impl(task.id).await.unwrap().is_none());

        // 提交成为孤儿记录但仍可读取
        let orphan = storage
            .get_submission_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(orphan.task_id, task.id);
    }

    #[tokio::test]
    async fn test_list_submissions_scoped_by_task_owner() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof_a = seed_user(&storage, "prof_a", "professor").await;
        let prof_b = seed_user(&storage, "prof_b", "professor").await;
        let student = seed_user(&storage, "alice", "student").await;
        let task_a = seed_task(&storage, prof_a, student, Utc::now() + Duration::days(1)).await;
        let task_b = seed_task(&storage, prof_b, student, Utc::now() + Duration::days(1)).await;

        storage
            .create_submission_impl(student, &task_a, submission_request(task_a.id))
            .await
            .unwrap();
        storage
            .create_submission_impl(student, &task_b, submission_request(task_b.id))
            .await
            .unwrap();

        let page = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                page: None,
                size: None,
                task_id: None,
                student_id: None,
                status: None,
                task_owner_id: Some(prof_a),
            })
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.submissions[0].task_id, task_a.id);
    }
}
