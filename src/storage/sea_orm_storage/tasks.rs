use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::task_assignees;
use crate::entity::tasks::{ActiveModel, Column, Entity as Tasks};
use crate::errors::{Result, TaskSystemError};
use crate::models::{
    PaginationInfo,
    attachments::entities::Attachment,
    tasks::{
        entities::{Task, TaskStatus},
        requests::{CreateTaskRequest, TaskListQuery, UpdateTaskRequest},
        responses::TaskListPage,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query,
};

impl SeaOrmStorage {
    /// 创建任务（初始为草稿状态）
    pub async fn create_task_impl(
        &self,
        professor_id: i64,
        req: CreateTaskRequest,
    ) -> Result<Task> {
        let now = chrono::Utc::now().timestamp();

        let attachments: Vec<Attachment> = req
            .attachments
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.into_attachment())
            .collect();
        let mut assigned_to = req.assigned_to.unwrap_or_default();
        assigned_to.sort_unstable();
        assigned_to.dedup();

        let model = ActiveModel {
            professor_id: Set(professor_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.timestamp()),
            status: Set(TaskStatus::Draft.to_string()),
            max_score: Set(req.max_score.unwrap_or(100.0)),
            attachments: Set(Some(serde_json::to_string(&attachments)?)),
            instructions: Set(req.instructions),
            tags: Set(Some(serde_json::to_string(
                &req.tags.unwrap_or_default(),
            )?)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("创建任务失败: {e}")))?;

        Self::insert_assignees(&txn, result.id, &assigned_to, now).await?;

        txn.commit()
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_task(assigned_to))
    }

    /// 通过 ID 获取任务
    pub async fn get_task_by_id_impl(&self, task_id: i64) -> Result<Option<Task>> {
        let result = Tasks::find_by_id(task_id)
            .one(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询任务失败: {e}")))?;

        match result {
            Some(model) => {
                let assigned_to = self.load_assignees(task_id).await?;
                Ok(Some(model.into_task(assigned_to)))
            }
            None => Ok(None),
        }
    }

    /// 批量获取任务（存在的才返回，顺序不保证）
    pub async fn get_tasks_by_ids_impl(&self, task_ids: &[i64]) -> Result<Vec<Task>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Tasks::find()
            .filter(Column::Id.is_in(task_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("批量查询任务失败: {e}")))?;

        let mut assignee_map = self
            .load_assignees_batch(&models.iter().map(|m| m.id).collect::<Vec<_>>())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let assigned_to = assignee_map.remove(&m.id).unwrap_or_default();
                m.into_task(assigned_to)
            })
            .collect())
    }

    /// 分页列出任务
    pub async fn list_tasks_with_pagination_impl(
        &self,
        query: TaskListQuery,
    ) -> Result<TaskListPage> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Tasks::find();

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 按创建教师收敛
        if let Some(professor_id) = query.professor_id {
            select = select.filter(Column::ProfessorId.eq(professor_id));
        }

        // 按指派学生收敛（子查询命中 task_assignees）
        if let Some(student_id) = query.assigned_to {
            select = select.filter(
                Column::Id.in_subquery(
                    sea_query::Query::select()
                        .column(task_assignees::Column::TaskId)
                        .from(task_assignees::Entity)
                        .and_where(task_assignees::Column::StudentId.eq(student_id))
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
            .map_err(|e| TaskSystemError::database_operation(format!("查询任务总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询任务页数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询任务列表失败: {e}")))?;

        let mut assignee_map = self
            .load_assignees_batch(&models.iter().map(|m| m.id).collect::<Vec<_>>())
            .await?;

        Ok(TaskListPage {
            tasks: models
                .into_iter()
                .map(|m| {
                    let assigned_to = assignee_map.remove(&m.id).unwrap_or_default();
                    m.into_task(assigned_to)
                })
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新任务字段
    ///
    /// 附件只追加不替换；指派名单整体替换；状态不在此变更。
    pub async fn update_task_impl(
        &self,
        task_id: i64,
        update: UpdateTaskRequest,
    ) -> Result<Option<Task>> {
        let existing = Tasks::find_by_id(task_id)
            .one(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询任务失败: {e}")))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(task_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }

        if let Some(instructions) = update.instructions {
            model.instructions = Set(Some(instructions));
        }

        if let Some(tags) = update.tags {
            model.tags = Set(Some(serde_json::to_string(&tags)?));
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

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("开启事务失败: {e}")))?;

        model
            .update(&txn)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("更新任务失败: {e}")))?;

        // 指派名单整体替换
        if let Some(mut assigned_to) = update.assigned_to {
            assigned_to.sort_unstable();
            assigned_to.dedup();

            task_assignees::Entity::delete_many()
                .filter(task_assignees::Column::TaskId.eq(task_id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    TaskSystemError::database_operation(format!("清除任务指派失败: {e}"))
                })?;

            Self::insert_assignees(&txn, task_id, &assigned_to, now).await?;
        }

        txn.commit()
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_task_by_id_impl(task_id).await
    }

    /// 更新任务状态（publish / close 的落库动作，状态机校验在服务层完成）
    pub async fn update_task_status_impl(
        &self,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<Option<Task>> {
        let now = chrono::Utc::now().timestamp();

        let result = Tasks::update_many()
            .col_expr(Column::Status, sea_query::Expr::value(status.to_string()))
            .col_expr(Column::UpdatedAt, sea_query::Expr::value(now))
            .filter(Column::Id.eq(task_id))
            .exec(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("更新任务状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_task_by_id_impl(task_id).await
    }

    /// 删除任务（指派关系级联删除，提交保留为孤儿记录）
    pub async fn delete_task_impl(&self, task_id: i64) -> Result<bool> {
        let result = Tasks::delete_by_id(task_id)
            .exec(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("删除任务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 查询单个任务的指派名单
    pub(crate) async fn load_assignees(&self, task_id: i64) -> Result<Vec<i64>> {
        let rows = task_assignees::Entity::find()
            .filter(task_assignees::Column::TaskId.eq(task_id))
            .order_by_asc(task_assignees::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询任务指派失败: {e}")))?;

        Ok(rows.into_iter().map(|r| r.student_id).collect())
    }

    /// 批量查询指派名单，按任务 ID 分组
    async fn load_assignees_batch(&self, task_ids: &[i64]) -> Result<HashMap<i64, Vec<i64>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = task_assignees::Entity::find()
            .filter(task_assignees::Column::TaskId.is_in(task_ids.to_vec()))
            .order_by_asc(task_assignees::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("查询任务指派失败: {e}")))?;

        let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in rows {
            map.entry(row.task_id).or_default().push(row.student_id);
        }
        Ok(map)
    }

    async fn insert_assignees<C: ConnectionTrait>(
        conn: &C,
        task_id: i64,
        student_ids: &[i64],
        now: i64,
    ) -> Result<()> {
        if student_ids.is_empty() {
            return Ok(());
        }

        let rows: Vec<task_assignees::ActiveModel> = student_ids
            .iter()
            .map(|&student_id| task_assignees::ActiveModel {
                task_id: Set(task_id),
                student_id: Set(student_id),
                created_at: Set(now),
            })
            .collect();

        task_assignees::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("写入任务指派失败: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::users;
    use crate::models::attachments::entities::AttachmentUpload;
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

    fn task_request(assigned_to: Vec<i64>) -> CreateTaskRequest {
        CreateTaskRequest {
            title: "Essay".to_string(),
            description: "Write an essay".to_string(),
            assigned_to: Some(assigned_to),
            due_date: Utc::now() + Duration::days(7),
            max_score: None,
            instructions: None,
            tags: None,
            attachments: None,
        }
    }

    #[tokio::test]
    async fn test_create_task_starts_as_draft_with_deduped_assignees() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let alice = seed_user(&storage, "alice", "student").await;
        let bob = seed_user(&storage, "bob", "student").await;

        let task = storage
            .create_task_impl(prof, task_request(vec![bob, alice, alice]))
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Draft);
        assert_eq!(task.max_score, 100.0);
        assert_eq!(task.assigned_to, vec![alice, bob]);
    }

    #[tokio::test]
    async fn test_update_task_replaces_assignees_and_appends_attachments() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let alice = seed_user(&storage, "alice", "student").await;
        let bob = seed_user(&storage, "bob", "student").await;

        let task = storage
            .create_task_impl(prof, task_request(vec![alice]))
            .await
            .unwrap();

        let upload = |name: &str| AttachmentUpload {
            filename: format!("{name}.pdf"),
            original_name: format!("{name}.pdf"),
            path: format!("/files/{name}.pdf"),
            size: 1024,
        };

        let first = storage
            .update_task_impl(
                task.id,
                UpdateTaskRequest {
                    title: None,
                    description: None,
                    assigned_to: Some(vec![bob]),
                    due_date: None,
                    max_score: None,
                    instructions: None,
                    tags: None,
                    attachments: Some(vec![upload("rubric")]),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.assigned_to, vec![bob]);
        assert_eq!(first.attachments.len(), 1);

        let second = storage
            .update_task_impl(
                task.id,
                UpdateTaskRequest {
                    title: None,
                    description: None,
                    assigned_to: None,
                    due_date: None,
                    max_score: None,
                    instructions: None,
                    tags: None,
                    attachments: Some(vec![upload("errata")]),
                },
            )
            .await
            .unwrap()
            .unwrap();

        // 附件追加而非替换，指派名单未传入时保持不变
        assert_eq!(second.attachments.len(), 2);
        assert_eq!(second.assigned_to, vec![bob]);
    }

    #[tokio::test]
    async fn test_update_task_status_roundtrip() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let alice = seed_user(&storage, "alice", "student").await;

        let task = storage
            .create_task_impl(prof, task_request(vec![alice]))
            .await
            .unwrap();

        let published = storage
            .update_task_status_impl(task.id, TaskStatus::Published)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(published.status, TaskStatus::Published);

        let missing = storage
            .update_task_status_impl(task.id + 999, TaskStatus::Closed)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_tasks_scoped_by_assignee() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let prof = seed_user(&storage, "prof", "professor").await;
        let alice = seed_user(&storage, "alice", "student").await;
        let bob = seed_user(&storage, "bob", "student").await;

        let task_a = storage
            .create_task_impl(prof, task_request(vec![alice]))
            .await
            .unwrap();
        storage
            .create_task_impl(prof, task_request(vec![bob]))
            .await
            .unwrap();

        let page = storage
            .list_tasks_with_pagination_impl(TaskListQuery {
                page: None,
                size: None,
                status: None,
                professor_id: None,
                assigned_to: Some(alice),
            })
            .await
            .unwrap();

        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.tasks[0].id, task_a.id);
    }
}
