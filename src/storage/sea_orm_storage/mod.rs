//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod submissions;
mod tasks;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, TaskSystemError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TaskSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TaskSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TaskSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TaskSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试专用：单连接内存数据库（单连接保证所有查询命中同一个 :memory: 实例）
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| TaskSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opt)
            .await
            .map_err(|e| TaskSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

        Migrator::up(&db, None)
            .await
            .map_err(|e| TaskSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    // 任务模块
    async fn create_task(&self, professor_id: i64, task: CreateTaskRequest) -> Result<Task> {
        self.create_task_impl(professor_id, task).await
    }

    async fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>> {
        self.get_task_by_id_impl(task_id).await
    }

    async fn get_tasks_by_ids(&self, task_ids: &[i64]) -> Result<Vec<Task>> {
        self.get_tasks_by_ids_impl(task_ids).await
    }

    async fn list_tasks_with_pagination(&self, query: TaskListQuery) -> Result<TaskListPage> {
        self.list_tasks_with_pagination_impl(query).await
    }

    async fn update_task(&self, task_id: i64, update: UpdateTaskRequest) -> Result<Option<Task>> {
        self.update_task_impl(task_id, update).await
    }

    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<Option<Task>> {
        self.update_task_status_impl(task_id, status).await
    }

    async fn delete_task(&self, task_id: i64) -> Result<bool> {
        self.delete_task_impl(task_id).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        student_id: i64,
        task: &Task,
        submission: CreateSubmissionRequest,
    ) -> Result<Submission> {
        self.create_submission_impl(student_id, task, submission)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListPage> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn update_submission(
        &self,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Option<Submission>> {
        self.update_submission_impl(submission_id, update).await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(submission_id, grader_id, grade)
            .await
    }

    async fn return_submission(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.return_submission_impl(submission_id).await
    }

    async fn delete_submission(&self, submission_id: i64) -> Result<bool> {
        self.delete_submission_impl(submission_id).await
    }
}
