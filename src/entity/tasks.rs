//! 任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub professor_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub due_date: i64,
    pub status: String,
    pub max_score: f64,
    /// JSON 序列化的附件列表
    #[sea_orm(column_type = "Text", nullable)]
    pub attachments: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    /// JSON 序列化的标签列表
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ProfessorId",
        to = "super::users::Column::Id"
    )]
    Professor,
    #[sea_orm(has_many = "super::task_assignees::Entity")]
    TaskAssignees,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::task_assignees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskAssignees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
//
// 指派名单存放在 task_assignees 表中，由调用方查好后传入。
impl Model {
    pub fn into_task(self, assigned_to: Vec<i64>) -> crate::models::tasks::entities::Task {
        use crate::models::tasks::entities::{Task, TaskStatus};
        use chrono::{DateTime, Utc};

        let attachments = self
            .attachments
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();
        let tags = self
            .tags
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();

        Task {
            id: self.id,
            professor_id: self.professor_id,
            title: self.title,
            description: self.description,
            assigned_to,
            due_date: DateTime::<Utc>::from_timestamp(self.due_date, 0).unwrap_or_default(),
            status: self
                .status
                .parse::<TaskStatus>()
                .unwrap_or(TaskStatus::Draft),
            max_score: self.max_score,
            attachments,
            instructions: self.instructions,
            tags,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
