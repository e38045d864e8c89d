pub use super::submissions::Entity as Submissions;
pub use super::task_assignees::Entity as TaskAssignees;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
