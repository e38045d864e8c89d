pub mod submissions;

pub mod tasks;

pub mod users;

pub use submissions::configure_submissions_routes;
pub use tasks::configure_tasks_routes;
pub use users::configure_user_routes;
