//! Records exchanged with the organizer API.
//!
//! These mirror the server's JSON (camelCase fields, SCREAMING_SNAKE_CASE
//! enums). The client holds them as a read-through cache only.

pub mod project;
pub mod task;
pub mod user;

pub use project::{
    CanvasPosition, CreateProjectRequest, Project, ProjectPriority, ProjectSettings,
    ProjectStatus, UpdateProjectRequest,
};
pub use task::{
    CreateTaskRequest, Task, TaskNote, TaskReflection, TaskStatus, TaskType, UpdateTaskRequest,
};
pub use user::{UpdateUserRequest, User, UserPreferences};

/// Records addressable by a server-assigned id
pub trait Identified {
    fn id(&self) -> &str;
}
