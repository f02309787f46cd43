//! # Resource Synchronizers
//!
//! One synchronizer per resource kind. Each is the recovery boundary for its
//! data operations: failures are classified by the gateway, stored here,
//! and surfaced through a [`Notifier`] rather than propagating further.

pub mod collection;
mod guard;
pub mod notify;
pub mod projects;
pub mod synchronizer;
pub mod tasks;
pub mod user;

pub use collection::ResourceCollection;
pub use notify::{Notification, NotificationLog, Notifier, Severity, TracingNotifier};
pub use projects::{ProjectResource, ProjectSynchronizer};
pub use synchronizer::{CreatePolicy, Resource, ResourceSynchronizer};
pub use tasks::{TaskResource, TaskSynchronizer};
pub use user::{UserRecord, UserSynchronizer};
