//! Task synchronizer: the generic collection lifecycle plus the task-specific
//! transitions (complete, reorder, notes, reflection).

use async_trait::async_trait;

use super::synchronizer::{replace_cached, Resource, ResourceSynchronizer};
use crate::api_clients::{ApiClient, ApiResult, TaskFilters};
use crate::classifier::ParsedError;
use crate::models::{CreateTaskRequest, Task, TaskReflection, UpdateTaskRequest};

#[derive(Debug, Default, Clone, Copy)]
pub struct TaskResource;

#[async_trait]
impl Resource for TaskResource {
    type Item = Task;
    type Filters = TaskFilters;
    type Create = CreateTaskRequest;
    type Update = UpdateTaskRequest;

    const LABEL: &'static str = "Task";

    async fn list(&self, api: &ApiClient, filters: &TaskFilters) -> ApiResult<Vec<Task>> {
        api.list_tasks(filters).await
    }

    async fn create(&self, api: &ApiClient, input: &CreateTaskRequest) -> ApiResult<Task> {
        api.create_task(input).await
    }

    async fn update(&self, api: &ApiClient, id: &str, patch: &UpdateTaskRequest) -> ApiResult<Task> {
        api.update_task(id, patch).await
    }

    async fn remove(&self, api: &ApiClient, id: &str) -> ApiResult<()> {
        api.delete_task(id).await
    }
}

pub type TaskSynchronizer = ResourceSynchronizer<TaskResource>;

impl ResourceSynchronizer<TaskResource> {
    /// Load today's tasks into the collection
    pub async fn fetch_today(&self) -> Result<Vec<Task>, ParsedError> {
        self.load(self.api().list_today_tasks()).await
    }

    /// Load actionable tasks into the collection
    pub async fn fetch_actionable(&self) -> Result<Vec<Task>, ParsedError> {
        self.load(self.api().list_actionable_tasks()).await
    }

    /// Fetch one task and refresh its cached copy if present
    pub async fn get(&self, id: &str) -> Result<Task, ParsedError> {
        let task = self.read(self.api().get_task(id)).await?;
        self.reconcile(|collection| {
            collection.replace(task.clone());
        });
        Ok(task)
    }

    /// Mark a task done through the dedicated transition endpoint.
    ///
    /// Whether completing an already terminal task is rejected or idempotent
    /// is up to the server; the cache only changes on success.
    pub async fn complete(&self, id: &str) -> Result<Task, ParsedError> {
        self.mutate(
            "complete",
            "Task completed successfully",
            self.api().complete_task(id),
            replace_cached,
        )
        .await
    }

    /// Assign a new ordinal. Cached ordering is not re-sorted; refetch to see
    /// the new order.
    pub async fn reorder(&self, id: &str, user_defined_order: i64) -> Result<Task, ParsedError> {
        self.mutate(
            "reorder",
            "Task reordered successfully",
            self.api().reorder_task(id, user_defined_order),
            replace_cached,
        )
        .await
    }

    pub async fn add_note(&self, id: &str, content: &str) -> Result<Task, ParsedError> {
        self.mutate(
            "add note to",
            "Note added successfully",
            self.api().add_task_note(id, content),
            replace_cached,
        )
        .await
    }

    pub async fn update_reflection(
        &self,
        id: &str,
        reflection: &TaskReflection,
    ) -> Result<Task, ParsedError> {
        self.mutate(
            "save reflection for",
            "Reflection saved successfully",
            self.api().update_task_reflection(id, reflection),
            replace_cached,
        )
        .await
    }
}
