//! Task endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::api_client::{path_segment, ApiClient, ApiResult, QueryParams, ToQuery};
use crate::models::{CreateTaskRequest, Task, TaskReflection, TaskStatus, UpdateTaskRequest};

/// Optional filters for `GET /tasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub project_id: Option<String>,
    pub scheduled_for: Option<String>,
    pub tags: Vec<String>,
}

impl ToQuery for TaskFilters {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("status", self.status.map(|s| s.as_str()))
            .with_opt("projectId", self.project_id.as_deref())
            .with_opt("scheduledFor", self.scheduled_for.as_deref())
            .with_all("tags", &self.tags)
    }
}

impl ApiClient {
    /// GET /tasks
    pub async fn list_tasks(&self, filters: &TaskFilters) -> ApiResult<Vec<Task>> {
        self.get_with_query("/tasks", &filters.to_query()).await
    }

    /// GET /tasks/today
    pub async fn list_today_tasks(&self) -> ApiResult<Vec<Task>> {
        self.get("/tasks/today").await
    }

    /// GET /tasks/actionable
    pub async fn list_actionable_tasks(&self) -> ApiResult<Vec<Task>> {
        self.get("/tasks/actionable").await
    }

    /// GET /tasks/{id}
    pub async fn get_task(&self, id: &str) -> ApiResult<Task> {
        self.get(&format!("/tasks/{}", path_segment(id)?)).await
    }

    /// POST /tasks
    pub async fn create_task(&self, request: &CreateTaskRequest) -> ApiResult<Task> {
        self.post("/tasks", Some(request)).await
    }

    /// PUT /tasks/{id}
    pub async fn update_task(&self, id: &str, request: &UpdateTaskRequest) -> ApiResult<Task> {
        self.put(&format!("/tasks/{}", path_segment(id)?), request).await
    }

    /// DELETE /tasks/{id}
    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        let _: Value = self.delete(&format!("/tasks/{}", path_segment(id)?)).await?;
        Ok(())
    }

    /// PATCH /tasks/{id}/complete
    pub async fn complete_task(&self, id: &str) -> ApiResult<Task> {
        self.patch(&format!("/tasks/{}/complete", path_segment(id)?), None::<&()>)
            .await
    }

    /// PATCH /tasks/{id}/reorder
    pub async fn reorder_task(&self, id: &str, user_defined_order: i64) -> ApiResult<Task> {
        let body = json!({ "userDefinedOrder": user_defined_order });
        self.patch(&format!("/tasks/{}/reorder", path_segment(id)?), Some(&body))
            .await
    }

    /// POST /tasks/{id}/notes
    pub async fn add_task_note(&self, id: &str, content: &str) -> ApiResult<Task> {
        let body = json!({ "content": content });
        self.post(&format!("/tasks/{}/notes", path_segment(id)?), Some(&body)).await
    }

    /// POST /tasks/{id}/reflection
    pub async fn update_task_reflection(
        &self,
        id: &str,
        reflection: &TaskReflection,
    ) -> ApiResult<Task> {
        self.post(&format!("/tasks/{}/reflection", path_segment(id)?), Some(reflection))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_produce_no_query() {
        assert!(TaskFilters::default().to_query().is_empty());
    }

    #[test]
    fn test_filters_use_wire_names() {
        let filters = TaskFilters {
            status: Some(TaskStatus::InProgress),
            project_id: Some("p-1".to_string()),
            scheduled_for: None,
            tags: vec!["deep".to_string(), "work".to_string()],
        };

        let query = filters.to_query();
        let pairs: Vec<(&str, &str)> = query
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("status", "IN_PROGRESS"),
                ("projectId", "p-1"),
                ("tags", "deep"),
                ("tags", "work"),
            ]
        );
    }
}
