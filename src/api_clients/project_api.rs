//! Project endpoints.

use serde_json::{json, Value};

use super::api_client::{path_segment, ApiClient, ApiResult};
use crate::models::{CanvasPosition, CreateProjectRequest, Project, UpdateProjectRequest};

impl ApiClient {
    /// GET /projects
    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get("/projects").await
    }

    /// GET /projects/{id}
    pub async fn get_project(&self, id: &str) -> ApiResult<Project> {
        self.get(&format!("/projects/{}", path_segment(id)?)).await
    }

    /// POST /projects
    pub async fn create_project(&self, request: &CreateProjectRequest) -> ApiResult<Project> {
        self.post("/projects", Some(request)).await
    }

    /// PUT /projects/{id}
    pub async fn update_project(
        &self,
        id: &str,
        request: &UpdateProjectRequest,
    ) -> ApiResult<Project> {
        self.put(&format!("/projects/{}", path_segment(id)?), request).await
    }

    /// DELETE /projects/{id}
    pub async fn delete_project(&self, id: &str) -> ApiResult<()> {
        let _: Value = self.delete(&format!("/projects/{}", path_segment(id)?)).await?;
        Ok(())
    }

    /// PATCH /projects/{id}/position
    pub async fn update_project_position(
        &self,
        id: &str,
        position: CanvasPosition,
    ) -> ApiResult<Project> {
        let body = json!({ "position": position });
        self.patch(&format!("/projects/{}/position", path_segment(id)?), Some(&body))
            .await
    }

    /// GET /projects/{id}/statistics
    ///
    /// The statistics shape is server-defined and returned as-is.
    pub async fn get_project_statistics(&self, id: &str) -> ApiResult<Value> {
        self.get(&format!("/projects/{}/statistics", path_segment(id)?)).await
    }
}
