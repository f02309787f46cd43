//! Project synchronizer.

use async_trait::async_trait;
use serde_json::Value;

use super::synchronizer::{replace_cached, Resource, ResourceSynchronizer};
use crate::api_clients::{ApiClient, ApiResult};
use crate::classifier::ParsedError;
use crate::models::{CanvasPosition, CreateProjectRequest, Project, UpdateProjectRequest};

#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectResource;

#[async_trait]
impl Resource for ProjectResource {
    type Item = Project;
    type Filters = ();
    type Create = CreateProjectRequest;
    type Update = UpdateProjectRequest;

    const LABEL: &'static str = "Project";

    async fn list(&self, api: &ApiClient, _filters: &()) -> ApiResult<Vec<Project>> {
        api.list_projects().await
    }

    async fn create(&self, api: &ApiClient, input: &CreateProjectRequest) -> ApiResult<Project> {
        api.create_project(input).await
    }

    async fn update(
        &self,
        api: &ApiClient,
        id: &str,
        patch: &UpdateProjectRequest,
    ) -> ApiResult<Project> {
        api.update_project(id, patch).await
    }

    async fn remove(&self, api: &ApiClient, id: &str) -> ApiResult<()> {
        api.delete_project(id).await
    }
}

pub type ProjectSynchronizer = ResourceSynchronizer<ProjectResource>;

impl ResourceSynchronizer<ProjectResource> {
    /// Fetch one project and refresh its cached copy if present
    pub async fn get(&self, id: &str) -> Result<Project, ParsedError> {
        let project = self.read(self.api().get_project(id)).await?;
        self.reconcile(|collection| {
            collection.replace(project.clone());
        });
        Ok(project)
    }

    /// Move a project on the planning canvas
    pub async fn update_position(
        &self,
        id: &str,
        position: CanvasPosition,
    ) -> Result<Project, ParsedError> {
        self.mutate(
            "update position of",
            "Project position updated",
            self.api().update_project_position(id, position),
            replace_cached,
        )
        .await
    }

    /// Server-computed statistics; not cached
    pub async fn statistics(&self, id: &str) -> Result<Value, ParsedError> {
        self.read(self.api().get_project_statistics(id)).await
    }
}
