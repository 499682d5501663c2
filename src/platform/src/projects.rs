use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::policy;
use common::types::OptionalProperty;
use metadata::projects::Projects as MDProjects;
use serde::Deserialize;
use serde::Serialize;

use crate::Context;
use crate::ListResponse;
use crate::Result;

pub struct Projects {
    prov: Arc<MDProjects>,
}

impl Projects {
    pub fn new(prov: Arc<MDProjects>) -> Self {
        Self { prov }
    }

    pub async fn create(&self, ctx: Context, req: CreateProjectRequest) -> Result<Project> {
        let md_req = metadata::projects::CreateProjectRequest {
            created_by: ctx.account_id,
            name: req.name,
            description: req.description,
            img_url: req.img_url,
            collaborators: req.collaborators,
        };

        let project = self.prov.create(md_req)?;

        Ok(project.into())
    }

    pub async fn get_by_id(&self, ctx: Context, project_id: u64) -> Result<Project> {
        let project = self.prov.get_by_id(project_id)?;
        policy::check_project_access(&ctx.caller(), &project.collaborators)?;

        Ok(project.into())
    }

    pub async fn list(&self, ctx: Context) -> Result<ListResponse<Project>> {
        let resp = if ctx.is_admin() {
            self.prov.list()?
        } else {
            self.prov.list_for_account(ctx.account_id)?
        };

        Ok(resp.into())
    }

    pub async fn update(
        &self,
        ctx: Context,
        project_id: u64,
        req: UpdateProjectRequest,
    ) -> Result<Project> {
        let md_req = metadata::projects::UpdateProjectRequest {
            updated_by: ctx.account_id,
            name: req.name,
            description: req.description,
            img_url: req.img_url,
            collaborators: req.collaborators,
        };

        let project = self.prov.update(&ctx.caller(), project_id, md_req)?;

        Ok(project.into())
    }

    pub async fn delete(&self, ctx: Context, project_id: u64) -> Result<Project> {
        Ok(self.prov.delete(&ctx.caller(), project_id)?.into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: u64,
    pub name: String,
    pub description: Option<String>,
    pub img_url: Option<String>,
    pub collaborators: Vec<u64>,
}

impl From<metadata::projects::Project> for Project {
    fn from(project: metadata::projects::Project) -> Self {
        Project {
            id: project.id,
            created_at: project.created_at,
            updated_at: project.updated_at,
            created_by: project.created_by,
            name: project.name,
            description: project.description,
            img_url: project.img_url,
            collaborators: project.collaborators,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub img_url: Option<String>,
    #[serde(default)]
    pub collaborators: Vec<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: OptionalProperty<String>,
    #[serde(default)]
    pub description: OptionalProperty<Option<String>>,
    #[serde(default)]
    pub img_url: OptionalProperty<Option<String>>,
    #[serde(default)]
    pub collaborators: OptionalProperty<Vec<u64>>,
}
