use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::policy;
use common::types::OptionalProperty;
use metadata::projects::Projects as MDProjects;
use metadata::tasks::Tasks as MDTasks;
use serde::Deserialize;
use serde::Serialize;

use crate::Context;
use crate::ListResponse;
use crate::Result;

pub struct Tasks {
    prov: Arc<MDTasks>,
    projects: Arc<MDProjects>,
}

impl Tasks {
    pub fn new(prov: Arc<MDTasks>, projects: Arc<MDProjects>) -> Self {
        Self { prov, projects }
    }

    pub async fn create(&self, ctx: Context, req: CreateTaskRequest) -> Result<Task> {
        let md_req = metadata::tasks::CreateTaskRequest {
            created_by: ctx.account_id,
            title: req.title,
            description: req.description,
            status: req.status,
            project_id: req.project_id,
        };

        let task = self.prov.create(md_req)?;

        Ok(task.into())
    }

    pub async fn get_by_id(&self, ctx: Context, task_id: u64) -> Result<Task> {
        let task = self.prov.get_by_id(task_id)?;
        let collaborators = match task.project_id {
            None => None,
            Some(project_id) => Some(self.projects.get_by_id(project_id)?.collaborators),
        };
        policy::check_task_read(&ctx.caller(), task.created_by, collaborators.as_deref())?;

        Ok(task.into())
    }

    pub async fn list(&self, ctx: Context) -> Result<ListResponse<Task>> {
        let resp = if ctx.is_admin() {
            self.prov.list()?
        } else {
            self.prov.list_by_user(ctx.account_id)?
        };

        Ok(resp.into())
    }

    pub async fn list_by_project(
        &self,
        ctx: Context,
        project_id: u64,
    ) -> Result<ListResponse<Task>> {
        let project = self.projects.get_by_id(project_id)?;
        policy::check_project_access(&ctx.caller(), &project.collaborators)?;

        // collaborators only see their own slice of the project
        let resp = if ctx.is_admin() {
            self.prov.list_by_project(project_id)?
        } else {
            self.prov.list_by_user_and_project(ctx.account_id, project_id)?
        };

        Ok(resp.into())
    }

    pub async fn list_own(&self, ctx: Context) -> Result<ListResponse<Task>> {
        Ok(self.prov.list_by_user(ctx.account_id)?.into())
    }

    pub async fn list_own_in_project(
        &self,
        ctx: Context,
        project_id: u64,
    ) -> Result<ListResponse<Task>> {
        let project = self.projects.get_by_id(project_id)?;
        policy::check_project_access(&ctx.caller(), &project.collaborators)?;

        Ok(self
            .prov
            .list_by_user_and_project(ctx.account_id, project_id)?
            .into())
    }

    pub async fn update(&self, ctx: Context, task_id: u64, req: UpdateTaskRequest) -> Result<Task> {
        let md_req = metadata::tasks::UpdateTaskRequest {
            title: req.title,
            description: req.description,
            status: req.status,
            project_id: req.project_id,
        };

        let task = self.prov.update(&ctx.caller(), task_id, md_req)?;

        Ok(task.into())
    }

    pub async fn delete(&self, ctx: Context, task_id: u64) -> Result<Task> {
        Ok(self.prov.delete(&ctx.caller(), task_id)?.into())
    }

    pub async fn finish(&self, ctx: Context, task_id: u64) -> Result<Task> {
        Ok(self.prov.mark_finished(ctx.account_id, task_id)?.into())
    }

    pub async fn set_status(
        &self,
        ctx: Context,
        task_id: u64,
        req: SetStatusRequest,
    ) -> Result<Task> {
        Ok(self
            .prov
            .set_status(ctx.account_id, task_id, req.status)?
            .into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub project_id: Option<u64>,
}

impl From<metadata::tasks::Task> for Task {
    fn from(task: metadata::tasks::Task) -> Self {
        Task {
            id: task.id,
            created_at: task.created_at,
            updated_at: task.updated_at,
            created_by: task.created_by,
            title: task.title,
            description: task.description,
            status: task.status,
            project_id: task.project_id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: OptionalProperty<String>,
    #[serde(default)]
    pub description: OptionalProperty<Option<String>>,
    #[serde(default)]
    pub status: OptionalProperty<String>,
    #[serde(default)]
    pub project_id: OptionalProperty<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetStatusRequest {
    pub status: String,
}
