use std::sync::Arc;

use bincode::deserialize;
use bincode::serialize;
use chrono::DateTime;
use chrono::Utc;
use common::policy;
use common::policy::Caller;
use common::types::OptionalProperty;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::accounts::Accounts;
use crate::error::MetadataError;
use crate::index::next_seq;
use crate::list_data;
use crate::make_data_value_key;
use crate::make_id_seq_key;
use crate::metadata::ListResponse;
use crate::tasks::Tasks;
use crate::Result;

const NAMESPACE: &[u8] = b"projects";

// Locking read: the record stays locked until the transaction ends, so a
// policy check against its collaborator set can't be invalidated by a
// concurrent membership update before this transaction commits.
pub(crate) fn get_project_tx(tx: &Transaction<TransactionDB>, project_id: u64) -> Result<Project> {
    let key = make_data_value_key(NAMESPACE, project_id);
    match tx.get_for_update(key, true)? {
        None => Err(MetadataError::NotFound(format!(
            "project {project_id} not found"
        ))),
        Some(value) => Ok(deserialize(&value)?),
    }
}

pub struct Projects {
    db: Arc<TransactionDB>,
    accounts: Arc<Accounts>,
    tasks: Arc<Tasks>,
}

impl Projects {
    pub fn new(db: Arc<TransactionDB>, accounts: Arc<Accounts>, tasks: Arc<Tasks>) -> Self {
        Projects {
            db,
            accounts,
            tasks,
        }
    }

    fn resolve_collaborators(
        &self,
        tx: &Transaction<TransactionDB>,
        ids: &[u64],
    ) -> Result<Vec<u64>> {
        for id in ids {
            self.accounts
                .get_by_id_tx(tx, *id)
                .map_err(|_| MetadataError::NotFound(format!("collaborator {id} not found")))?;
        }

        Ok(ids.to_vec())
    }

    pub fn create(&self, req: CreateProjectRequest) -> Result<Project> {
        let tx = self.db.transaction();

        let mut collaborators = self.resolve_collaborators(&tx, &req.collaborators)?;
        // the creator always ends up in the set, requested or not
        collaborators.push(req.created_by);
        collaborators.sort_unstable();
        collaborators.dedup();

        let created_at = Utc::now();
        let id = next_seq(&tx, make_id_seq_key(NAMESPACE))?;

        let project = Project {
            id,
            created_at,
            updated_at: None,
            created_by: req.created_by,
            updated_by: None,
            name: req.name,
            description: req.description,
            img_url: req.img_url,
            collaborators,
        };
        let data = serialize(&project)?;
        tx.put(make_data_value_key(NAMESPACE, project.id), &data)?;

        tx.commit()?;
        Ok(project)
    }

    pub fn get_by_id(&self, project_id: u64) -> Result<Project> {
        let tx = self.db.transaction();
        get_project_tx(&tx, project_id)
    }

    pub fn list(&self) -> Result<ListResponse<Project>> {
        let tx = self.db.transaction();
        list_data(&tx, NAMESPACE)
    }

    pub fn list_for_account(&self, account_id: u64) -> Result<ListResponse<Project>> {
        let mut resp = self.list()?;
        resp.data
            .retain(|p: &Project| p.collaborators.contains(&account_id));
        Ok(resp)
    }

    pub fn update(
        &self,
        caller: &Caller,
        project_id: u64,
        req: UpdateProjectRequest,
    ) -> Result<Project> {
        let tx = self.db.transaction();

        let prev_project = get_project_tx(&tx, project_id)?;
        policy::check_project_access(caller, &prev_project.collaborators)?;
        let mut project = prev_project.clone();

        project.updated_at = Some(Utc::now());
        project.updated_by = Some(req.updated_by);
        if let OptionalProperty::Some(name) = req.name {
            project.name = name;
        }
        if let OptionalProperty::Some(description) = req.description {
            project.description = description;
        }
        if let OptionalProperty::Some(img_url) = req.img_url {
            project.img_url = img_url;
        }
        // a non-empty set replaces the whole membership; the caller may lock
        // themself out, there is deliberately no guard against that
        if let OptionalProperty::Some(collaborators) = req.collaborators {
            if !collaborators.is_empty() {
                let mut collaborators = self.resolve_collaborators(&tx, &collaborators)?;
                collaborators.sort_unstable();
                collaborators.dedup();
                project.collaborators = collaborators;
            }
        }

        let data = serialize(&project)?;
        tx.put(make_data_value_key(NAMESPACE, project_id), &data)?;

        tx.commit()?;
        Ok(project)
    }

    pub fn delete(&self, caller: &Caller, project_id: u64) -> Result<Project> {
        let tx = self.db.transaction();

        let project = get_project_tx(&tx, project_id)?;
        policy::check_project_access(caller, &project.collaborators)?;

        tx.delete(make_data_value_key(NAMESPACE, project_id))?;
        // cascade in the same transaction so a crash can't leave tasks
        // pointing at a deleted project
        self.tasks.delete_by_project_tx(&tx, project_id)?;

        tx.commit()?;
        Ok(project)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Project {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: u64,
    pub updated_by: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub img_url: Option<String>,
    pub collaborators: Vec<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateProjectRequest {
    pub created_by: u64,
    pub name: String,
    pub description: Option<String>,
    pub img_url: Option<String>,
    pub collaborators: Vec<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateProjectRequest {
    pub updated_by: u64,
    pub name: OptionalProperty<String>,
    pub description: OptionalProperty<Option<String>>,
    pub img_url: OptionalProperty<Option<String>>,
    pub collaborators: OptionalProperty<Vec<u64>>,
}
