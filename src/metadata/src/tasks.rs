use std::sync::Arc;

use bincode::deserialize;
use bincode::serialize;
use chrono::DateTime;
use chrono::Utc;
use common::policy;
use common::policy::Caller;
use common::types::OptionalProperty;
use common::TASK_STATUS_FINISHED;
use common::TASK_STATUS_OPEN;
use rocksdb::Direction;
use rocksdb::IteratorMode;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::error::MetadataError;
use crate::index::next_seq;
use crate::list_data;
use crate::make_data_key;
use crate::make_data_value_key;
use crate::make_id_seq_key;
use crate::metadata::ListResponse;
use crate::projects::get_project_tx;
use crate::Result;

const NAMESPACE: &[u8] = b"tasks";

fn get_task_tx(tx: &Transaction<TransactionDB>, task_id: u64) -> Result<Task> {
    let key = make_data_value_key(NAMESPACE, task_id);
    match tx.get(key)? {
        None => Err(MetadataError::NotFound(format!("task {task_id} not found"))),
        Some(value) => Ok(deserialize(&value)?),
    }
}

// Collaborator set of the task's project, when it has one. Read with a lock
// inside the caller's transaction, so the membership seen by the policy check
// holds until this transaction commits.
fn project_collaborators_tx(
    tx: &Transaction<TransactionDB>,
    task: &Task,
) -> Result<Option<Vec<u64>>> {
    match task.project_id {
        None => Ok(None),
        Some(project_id) => Ok(Some(get_project_tx(tx, project_id)?.collaborators)),
    }
}

pub struct Tasks {
    db: Arc<TransactionDB>,
}

impl Tasks {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        Tasks { db }
    }

    pub fn create(&self, req: CreateTaskRequest) -> Result<Task> {
        let tx = self.db.transaction();

        if let Some(project_id) = req.project_id {
            let project = get_project_tx(&tx, project_id)?;
            policy::check_task_create_in_project(req.created_by, &project.collaborators)?;
        }

        let created_at = Utc::now();
        let id = next_seq(&tx, make_id_seq_key(NAMESPACE))?;

        let task = Task {
            id,
            created_at,
            updated_at: None,
            created_by: req.created_by,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_else(|| TASK_STATUS_OPEN.to_string()),
            project_id: req.project_id,
        };
        let data = serialize(&task)?;
        tx.put(make_data_value_key(NAMESPACE, task.id), &data)?;

        tx.commit()?;
        Ok(task)
    }

    pub fn get_by_id(&self, task_id: u64) -> Result<Task> {
        let tx = self.db.transaction();
        get_task_tx(&tx, task_id)
    }

    pub fn list(&self) -> Result<ListResponse<Task>> {
        let tx = self.db.transaction();
        list_data(&tx, NAMESPACE)
    }

    pub fn list_by_user(&self, account_id: u64) -> Result<ListResponse<Task>> {
        let mut resp = self.list()?;
        resp.data.retain(|t: &Task| t.created_by == account_id);
        Ok(resp)
    }

    pub fn list_by_project(&self, project_id: u64) -> Result<ListResponse<Task>> {
        let mut resp = self.list()?;
        resp.data.retain(|t: &Task| t.project_id == Some(project_id));
        Ok(resp)
    }

    pub fn list_by_user_and_project(
        &self,
        account_id: u64,
        project_id: u64,
    ) -> Result<ListResponse<Task>> {
        let mut resp = self.list()?;
        resp.data
            .retain(|t: &Task| t.created_by == account_id && t.project_id == Some(project_id));
        Ok(resp)
    }

    pub fn update(&self, caller: &Caller, task_id: u64, req: UpdateTaskRequest) -> Result<Task> {
        let tx = self.db.transaction();

        let prev_task = get_task_tx(&tx, task_id)?;
        policy::check_task_edit(caller, prev_task.created_by)?;
        let mut task = prev_task.clone();

        if let OptionalProperty::Some(project_id) = req.project_id {
            let project = get_project_tx(&tx, project_id)?;
            // membership is checked only when a standalone task gets
            // attached; moving between projects goes unchecked, as in the
            // original backend
            if prev_task.project_id.is_none() {
                policy::check_task_attach(caller, &project.collaborators)?;
            }
            task.project_id = Some(project_id);
        }

        task.updated_at = Some(Utc::now());
        if let OptionalProperty::Some(title) = req.title {
            task.title = title;
        }
        if let OptionalProperty::Some(description) = req.description {
            task.description = description;
        }
        if let OptionalProperty::Some(status) = req.status {
            task.status = status;
        }

        let data = serialize(&task)?;
        tx.put(make_data_value_key(NAMESPACE, task_id), &data)?;

        tx.commit()?;
        Ok(task)
    }

    pub fn delete(&self, caller: &Caller, task_id: u64) -> Result<Task> {
        let tx = self.db.transaction();

        let task = get_task_tx(&tx, task_id)?;
        policy::check_task_edit(caller, task.created_by)?;

        tx.delete(make_data_value_key(NAMESPACE, task_id))?;
        tx.commit()?;
        Ok(task)
    }

    pub fn mark_finished(&self, account_id: u64, task_id: u64) -> Result<Task> {
        let tx = self.db.transaction();

        let mut task = get_task_tx(&tx, task_id)?;
        let collaborators = project_collaborators_tx(&tx, &task)?;
        policy::check_task_finish(account_id, task.created_by, collaborators.as_deref())?;

        task.status = TASK_STATUS_FINISHED.to_string();
        task.updated_at = Some(Utc::now());

        let data = serialize(&task)?;
        tx.put(make_data_value_key(NAMESPACE, task_id), &data)?;

        tx.commit()?;
        Ok(task)
    }

    pub fn set_status(&self, account_id: u64, task_id: u64, status: String) -> Result<Task> {
        let tx = self.db.transaction();

        let mut task = get_task_tx(&tx, task_id)?;
        let collaborators = project_collaborators_tx(&tx, &task)?;
        policy::check_task_status_change(account_id, task.created_by, collaborators.as_deref())?;

        task.status = status;
        task.updated_at = Some(Utc::now());

        let data = serialize(&task)?;
        tx.put(make_data_value_key(NAMESPACE, task_id), &data)?;

        tx.commit()?;
        Ok(task)
    }

    pub(crate) fn delete_by_project_tx(
        &self,
        tx: &Transaction<TransactionDB>,
        project_id: u64,
    ) -> Result<()> {
        let prefix = make_data_key(NAMESPACE);

        let mut keys = Vec::new();
        for kv in tx.iterator(IteratorMode::From(prefix.as_slice(), Direction::Forward)) {
            let (key, value) = kv?;
            if !key.starts_with(prefix.as_slice()) {
                break;
            }
            let task: Task = deserialize(&value)?;
            if task.project_id == Some(project_id) {
                keys.push(key);
            }
        }
        for key in keys {
            tx.delete(key)?;
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
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

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateTaskRequest {
    pub created_by: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateTaskRequest {
    pub title: OptionalProperty<String>,
    pub description: OptionalProperty<Option<String>>,
    pub status: OptionalProperty<String>,
    pub project_id: OptionalProperty<u64>,
}
