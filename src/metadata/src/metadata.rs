use std::sync::Arc;

use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::accounts::Accounts;
use crate::projects::Projects;
use crate::tasks::Tasks;
use crate::Result;

pub struct MetadataProvider {
    pub accounts: Arc<Accounts>,
    pub projects: Arc<Projects>,
    pub tasks: Arc<Tasks>,
}

impl MetadataProvider {
    pub fn try_new(db: Arc<TransactionDB>) -> Result<Self> {
        let accounts = Arc::new(Accounts::new(db.clone()));
        let tasks = Arc::new(Tasks::new(db.clone()));
        let projects = Arc::new(Projects::new(db, accounts.clone(), tasks.clone()));

        Ok(MetadataProvider {
            accounts,
            projects,
            tasks,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResponseMetadata {
    pub next: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMetadata,
}
