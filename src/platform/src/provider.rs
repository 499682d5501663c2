use std::sync::Arc;

use metadata::MetadataProvider;

use crate::accounts::Accounts;
use crate::auth;
use crate::auth::Auth;
use crate::projects::Projects;
use crate::tasks::Tasks;

pub struct PlatformProvider {
    pub auth: Arc<Auth>,
    pub accounts: Arc<Accounts>,
    pub projects: Arc<Projects>,
    pub tasks: Arc<Tasks>,
}

impl PlatformProvider {
    pub fn new(md: &Arc<MetadataProvider>, auth_cfg: auth::Config) -> Self {
        Self {
            auth: Arc::new(Auth::new(md.accounts.clone(), auth_cfg)),
            accounts: Arc::new(Accounts::new(md.accounts.clone())),
            projects: Arc::new(Projects::new(md.projects.clone())),
            tasks: Arc::new(Tasks::new(md.tasks.clone(), md.projects.clone())),
        }
    }
}
