use std::env::temp_dir;
use std::sync::Arc;

use common::rbac::Role;
use uuid::Uuid;

use crate::accounts::Account;
use crate::accounts::CreateAccountRequest;
use crate::MetadataProvider;

pub fn init_db() -> anyhow::Result<Arc<MetadataProvider>> {
    let mut path = temp_dir();
    path.push(format!("{}.db", Uuid::new_v4()));

    let db = Arc::new(crate::rocksdb::new(path)?);
    Ok(Arc::new(MetadataProvider::try_new(db)?))
}

pub fn create_account(
    md: &Arc<MetadataProvider>,
    username: &str,
    role: Role,
) -> anyhow::Result<Account> {
    let acc = md.accounts.create(CreateAccountRequest {
        created_by: None,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "".to_string(),
        role,
        profile_image: None,
    })?;

    Ok(acc)
}
