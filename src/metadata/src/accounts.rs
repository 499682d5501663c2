use std::sync::Arc;

use bincode::deserialize;
use bincode::serialize;
use chrono::DateTime;
use chrono::Utc;
use common::rbac::Role;
use common::types::OptionalProperty;
use rocksdb::Transaction;
use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::error::MetadataError;
use crate::index::check_insert_constraints;
use crate::index::check_update_constraints;
use crate::index::delete_index;
use crate::index::get_index;
use crate::index::insert_index;
use crate::index::next_seq;
use crate::index::update_index;
use crate::list_data;
use crate::make_data_value_key;
use crate::make_id_seq_key;
use crate::make_index_key;
use crate::metadata::ListResponse;
use crate::Result;

const NAMESPACE: &[u8] = b"accounts";
const IDX_USERNAME: &[u8] = b"username";
const IDX_EMAIL: &[u8] = b"email";
const IDX_RESET_TOKEN: &[u8] = b"reset_token";

fn index_keys(username: &str, email: &str) -> Vec<Option<Vec<u8>>> {
    [index_username_key(username), index_email_key(email)].to_vec()
}

fn index_username_key(username: &str) -> Option<Vec<u8>> {
    Some(make_index_key(NAMESPACE, IDX_USERNAME, username).to_vec())
}

fn index_email_key(email: &str) -> Option<Vec<u8>> {
    Some(make_index_key(NAMESPACE, IDX_EMAIL, email).to_vec())
}

fn index_reset_token_key(token: &str) -> Option<Vec<u8>> {
    Some(make_index_key(NAMESPACE, IDX_RESET_TOKEN, token).to_vec())
}

pub struct Accounts {
    db: Arc<TransactionDB>,
}

impl Accounts {
    pub fn new(db: Arc<TransactionDB>) -> Self {
        Accounts { db }
    }

    pub(crate) fn get_by_id_tx(&self, tx: &Transaction<TransactionDB>, id: u64) -> Result<Account> {
        let key = make_data_value_key(NAMESPACE, id);
        match tx.get(key)? {
            None => Err(MetadataError::NotFound(format!("account {id} not found"))),
            Some(value) => Ok(deserialize(&value)?),
        }
    }

    pub fn create(&self, req: CreateAccountRequest) -> Result<Account> {
        let idx_keys = index_keys(&req.username, &req.email);

        let tx = self.db.transaction();
        check_insert_constraints(&tx, idx_keys.as_ref())?;
        let created_at = Utc::now();
        let id = next_seq(&tx, make_id_seq_key(NAMESPACE))?;

        let account = Account {
            id,
            created_at,
            updated_at: None,
            created_by: req.created_by,
            updated_by: None,
            username: req.username,
            email: req.email,
            password_hash: req.password_hash,
            role: req.role,
            profile_image: req.profile_image,
            reset_token: None,
            reset_token_expires: None,
        };

        let data = serialize(&account)?;
        tx.put(make_data_value_key(NAMESPACE, account.id), &data)?;

        insert_index(&tx, idx_keys.as_ref(), account.id)?;
        tx.commit()?;
        Ok(account)
    }

    pub fn get_by_id(&self, id: u64) -> Result<Account> {
        let tx = self.db.transaction();
        self.get_by_id_tx(&tx, id)
    }

    pub fn get_by_username(&self, username: &str) -> Result<Account> {
        let tx = self.db.transaction();
        let id = get_index(
            &tx,
            make_index_key(NAMESPACE, IDX_USERNAME, username),
            format!("account with username {username:?} not found"),
        )?;
        self.get_by_id_tx(&tx, id)
    }

    pub fn get_by_email(&self, email: &str) -> Result<Account> {
        let tx = self.db.transaction();
        let id = get_index(
            &tx,
            make_index_key(NAMESPACE, IDX_EMAIL, email),
            format!("account with email {email:?} not found"),
        )?;
        self.get_by_id_tx(&tx, id)
    }

    pub fn get_by_reset_token(&self, token: &str) -> Result<Account> {
        let tx = self.db.transaction();
        let id = get_index(
            &tx,
            make_index_key(NAMESPACE, IDX_RESET_TOKEN, token),
            "invalid reset token".to_string(),
        )?;
        self.get_by_id_tx(&tx, id)
    }

    pub fn list(&self) -> Result<ListResponse<Account>> {
        let tx = self.db.transaction();
        list_data(&tx, NAMESPACE)
    }

    pub fn list_by_role(&self, role: Role) -> Result<ListResponse<Account>> {
        let mut resp = self.list()?;
        resp.data.retain(|acc: &Account| acc.role == role);
        Ok(resp)
    }

    pub fn update(&self, account_id: u64, req: UpdateAccountRequest) -> Result<Account> {
        let tx = self.db.transaction();

        let prev_account = self.get_by_id_tx(&tx, account_id)?;
        let mut account = prev_account.clone();

        let mut idx_keys: Vec<Option<Vec<u8>>> = Vec::new();
        let mut idx_prev_keys: Vec<Option<Vec<u8>>> = Vec::new();
        if let OptionalProperty::Some(username) = &req.username {
            idx_keys.push(index_username_key(username.as_str()));
            idx_prev_keys.push(index_username_key(prev_account.username.as_str()));
            account.username = username.to_owned();
        }
        if let OptionalProperty::Some(email) = &req.email {
            idx_keys.push(index_email_key(email.as_str()));
            idx_prev_keys.push(index_email_key(prev_account.email.as_str()));
            account.email = email.to_owned();
        }
        if let OptionalProperty::Some(reset_token) = &req.reset_token {
            idx_keys.push(reset_token.as_deref().and_then(index_reset_token_key));
            idx_prev_keys.push(
                prev_account
                    .reset_token
                    .as_deref()
                    .and_then(index_reset_token_key),
            );
            account.reset_token = reset_token.to_owned();
        }

        check_update_constraints(&tx, idx_keys.as_ref(), idx_prev_keys.as_ref())?;

        account.updated_at = Some(Utc::now());
        account.updated_by = Some(req.updated_by);
        if let OptionalProperty::Some(password_hash) = req.password_hash {
            account.password_hash = password_hash;
        }
        if let OptionalProperty::Some(role) = req.role {
            account.role = role;
        }
        if let OptionalProperty::Some(profile_image) = req.profile_image {
            account.profile_image = profile_image;
        }
        if let OptionalProperty::Some(reset_token_expires) = req.reset_token_expires {
            account.reset_token_expires = reset_token_expires;
        }

        let data = serialize(&account)?;
        tx.put(make_data_value_key(NAMESPACE, account_id), &data)?;

        update_index(&tx, idx_keys.as_ref(), idx_prev_keys.as_ref(), account_id)?;
        tx.commit()?;
        Ok(account)
    }

    pub fn delete(&self, id: u64) -> Result<Account> {
        let tx = self.db.transaction();

        let account = self.get_by_id_tx(&tx, id)?;
        tx.delete(make_data_value_key(NAMESPACE, id))?;

        let mut idx_keys = index_keys(&account.username, &account.email);
        if let Some(token) = &account.reset_token {
            idx_keys.push(index_reset_token_key(token));
        }
        delete_index(&tx, idx_keys.as_ref())?;
        tx.commit()?;
        Ok(account)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<u64>,
    pub updated_by: Option<u64>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateAccountRequest {
    pub created_by: Option<u64>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateAccountRequest {
    pub updated_by: u64,
    pub username: OptionalProperty<String>,
    pub email: OptionalProperty<String>,
    pub password_hash: OptionalProperty<String>,
    pub role: OptionalProperty<Role>,
    pub profile_image: OptionalProperty<Option<String>>,
    pub reset_token: OptionalProperty<Option<String>>,
    pub reset_token_expires: OptionalProperty<Option<DateTime<Utc>>>,
}
