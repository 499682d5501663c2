pub mod accounts;
pub mod error;
pub mod index;
pub mod metadata;
pub mod projects;
pub mod rocksdb;
pub mod tasks;
pub mod test_util;

use ::rocksdb::Direction;
use ::rocksdb::IteratorMode;
use ::rocksdb::Transaction;
use ::rocksdb::TransactionDB;
use bincode::deserialize;
pub use error::Result;
use serde::de::DeserializeOwned;

pub use crate::metadata::MetadataProvider;
use crate::metadata::ListResponse;
use crate::metadata::ResponseMetadata;

pub fn make_data_key(ns: &[u8]) -> Vec<u8> {
    [ns, b"/data/"].concat()
}

pub fn make_data_value_key(ns: &[u8], id: u64) -> Vec<u8> {
    [ns, b"/data/", id.to_le_bytes().as_ref()].concat()
}

pub fn make_index_key(ns: &[u8], idx_name: &[u8], key: &str) -> Vec<u8> {
    [ns, b"/idx/", idx_name, b"/", key.as_bytes()].concat()
}

pub fn make_id_seq_key(ns: &[u8]) -> Vec<u8> {
    [ns, b"/id_seq"].concat()
}

pub fn list_data<T>(tx: &Transaction<TransactionDB>, ns: &[u8]) -> Result<ListResponse<T>>
where T: DeserializeOwned {
    let prefix = make_data_key(ns);

    let mut data = Vec::new();
    for kv in tx.iterator(IteratorMode::From(prefix.as_slice(), Direction::Forward)) {
        let (key, value) = kv?;
        if !key.starts_with(prefix.as_slice()) {
            break;
        }
        data.push(deserialize(&value)?);
    }

    Ok(ListResponse {
        data,
        meta: ResponseMetadata { next: None },
    })
}
