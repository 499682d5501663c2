use std::path::Path;

use rocksdb::ColumnFamilyDescriptor;
use rocksdb::Options;
use rocksdb::TransactionDB;
use rocksdb::TransactionDBOptions;

use crate::Result;

const CF_METADATA: &str = "metadata";

pub fn new<P: AsRef<Path>>(path: P) -> Result<TransactionDB> {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);

    let txopts = TransactionDBOptions::default();
    let cfs = vec![ColumnFamilyDescriptor::new(CF_METADATA, opts.clone())];

    Ok(TransactionDB::open_cf_descriptors(&opts, &txopts, path, cfs)?)
}
