// counters.rs - monotonically increasing sequences used for public identifiers

use crate::error::DbError;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Client, Collection,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterModel {
    #[serde(rename = "_id")]
    pub name: String,
    pub seq: i64,
}

// Atomically bumps the named counter, creating it on first use
pub async fn next_sequence(client: &Client, database: &str, name: &str) -> Result<i64, DbError> {
    let collection: Collection<CounterModel> = client.database(database).collection("counters");

    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    let result = collection
        .find_one_and_update(doc! { "_id": name }, doc! { "$inc": { "seq": 1_i64 } }, options)
        .await?;

    match result {
        Some(counter) => Ok(counter.seq),
        None => Err(DbError::Counter(name.to_string())),
    }
}
