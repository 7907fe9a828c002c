// database/tokens/query.rs - queries for the tokens collection

use super::model::{AuthToken, TokenModel, CURRENT_TOKEN_KEY};
use crate::error::DbError;
use mongodb::{bson::doc, options::ReplaceOptions, Client, Collection};

fn collection(client: &Client, database: &str) -> Collection<TokenModel> {
    client.database(database).collection("tokens")
}

pub async fn get_token(client: &Client, database: &str) -> Result<Option<AuthToken>, DbError> {
    let result = collection(client, database)
        .find_one(doc! { "_id": CURRENT_TOKEN_KEY }, None)
        .await?;

    match result {
        Some(model) => Ok(Some(AuthToken::try_from(model)?)),
        None => Ok(None),
    }
}

// Replaces the whole record so a refresh never leaves a half-written token behind
pub async fn upsert_token(client: &Client, database: &str, token: &AuthToken) -> Result<(), DbError> {
    let options = ReplaceOptions::builder().upsert(true).build();

    collection(client, database)
        .replace_one(
            doc! { "_id": CURRENT_TOKEN_KEY },
            TokenModel::from(token),
            options,
        )
        .await?;

    Ok(())
}
