// database/applicants/query.rs - queries for the applicants collection

use super::model::{ApplicantModel, ApplicantUpdate, NewApplicant, PaymentStatus};
use crate::counters::next_sequence;
use crate::error::DbError;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Client, Collection};

fn collection(client: &Client, database: &str) -> Collection<ApplicantModel> {
    client.database(database).collection("applicants")
}

pub async fn insert_applicant(
    client: &Client,
    database: &str,
    applicant: NewApplicant,
) -> Result<ApplicantModel, DbError> {
    let id = next_sequence(client, database, "applicants").await?;
    let model = applicant.into_model(id);

    collection(client, database).insert_one(&model, None).await?;

    Ok(model)
}

pub async fn get_applicant(
    client: &Client,
    database: &str,
    id: i64,
) -> Result<Option<ApplicantModel>, DbError> {
    let result = collection(client, database)
        .find_one(doc! { "id": id }, None)
        .await?;

    Ok(result)
}

// Newest first
pub async fn list_applicants(client: &Client, database: &str) -> Result<Vec<ApplicantModel>, DbError> {
    let options = FindOptions::builder().sort(doc! { "id": -1 }).build();

    let cursor = collection(client, database).find(None, options).await?;
    let applicants: Vec<ApplicantModel> = cursor.try_collect().await?;

    Ok(applicants)
}

pub async fn update_payment_status(
    client: &Client,
    database: &str,
    id: i64,
    status: PaymentStatus,
) -> Result<bool, DbError> {
    let result = collection(client, database)
        .update_one(
            doc! { "id": id },
            doc! { "$set": { "payment_status": status.as_str() } },
            None,
        )
        .await?;

    Ok(result.matched_count > 0)
}

pub async fn update_applicant(
    client: &Client,
    database: &str,
    id: i64,
    update: &ApplicantUpdate,
) -> Result<bool, DbError> {
    let result = collection(client, database)
        .update_one(
            doc! { "id": id },
            doc! { "$set": {
                "name": update.name.as_str(),
                "phone": update.phone.as_str(),
                "email": update.email.as_str(),
                "apply_for": update.apply_for.as_str(),
                "selected_subject": update.effective_subject(),
                "last_degree": update.last_degree.as_str(),
            } },
            None,
        )
        .await?;

    Ok(result.matched_count > 0)
}

pub async fn delete_applicant(client: &Client, database: &str, id: i64) -> Result<bool, DbError> {
    let result = collection(client, database)
        .delete_one(doc! { "id": id }, None)
        .await?;

    Ok(result.deleted_count > 0)
}
