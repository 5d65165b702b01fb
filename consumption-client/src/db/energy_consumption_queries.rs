use anyhow::Result;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    Collection, Database,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::EnergyConsumption;

/// The single logical collection holding consumption records.
pub const COLLECTION_NAME: &str = "EnergyConsumption";

/// Stored shape of an [`EnergyConsumption`].
///
/// Timestamps are kept as BSON datetimes, so they round to millisecond precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConsumptionDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub timestamp: DateTime,
    pub consumption: f64,
}

impl EnergyConsumptionDocument {
    /// Build the document for `record`, assigning a fresh ObjectId when the caller sent no id.
    pub fn from_record(record: &EnergyConsumption) -> Self {
        let id = match &record.id {
            Some(id) => id.clone(),
            None => ObjectId::new().to_hex(),
        };
        let millis = record.timestamp.unix_timestamp_nanos().div_euclid(1_000_000);

        Self {
            id,
            timestamp: DateTime::from_millis(millis as i64),
            consumption: record.consumption,
        }
    }

    pub fn into_record(self) -> Result<EnergyConsumption> {
        let nanos = i128::from(self.timestamp.timestamp_millis()) * 1_000_000;

        Ok(EnergyConsumption {
            id: Some(self.id),
            timestamp: OffsetDateTime::from_unix_timestamp_nanos(nanos)?,
            consumption: self.consumption,
        })
    }
}

/// Typed handle on the consumption collection of `db`.
pub fn collection(db: &Database) -> Collection<EnergyConsumptionDocument> {
    db.collection(COLLECTION_NAME)
}

/// Insert one record and return the id it was stored under.
pub async fn insert_one(
    collection: &Collection<EnergyConsumptionDocument>,
    record: &EnergyConsumption,
) -> Result<String> {
    let document = EnergyConsumptionDocument::from_record(record);
    collection.insert_one(&document).await?;

    Ok(document.id)
}

/// Fetch every record in the collection, unfiltered and unpaginated.
pub async fn find_all(
    collection: &Collection<EnergyConsumptionDocument>,
) -> Result<Vec<EnergyConsumption>> {
    let documents: Vec<EnergyConsumptionDocument> =
        collection.find(doc! {}).await?.try_collect().await?;

    documents
        .into_iter()
        .map(EnergyConsumptionDocument::into_record)
        .collect()
}
