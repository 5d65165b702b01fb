use consumption_client::{
    db::{energy_consumption_queries as queries, EnergyConsumptionDocument},
    domain::EnergyConsumption,
};
use mongodb::{Client, Collection};

use crate::{
    config::{redact_credentials, MongoDbConfig},
    error::ServiceError,
};

/// Source of truth for consumption records.
#[async_trait::async_trait]
pub trait ConsumptionStore: Send + Sync {
    /// Persist `record` and return the id it was stored under.
    async fn insert_one(&self, record: &EnergyConsumption) -> Result<String, ServiceError>;

    async fn find_all(&self) -> Result<Vec<EnergyConsumption>, ServiceError>;
}

pub struct MongoConsumptionStore {
    collection: Collection<EnergyConsumptionDocument>,
}

impl MongoConsumptionStore {
    pub async fn connect(cfg: &MongoDbConfig) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&cfg.connection_string).await?;
        let db = client.database(&cfg.database_name);

        tracing::info!(
            uri = %redact_credentials(&cfg.connection_string),
            database = %cfg.database_name,
            collection = queries::COLLECTION_NAME,
            "document store client ready"
        );

        Ok(Self {
            collection: queries::collection(&db),
        })
    }
}

#[async_trait::async_trait]
impl ConsumptionStore for MongoConsumptionStore {
    async fn insert_one(&self, record: &EnergyConsumption) -> Result<String, ServiceError> {
        queries::insert_one(&self.collection, record)
            .await
            .map_err(|e| ServiceError::Store(format!("{e:#}")))
    }

    async fn find_all(&self) -> Result<Vec<EnergyConsumption>, ServiceError> {
        queries::find_all(&self.collection)
            .await
            .map_err(|e| ServiceError::Store(format!("{e:#}")))
    }
}
