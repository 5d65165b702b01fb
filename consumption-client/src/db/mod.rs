pub mod energy_consumption_queries;

pub use energy_consumption_queries::{EnergyConsumptionDocument, COLLECTION_NAME};
