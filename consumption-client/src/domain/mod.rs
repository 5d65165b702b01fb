mod energy_consumption;

pub use energy_consumption::EnergyConsumption;
