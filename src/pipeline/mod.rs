// Ingestion pipeline stages: resolve -> ingestion (fetch) -> normalize -> catalog (upsert)

pub mod catalog;
pub mod ingestion;
pub mod normalize;
pub mod resolve;
