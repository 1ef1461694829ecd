//! Storage adapters backing the billing engine's repository ports.

pub mod memory;

pub use memory::{InMemoryClientRepository, InMemoryInvoiceRepository, StaticSettingsProvider};
