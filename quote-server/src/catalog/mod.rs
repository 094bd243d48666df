//! Catalog Module
//!
//! Device types, type alias resolution and versioned pricing rule records.

mod device_types;
mod resolver;
mod rules;

pub use device_types::DeviceTypeCatalog;
pub use resolver::TypeKeyResolver;
pub use rules::RuleCatalog;
