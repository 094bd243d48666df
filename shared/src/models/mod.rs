//! Domain models shared by quote-server and its clients

pub mod answers;
pub mod device_type;
pub mod predicate;
pub mod pricing_rule;
pub mod quote;

pub use answers::AnswerSet;
pub use device_type::{AliasSet, DeviceType, DeviceTypeCreate};
pub use predicate::{MAX_PREDICATE_DEPTH, Predicate};
pub use pricing_rule::{
    Adjustment, CanonicalComputationModel, KIND_PRICING, RuleActivated, RuleCreate, RuleCreated,
    RuleFilter, RuleRecord,
};
pub use quote::{
    ActiveLookup, PriceComputationResult, PriceRequest, RecomputeRequest, RecordLookup,
    RuleLookup,
};
