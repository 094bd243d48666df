//! Pricing Module
//!
//! Turns a stored rule body and a questionnaire answer set into a
//! preliminary trade-in price.
//!
//! ```text
//! RuleRecord.body ──normalizer──▶ CanonicalComputationModel ──calculator──▶ PriceComputationResult
//!                                          │                      ▲
//!                                          └── predicate ─────────┘
//! ```

mod calculator;
mod engine;
mod error;
pub mod normalizer;
pub mod predicate;

pub use calculator::{compute, numeric_answer};
pub use engine::PricingService;
pub use error::{PricingError, PricingResult};
pub use normalizer::{RuleBody, normalize};
pub use predicate::evaluate;
