//! IFRS 16 lessee accounting.
//!
//! Stages run in order: `normalize` (raw record to `LeaseTerms`), `payments`,
//! `measurement`, `amortization`, `depreciation`, `journal`, `disclosure`
//! and `summary`. `engine` wires them together.

pub mod amortization;
pub mod depreciation;
pub mod disclosure;
pub mod engine;
pub mod escalation;
pub mod journal;
pub mod measurement;
pub mod normalize;
pub mod payments;
pub mod summary;
pub mod terms;

#[cfg(feature = "portfolio")]
pub mod portfolio;

pub use engine::{
    calculate_lease, calculate_lease_record, calculate_lease_with_metadata, CalculationOptions,
    CalculationResult,
};
pub use escalation::EscalationPolicy;
pub use normalize::{normalize_lease_record, RawLeaseRecord, RawValue};
pub use terms::{LeaseTerms, PaymentFrequency, PaymentTiming};

#[cfg(feature = "portfolio")]
pub use portfolio::{aggregate_portfolio, PortfolioDisclosure};
