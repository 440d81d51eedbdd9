//! Derived per-row fields: measurement presence, ignition state and data-quality flags.
//!
//! Which of these a pass computes is declared by a `DerivationProfile`, so the
//! live-feed and measurement-sheet variants share one implementation.

mod derive;
mod flags;
mod profile;

pub use derive::{derive, ignition_status, measurement_status, DerivedStatus, RowError};
pub use flags::{QualityCheck, StatusFlag};
pub use profile::{DerivationProfile, PrimaryReading};
