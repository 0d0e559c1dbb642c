//! Real-data transform metadata.

pub mod hc2c;

pub use self::hc2c::{Hc2cCandidate, Hc2cGenus, RdftKind, HC2CB_GENUS, HC2CF_GENUS};
