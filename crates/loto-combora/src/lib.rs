//! Core of the Loto Más toolkit.
//!
//! Holds the validated data model, the frequency analyzer, the "Guillotine"
//! combination generator with its rejection filters, the in-memory ledger and
//! the Oracle match detector. Nothing here touches the network or the disk.

pub mod checker;
pub mod frequency;
pub mod generator;
pub mod ledger;
pub mod loto;
pub mod oracle;
