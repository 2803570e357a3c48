//! Probe inputs and detection signatures shared by every probe family

pub mod catalog;
pub mod signatures;

pub use catalog::PayloadClass;
pub use signatures::{Signatures, VersionMatch};
