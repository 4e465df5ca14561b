//! Archive extraction functionality.
//!
//! Only single-member zip archives are handled; see [`expand`].

pub mod zip;

pub use self::zip::{expand, extract_first, EXTRACTED_EXTENSION};
