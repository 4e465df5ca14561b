//! Content inspection and artifact naming.

pub mod resolve;
pub mod sniff;

pub use resolve::{classify, resolve, Action, ResolvedArtifact};
pub use sniff::{sniff, sniff_bytes};
