//! Static reference data compiled into the binary.

pub mod headers;
pub mod species;

pub use headers::HeaderTag;
pub use species::Species;
