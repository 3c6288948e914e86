//! Format registry: which categories exist and which MIME types and
//! extensions belong to each of them.

mod registry;
mod types;

pub use registry::{normalize_format, FormatRegistry};
pub use types::{FormatEntry, MediaCategory, TargetFormat};
