//! caracal-tools: the built-in tool catalogue and the per-format output
//! normalizers. Each wrapped tool is a black box; this crate only knows
//! how to invoke it and how to read what it prints.

pub mod catalog;
pub mod normalize;

pub use catalog::catalog;
pub use normalize::normalize_result;
