//! Static analysis of submitted source text
//!
//! Only heuristics live here. The analysis module does NOT:
//! - Parse or compile code
//! - Execute anything
//! - Depend on the selected language

pub mod complexity;

pub use complexity::{estimate, ComplexityEstimate};
