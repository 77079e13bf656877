pub mod defs;
pub mod error;
