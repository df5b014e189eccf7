//! Core data types: timestamps and public identifiers

pub mod ident;
pub mod temporal;

pub use temporal::*;
