//! Helper functions shared by the index and its front ends

mod date;

pub use date::*;
