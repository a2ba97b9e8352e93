//! Utility modules

pub mod fast_time;
pub mod time;
