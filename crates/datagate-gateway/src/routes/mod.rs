//! Route modules.

pub mod data;
pub mod health;
