//! Route handlers organized by resource

pub mod alerts;
pub mod echo;
pub mod health;
pub mod transactions;
pub mod users;
