//! HTTP route handlers

pub mod blinks;
pub mod frames;
pub mod health;
pub mod message;
pub mod stats;
