//! # IO Module
//!
//! Adapters between the outside world and the domain layer:
//!
//! - **rest**: Axum handlers that route user actions to the ledger and turn
//!   every outcome into a status message
//! - **emailjs**: the EmailJS implementation of the receipt sender

pub mod emailjs;
pub mod rest;
