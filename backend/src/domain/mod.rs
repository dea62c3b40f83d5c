//! # Domain Module
//!
//! Business logic for the weekly payments ledger, independent of HTTP and of
//! the storage backend.
//!
//! ## Module Organization
//!
//! - **record_store**: the ordered collection of child records and every
//!   mutation on it
//! - **csv_codec**: bulk import/export in CSV form
//! - **receipt_dispatcher**: sequential email receipt batches
//! - **settings_service**: email provider settings
//! - **status**: transient status messages
//! - **commands**: inputs to the record store
//!
//! ## Business Rules
//!
//! - Name and parent email are required; amount falls back to 0
//! - Marking a record paid stamps today's date, and any paid change makes a
//!   new receipt due
//! - Receipts go to every record not yet sent, paid or unpaid
//! - Storage failures never discard in-memory changes

pub mod commands;
pub mod csv_codec;
pub mod date_utils;
pub mod errors;
pub mod receipt_dispatcher;
pub mod record_store;
pub mod settings_service;
pub mod status;

pub use commands::{AddChildCommand, ChildPatch};
pub use errors::{LedgerError, SendError};
pub use receipt_dispatcher::{DispatchSummary, ReceiptDispatcher, ReceiptParams, ReceiptSender};
pub use record_store::RecordStore;
pub use settings_service::SettingsService;
pub use status::StatusBoard;
