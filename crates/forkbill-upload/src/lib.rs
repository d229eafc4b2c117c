//! Upload controller: the state machine behind the receipt submission flow.
//!
//! Owns payer-name and file-selection state, gates submission on both
//! being present, and orchestrates validate → compress → create.

pub mod controller;
pub mod traits;

pub use controller::{
    ReceiptUploadController, GENERIC_FAILURE_MESSAGE, TOO_LARGE_MESSAGE,
};
pub use traits::ExpenseCreator;
