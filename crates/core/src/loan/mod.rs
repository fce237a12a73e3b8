//! Employee loans and payments against a work period.
//!
//! A loan is an advance disbursed against a temporary work period. Its
//! remaining balance is only ever reduced by immutable payment records;
//! corrections are new payments or loan deletion, never edits.

pub mod error;
pub mod service;
pub mod types;

pub use error::LoanError;
pub use service::{LoanService, PaymentApplication};
pub use types::{Loan, LoanPayment, LoanStatus, PaymentType};
