//! akhra-core
//!
//! Business logic and services for Akhra Books.
//! Depends on akhra-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod account_service;
pub mod balance_service;
pub mod error;
pub mod event_service;
pub mod fee_service;
pub mod journal_service;
pub mod medicaid_service;
pub mod member_service;
pub mod report_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod unit_of_work;
pub mod validation;
pub mod voucher_service;

pub use account_service::*;
pub use balance_service::*;
pub use error::CoreError;
pub use event_service::*;
pub use fee_service::*;
pub use journal_service::*;
pub use medicaid_service::*;
pub use member_service::*;
pub use report_service::*;
pub use summary_service::*;
pub use unit_of_work::UnitOfWork;
pub use voucher_service::*;
