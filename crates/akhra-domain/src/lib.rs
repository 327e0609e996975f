//! akhra-domain
//!
//! Pure domain models (Books, LedgerAccount, JournalEntry, CashBookEntry, Voucher, etc.).
//! No I/O, no CLI, no storage. Only data types, core enums, and the generic record table.

pub mod account;
pub mod books;
pub mod cash_book;
pub mod common;
pub mod event;
pub mod journal;
pub mod medicaid;
pub mod member;
pub mod table;
pub mod user;
pub mod voucher;

pub use account::*;
pub use books::*;
pub use cash_book::*;
pub use common::*;
pub use event::*;
pub use journal::*;
pub use medicaid::*;
pub use member::*;
pub use table::Table;
pub use user::*;
pub use voucher::*;
