//! Accounts, password login and cookie-backed sessions.
//!
//! Handlers never look at cookies themselves: they take a `Caller` (signed-in
//! only) or `MaybeCaller` (public pages) extractor and use the identity it carries.

pub mod accounts;
pub mod forms;
pub mod handlers;
pub mod password;
pub mod session;

pub use session::{Caller, MaybeCaller};
