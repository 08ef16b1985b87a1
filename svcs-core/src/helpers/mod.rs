//! Low-level helper utilities.

pub mod copy;
pub mod history;
pub mod id;
pub mod layout;
pub mod lock;
