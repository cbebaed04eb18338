//! User management logic

pub mod controller;
pub mod fallback;
pub mod form;
pub mod list;

pub use controller::*;
pub use form::*;
pub use list::*;
