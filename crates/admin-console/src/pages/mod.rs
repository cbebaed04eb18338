//! Console Pages

pub mod dashboard;
pub mod user_management;

pub use dashboard::*;
pub use user_management::*;
