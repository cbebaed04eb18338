//! Reusable UI Components for the Admin Console

pub mod forms;
pub mod header;
pub mod icons;
pub mod layout;
pub mod modal;
pub mod sidebar;
pub mod spinner;
pub mod table;
pub mod toast;
pub mod user_modal;

pub use forms::*;
pub use header::*;
pub use icons::*;
pub use layout::*;
pub use modal::*;
pub use sidebar::*;
pub use spinner::*;
pub use table::*;
pub use toast::*;
pub use user_modal::*;
