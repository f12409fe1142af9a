pub mod collapsible;
pub mod login;
pub mod lookup;
pub mod toast;
