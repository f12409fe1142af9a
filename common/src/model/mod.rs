pub mod auth;
pub mod base;
pub mod page;
pub mod product;
