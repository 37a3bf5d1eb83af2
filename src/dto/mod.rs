pub mod auth;
pub mod cart;
pub mod foods;
pub mod orders;
