pub mod admin;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod render;
pub mod table;
