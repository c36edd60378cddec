pub mod app;
pub mod auth;
pub mod categories;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod expenses;
pub mod extract;
pub mod memory;
pub mod repo;
pub mod state;
pub mod status;
pub mod validation;
