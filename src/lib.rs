pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod router;
pub mod schemas;
pub mod services;
pub mod state;

#[cfg(test)]
mod testing;
