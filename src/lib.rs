pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod job;
pub mod model;
pub mod routes;
pub mod store;
