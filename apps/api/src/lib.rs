pub mod applications;
pub mod config;
pub mod db;
pub mod errors;
pub mod extraction;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
