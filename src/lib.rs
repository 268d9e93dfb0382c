pub mod catalog;
pub mod config;
pub mod day;
pub mod db;
pub mod environment;
pub mod errors;
pub mod iso8601;
pub mod listen;
pub mod notification;
pub mod routes;
pub mod sunlight;
pub mod validation;
pub mod workflow;
