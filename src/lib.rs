pub mod api;
pub mod config;
pub mod db;
pub mod identity; // read-time patient de-duplication
pub mod models;
pub mod uploads;
