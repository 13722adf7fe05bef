pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod master_data;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod state;
pub mod telemetry;
