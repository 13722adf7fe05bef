pub mod analytics;
pub mod calendar;
pub mod generator;
pub mod loader;
