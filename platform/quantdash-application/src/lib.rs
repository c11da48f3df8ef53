pub mod chart;
pub mod config;
pub mod dashboard;
pub mod formatting;
pub mod loading;
pub mod series;
