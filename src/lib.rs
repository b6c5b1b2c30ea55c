pub mod ai;
pub mod app;
pub mod chart;
pub mod city;
pub mod clock;
pub mod config;
pub mod current;
pub mod errors;
pub mod forecast;
pub mod handlers;
pub mod hourly;
pub mod modal;
pub mod models;
pub mod notify;
pub mod schedule;
pub mod settings;
pub mod state;
pub mod ui;
pub mod view;
pub mod weekly_view;

pub use app::router;
pub use config::Config;
pub use state::{AppState, Dashboard};
