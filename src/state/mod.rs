pub mod app_settings;
pub mod app_state;
pub mod generation;
pub mod messages;
pub mod network;
pub mod stat_columns;
