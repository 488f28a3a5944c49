pub mod bounds;
pub mod config;
pub mod constants;
pub mod geo;
pub mod history;
pub mod map;
pub mod metrics;
pub mod selection;
pub mod viewport;
pub mod zoom;
