pub mod config;
pub mod history;
pub mod live;
pub mod routes;
pub mod stations;
pub mod trend;
