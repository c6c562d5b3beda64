pub mod auth;
pub mod mapper;
pub mod models;
pub mod params;
pub mod pool;
pub mod transport;
