pub mod client;
pub mod services;
