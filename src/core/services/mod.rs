pub mod data_service;
pub mod search_service;
pub mod track_service;
pub mod traits;
pub mod types;
