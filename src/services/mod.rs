pub mod maintenance_api;
pub mod fixture;
