pub mod auth_service;
pub mod navigation;
pub mod trailer_service;
