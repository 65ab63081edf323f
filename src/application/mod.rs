// Application layer - Use cases and the ports they depend on
pub mod catalog_service;
pub mod chart_editor;
pub mod config_repository;
pub mod config_store;
pub mod dashboard_service;
pub mod entity_repository;
