// Application layer - Use cases and repository abstractions
pub mod dashboard_service;
pub mod practice_service;
pub mod record_repository;
pub mod streaming_service;
