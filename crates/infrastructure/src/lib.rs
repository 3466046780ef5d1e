//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_access_grant_repository;
mod postgres_access_grant_repository;
mod postgres_auth_event_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_access_grant_repository::InMemoryAccessGrantRepository;
pub use postgres_access_grant_repository::PostgresAccessGrantRepository;
pub use postgres_auth_event_repository::PostgresAuthEventRepository;
pub use postgres_user_repository::PostgresUserRepository;
