pub mod backend;
pub mod connection;
pub mod entities;
pub mod repository;
pub mod seed;

#[cfg(test)]
mod backend_tests;

pub use backend::SeaOrmBackend;
pub use connection::{connect, run_migrations};
pub use repository::{
    CharacterInput, CharacterRepository, SettingInput, SettingRepository, UserRepository,
};
pub use seed::seed_defaults;
