pub mod cli;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod format;
pub mod gateway;
pub mod resource;
pub mod routes;
pub mod rules;
pub mod session;

pub use config::AppConfig;
pub use error::{CamaraError, Result};
pub use gateway::{Gateway, SqliteGateway};
pub use resource::{Repository, Resource, ResourceKind};
