// ABOUTME: REST adapters binding Milemap's storage and auth seams to the hosted backend
// ABOUTME: RestRemote speaks PostgREST, RestAuth speaks the identity service, config comes from env

pub mod auth;
pub mod config;
pub mod remote;

pub use auth::RestAuth;
pub use config::{CloudConfig, ConfigError, ConfigResult};
pub use remote::RestRemote;
