// ABOUTME: Milemap authentication seam: session types, provider trait, auth events
// ABOUTME: Ships an in-memory provider for tests; the REST adapter lives in milemap-cloud

pub mod error;
pub mod memory;
pub mod provider;
pub mod types;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use memory::MemoryAuth;
pub use provider::AuthProvider;
pub use types::{AuthEvent, AuthUser, Session};
