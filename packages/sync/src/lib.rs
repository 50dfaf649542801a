// ABOUTME: Keeps the store mirroring the remote dataset: one bulk load at
// ABOUTME: session start, then row-level change events applied as they arrive

pub mod client;
pub mod session;

pub use client::SyncClient;
pub use session::SessionManager;
