// Infrastructure layer
pub mod file_system;
pub mod server;

pub use file_system::*;
pub use server::*;
