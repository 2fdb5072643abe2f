// Core domain layer
pub mod models;
pub mod plugin;
pub mod descriptor;
pub mod integrity;
pub mod manifest;
pub mod html;
pub mod manager;
pub mod interfaces;
pub mod global;

pub use models::*;
pub use plugin::*;
pub use descriptor::*;
pub use integrity::*;
pub use manifest::*;
pub use manager::*;
pub use interfaces::*;
