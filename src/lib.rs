// assettube - build descriptors, asset fingerprinting, manifests and serving

pub mod utils;
pub mod core;
pub mod infrastructure;
pub mod cli;

pub use crate::core::{AssetManager, BuildConfig, HashType, Manifest, ManagerConfig, Matcher};
pub use crate::utils::{AssetError, Result};
