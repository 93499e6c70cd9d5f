//=========================================================================
// Assets
//=========================================================================
//
// Asynchronous, path-deduplicated loading of files under an asset root.
//
//=========================================================================

mod error;
mod loader;
mod manager;

pub use error::AssetError;
pub use manager::{
    Asset, AssetFailed, AssetHandle, AssetLoaded, AssetManager, AssetState, LoadCallback,
};
