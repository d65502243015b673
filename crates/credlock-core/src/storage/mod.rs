//! Storage collaborators for key and credential persistence
//!
//! The cipher core never touches files itself; these backends implement
//! the text key-value surface it is used against.

mod properties;
mod traits;

pub use properties::PropertiesFile;
pub use traits::KeyValueStore;
