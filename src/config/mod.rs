//! Profile configuration: descriptor parsing, profile loading and discovery.
pub mod document;
pub mod env;
pub mod profiles;
pub mod registry;
pub mod storage;

/// Name of the descriptor file inside each profile directory.
pub const DESCRIPTOR_FILE: &str = "profile.json";

/// Contents written to a freshly created descriptor.
pub const EMPTY_DESCRIPTOR: &str = "{\n}\n";
