pub mod fallback;
pub mod profile;
