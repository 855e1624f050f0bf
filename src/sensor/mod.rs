pub mod entity;
pub mod traits;
pub mod host;
pub mod source;
