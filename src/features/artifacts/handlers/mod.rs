mod artifact_handler;

pub use artifact_handler::*;
