mod download_handler;

pub use download_handler::*;
