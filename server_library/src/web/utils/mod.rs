pub mod error_handler;
pub mod response;
pub mod upload;
