pub mod detection;
pub mod history;
pub mod report;
pub mod server;
pub mod utils;
pub mod web;
