pub mod detection;
pub mod io;
pub mod report;
pub mod store;
pub mod system;
pub mod upload;
