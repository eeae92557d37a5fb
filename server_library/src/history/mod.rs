pub mod history_entry;
pub mod history_store;
