pub mod backend;
pub mod events;
pub mod notify;
pub mod shell;
pub mod store;
pub mod subscribe;
pub mod ui;
