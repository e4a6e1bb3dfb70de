//! Command execution on top of the router, room state and task manager.

pub mod dispatcher;
pub mod fun;
pub mod help;

pub use dispatcher::Bot;
