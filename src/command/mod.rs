//! Chat command parsing and outbound text chunking.

pub mod chunker;
pub mod router;

pub use chunker::split;
pub use router::{Action, CommandRouter, FunCommand, Route};
