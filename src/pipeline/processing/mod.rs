// Message processing: field extraction, classification, identity registry, and builders

pub mod builders;
pub mod classify;
pub mod extract;
pub mod registry;

pub use builders::{build_transaction, Ledger};
pub use classify::{classify, MessageKind};
pub use registry::{EntityTable, IdSequence, Registry};
