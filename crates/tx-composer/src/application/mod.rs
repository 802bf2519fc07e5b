//! # Application Module
//!
//! The message list, the assembler and the service that drives them.

pub mod assembler;
pub mod controller;
pub mod service;

pub use assembler::{apply_chain_transform, build};
pub use controller::{MessageListController, MessageSlot};
pub use service::{ComposerPorts, ComposerService};
