pub mod remover;

pub use remover::{DeletionError, DeletionOutcome, Removal, Remover};
