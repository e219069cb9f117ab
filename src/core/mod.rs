// Core modules implementing the document model and error modeling.
pub mod config;
pub mod error;
