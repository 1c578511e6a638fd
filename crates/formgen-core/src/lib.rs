//! formgen Core Library
//!
//! Core types, configuration, and error handling for the formgen document
//! template generator.

pub mod config;
pub mod error;
pub mod markup;

pub use config::{Config, WhitespaceSensitivity};
pub use error::{CoreError, Result};
pub use markup::{Element, Node, Style};
