/// Core types for the contract package manager
pub mod error;
pub mod manifest;
pub mod types;

pub use error::{Error, Result};
pub use manifest::{Abi, Event, Manifest, Method, ParamType, Parameter};
pub use types::ScriptHash;
