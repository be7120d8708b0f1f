//! Contract manifest model
//!
//! Only the parts of a Neo contract manifest that drive SDK generation are
//! modelled: the contract name and its ABI. Other manifest sections are
//! ignored when deserializing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// ABI parameter and return types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamType {
    Any,
    Boolean,
    InteropInterface,
    Integer,
    ByteArray,
    String,
    Hash160,
    Hash256,
    PublicKey,
    Array,
    Map,
    Void,
}

impl ParamType {
    /// Every variant, in declaration order
    pub const ALL: [ParamType; 12] = [
        ParamType::Any,
        ParamType::Boolean,
        ParamType::InteropInterface,
        ParamType::Integer,
        ParamType::ByteArray,
        ParamType::String,
        ParamType::Hash160,
        ParamType::Hash256,
        ParamType::PublicKey,
        ParamType::Array,
        ParamType::Map,
        ParamType::Void,
    ];

    /// Spelling used in manifests
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Any => "Any",
            ParamType::Boolean => "Boolean",
            ParamType::InteropInterface => "InteropInterface",
            ParamType::Integer => "Integer",
            ParamType::ByteArray => "ByteArray",
            ParamType::String => "String",
            ParamType::Hash160 => "Hash160",
            ParamType::Hash256 => "Hash256",
            ParamType::PublicKey => "PublicKey",
            ParamType::Array => "Array",
            ParamType::Map => "Map",
            ParamType::Void => "Void",
        }
    }

    /// Whether values of this type are server-side iterators
    pub fn is_iterator(&self) -> bool {
        matches!(self, ParamType::InteropInterface)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ParamType::Void)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Any" => Ok(ParamType::Any),
            "Boolean" | "Bool" => Ok(ParamType::Boolean),
            "InteropInterface" => Ok(ParamType::InteropInterface),
            "Integer" => Ok(ParamType::Integer),
            "ByteArray" => Ok(ParamType::ByteArray),
            "String" => Ok(ParamType::String),
            "Hash160" => Ok(ParamType::Hash160),
            "Hash256" => Ok(ParamType::Hash256),
            "PublicKey" => Ok(ParamType::PublicKey),
            "Array" => Ok(ParamType::Array),
            "Map" => Ok(ParamType::Map),
            "Void" => Ok(ParamType::Void),
            other => Err(Error::manifest(format!("unknown parameter type '{}'", other))),
        }
    }
}

impl Serialize for ParamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParamType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Named, typed parameter of a method or event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
}

/// ABI method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "returntype")]
    pub return_type: ParamType,
    #[serde(default)]
    pub safe: bool,
}

impl Method {
    /// Methods starting with `_` are hidden from generated SDKs
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// ABI event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// Contract ABI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abi {
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Contract manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub abi: Abi,
}

impl Manifest {
    /// Parse a manifest from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)
            .map_err(|e| Error::manifest(format!("failed to parse manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from an already decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let manifest: Manifest = serde_json::from_value(value)
            .map_err(|e| Error::manifest(format!("failed to parse manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Structural checks that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::manifest("contract name is empty"));
        }
        if let Some(pos) = self.abi.methods.iter().position(|m| m.name.is_empty()) {
            return Err(Error::manifest(format!("method #{} has an empty name", pos)));
        }
        if let Some(pos) = self.abi.events.iter().position(|e| e.name.is_empty()) {
            return Err(Error::manifest(format!("event #{} has an empty name", pos)));
        }
        Ok(())
    }

    /// Methods that end up in generated SDKs, in manifest order
    pub fn public_methods(&self) -> impl Iterator<Item = &Method> {
        self.abi.methods.iter().filter(|m| !m.is_private())
    }
}
