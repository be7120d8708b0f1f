use convert_case::{Case, Casing};
use cpm_core::ParamType;

use super::{Language, TypeMapper};

/// neo-go interop types for contracts calling other contracts
pub struct GoOnChainMapper;

impl TypeMapper for GoOnChainMapper {
    fn language(&self) -> Language {
        Language::Go
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any => "any",
            ParamType::Boolean => "bool",
            ParamType::InteropInterface => "any",
            ParamType::Integer => "int",
            ParamType::ByteArray => "[]byte",
            ParamType::String => "string",
            ParamType::Hash160 => "interop.Hash160",
            ParamType::Hash256 => "interop.Hash256",
            ParamType::PublicKey => "interop.PublicKey",
            ParamType::Array => "[]any",
            ParamType::Map => "map[string]any",
            // Void methods are rendered without a result, the type is never emitted
            ParamType::Void => "struct{}",
        }
    }

    fn map_method_name(&self, name: &str) -> String {
        name.to_case(Case::Pascal)
    }
}

/// neo-go RPC client types
pub struct GoOffChainMapper;

impl TypeMapper for GoOffChainMapper {
    fn language(&self) -> Language {
        Language::Go
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any => "any",
            ParamType::Boolean => "bool",
            ParamType::InteropInterface => "any",
            ParamType::Integer => "*big.Int",
            ParamType::ByteArray => "[]byte",
            ParamType::String => "string",
            ParamType::Hash160 => "util.Uint160",
            ParamType::Hash256 => "util.Uint256",
            ParamType::PublicKey => "*keys.PublicKey",
            ParamType::Array => "[]any",
            ParamType::Map => "*stackitem.Map",
            ParamType::Void => "struct{}",
        }
    }

    fn map_method_name(&self, name: &str) -> String {
        name.to_case(Case::Pascal)
    }

    fn unwrap_expression(&self, ty: ParamType) -> Option<&'static str> {
        Some(match ty {
            ParamType::Any => "unwrap.Item",
            ParamType::Boolean => "unwrap.Bool",
            ParamType::InteropInterface => "unwrap.SessionIterator",
            ParamType::Integer => "unwrap.BigInt",
            ParamType::ByteArray => "unwrap.Bytes",
            ParamType::String => "unwrap.UTF8String",
            ParamType::Hash160 => "unwrap.Uint160",
            ParamType::Hash256 => "unwrap.Uint256",
            ParamType::PublicKey => "unwrap.PublicKey",
            ParamType::Array => "unwrap.Array",
            ParamType::Map => "unwrap.Map",
            ParamType::Void => "unwrap.Nothing",
        })
    }

    fn return_type(&self, ty: ParamType) -> String {
        match ty {
            ParamType::Any => "stackitem.Item".to_string(),
            ParamType::Array | ParamType::InteropInterface => "[]stackitem.Item".to_string(),
            other => self.map_type(other).to_string(),
        }
    }
}
