use convert_case::{Case, Casing};
use cpm_core::ParamType;

use super::{Language, TypeMapper};

/// neo3-boa types
pub struct PythonOnChainMapper;

impl TypeMapper for PythonOnChainMapper {
    fn language(&self) -> Language {
        Language::Python
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any | ParamType::InteropInterface => "Any",
            ParamType::Boolean => "bool",
            ParamType::Integer => "int",
            ParamType::ByteArray => "bytes",
            ParamType::String => "str",
            ParamType::Hash160 => "UInt160",
            ParamType::Hash256 => "UInt256",
            ParamType::PublicKey => "ECPoint",
            ParamType::Array => "list",
            ParamType::Map => "dict",
            ParamType::Void => "None",
        }
    }

    // boa3 stubs must keep the ABI method names
    fn map_method_name(&self, name: &str) -> String {
        name.to_string()
    }
}

/// neo-mamba types
pub struct PythonOffChainMapper;

impl TypeMapper for PythonOffChainMapper {
    fn language(&self) -> Language {
        Language::Python
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any | ParamType::InteropInterface => "noderpc.ContractParameter",
            ParamType::Boolean => "bool",
            ParamType::Integer => "int | types.BigInteger",
            ParamType::ByteArray => "bytes | serialization.ISerializable",
            ParamType::String => "str",
            ParamType::Hash160 => "types.UInt160 | NeoAddress",
            ParamType::Hash256 => "types.UInt256",
            ParamType::PublicKey => "cryptography.ECPoint",
            ParamType::Array => "list",
            ParamType::Map => "dict",
            ParamType::Void => "None",
        }
    }

    fn map_method_name(&self, name: &str) -> String {
        name.to_case(Case::Snake)
    }

    fn unwrap_expression(&self, ty: ParamType) -> Option<&'static str> {
        Some(match ty {
            ParamType::Any => "unwrap.item",
            ParamType::InteropInterface => "unwrap.as_list",
            ParamType::Boolean => "unwrap.as_bool",
            ParamType::Integer => "unwrap.as_int",
            ParamType::ByteArray => "unwrap.as_bytes",
            ParamType::String => "unwrap.as_str",
            ParamType::Hash160 => "unwrap.as_uint160",
            ParamType::Hash256 => "unwrap.as_uint256",
            ParamType::PublicKey => "unwrap.as_public_key",
            ParamType::Array => "unwrap.as_list",
            ParamType::Map => "unwrap.as_dict",
            ParamType::Void => "unwrap.as_none",
        })
    }

    fn return_type(&self, ty: ParamType) -> String {
        match ty {
            ParamType::InteropInterface => "list".to_string(),
            other => self.map_type(other).to_string(),
        }
    }
}
