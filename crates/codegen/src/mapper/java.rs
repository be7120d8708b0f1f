use convert_case::{Case, Casing};
use cpm_core::ParamType;

use super::{Language, TypeMapper};

/// neow3j devpack types
pub struct JavaOnChainMapper;

impl TypeMapper for JavaOnChainMapper {
    fn language(&self) -> Language {
        Language::Java
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any => "Object",
            ParamType::Boolean => "boolean",
            ParamType::InteropInterface => "Object",
            ParamType::Integer => "int",
            ParamType::ByteArray => "ByteString",
            ParamType::String => "String",
            ParamType::Hash160 => "Hash160",
            ParamType::Hash256 => "Hash256",
            ParamType::PublicKey => "ECPoint",
            ParamType::Array => "List<Object>",
            ParamType::Map => "Map<Object, Object>",
            ParamType::Void => "void",
        }
    }

    fn map_method_name(&self, name: &str) -> String {
        name.to_case(Case::Camel)
    }
}

/// neow3j SDK types
pub struct JavaOffChainMapper;

impl TypeMapper for JavaOffChainMapper {
    fn language(&self) -> Language {
        Language::Java
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any => "Object",
            ParamType::Boolean => "boolean",
            ParamType::InteropInterface => "List<?>",
            ParamType::Integer => "BigInteger",
            ParamType::ByteArray => "byte[]",
            ParamType::String => "String",
            ParamType::Hash160 => "Hash160",
            ParamType::Hash256 => "Hash256",
            ParamType::PublicKey => "ECKeyPair.ECPublicKey",
            ParamType::Array => "List<?>",
            ParamType::Map => "Map<?, ?>",
            ParamType::Void => "void",
        }
    }

    fn map_method_name(&self, name: &str) -> String {
        name.to_case(Case::Camel)
    }

    // No entry for Void: a void result is never read back.
    fn unwrap_expression(&self, ty: ParamType) -> Option<&'static str> {
        match ty {
            ParamType::Any => Some("response.getInvocationResult().getFirstStackItem().getValue()"),
            ParamType::InteropInterface => Some("response"),
            ParamType::Boolean => Some("response.getInvocationResult().getFirstStackItem().getBoolean()"),
            ParamType::Integer => Some("response.getInvocationResult().getFirstStackItem().getInteger()"),
            ParamType::ByteArray => Some("response.getInvocationResult().getFirstStackItem().getByteArray()"),
            ParamType::String => Some("response.getInvocationResult().getFirstStackItem().getString()"),
            ParamType::Hash160 => {
                Some("Hash160.fromAddress(response.getInvocationResult().getFirstStackItem().getAddress())")
            }
            ParamType::Hash256 => Some(
                "new Hash256(ArrayUtils.reverseArray(response.getInvocationResult().getFirstStackItem().getByteArray()))",
            ),
            ParamType::PublicKey => Some(
                "new ECKeyPair.ECPublicKey(response.getInvocationResult().getFirstStackItem().getHexString())",
            ),
            ParamType::Array => Some("response.getInvocationResult().getFirstStackItem().getList()"),
            ParamType::Map => Some("response.getInvocationResult().getFirstStackItem().getMap()"),
            ParamType::Void => None,
        }
    }

    // No entry for Void: contract parameters are never void.
    fn wrap_expression(&self, ty: ParamType) -> Option<&'static str> {
        match ty {
            ParamType::Any => Some("ContractParameter.mapToContractParameter"),
            ParamType::InteropInterface => Some("ContractParameter.any"),
            ParamType::Boolean => Some("ContractParameter.bool"),
            ParamType::Integer => Some("ContractParameter.integer"),
            ParamType::ByteArray => Some("ContractParameter.byteArray"),
            ParamType::String => Some("ContractParameter.string"),
            ParamType::Hash160 => Some("ContractParameter.hash160"),
            ParamType::Hash256 => Some("ContractParameter.hash256"),
            ParamType::PublicKey => Some("ContractParameter.publicKey"),
            ParamType::Array => Some("ContractParameter.array"),
            ParamType::Map => Some("ContractParameter.map"),
            ParamType::Void => None,
        }
    }

    fn return_type(&self, ty: ParamType) -> String {
        match self.map_type(ty) {
            "List<?>" => "List<StackItem>".to_string(),
            "Map<?, ?>" => "Map<StackItem, StackItem>".to_string(),
            other => other.to_string(),
        }
    }
}
