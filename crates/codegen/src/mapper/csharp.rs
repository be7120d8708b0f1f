use convert_case::{Case, Casing};
use cpm_core::ParamType;

use super::{Language, TypeMapper};

/// Neo C# devpack types
pub struct CSharpMapper;

impl TypeMapper for CSharpMapper {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any => "object",
            ParamType::Boolean => "bool",
            ParamType::InteropInterface => "object",
            ParamType::Integer => "BigInteger",
            ParamType::ByteArray => "byte[]",
            ParamType::String => "string",
            ParamType::Hash160 => "UInt160",
            ParamType::Hash256 => "UInt256",
            ParamType::PublicKey => "ECPoint",
            ParamType::Array => "object[]",
            ParamType::Map => "Map<object, object>",
            ParamType::Void => "void",
        }
    }

    fn map_method_name(&self, name: &str) -> String {
        name.to_case(Case::Pascal)
    }
}
