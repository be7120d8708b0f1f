use convert_case::{Case, Casing};
use cpm_core::ParamType;

use super::{Language, TypeMapper};

/// neon-dappkit argument and result types
pub struct TypeScriptMapper;

impl TypeMapper for TypeScriptMapper {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn map_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Any => "any",
            ParamType::Boolean => "boolean",
            ParamType::InteropInterface => "object",
            ParamType::Integer => "number",
            ParamType::ByteArray => "string",
            ParamType::String => "string",
            ParamType::Hash160 => "string",
            ParamType::Hash256 => "string",
            ParamType::PublicKey => "string",
            ParamType::Array => "any[]",
            ParamType::Map => "object",
            ParamType::Void => "void",
        }
    }

    fn map_method_name(&self, name: &str) -> String {
        name.to_case(Case::Camel)
    }
}
