//! Per-language type and method-name mapping
//!
//! Every target language provides a stateless strategy implementing
//! [`TypeMapper`]. The type tables are total over [`ParamType`]; unwrap and
//! wrap tables are optional per language and may have gaps, which renderers
//! handle explicitly.

mod csharp;
mod golang;
mod java;
mod python;
mod typescript;

pub use csharp::CSharpMapper;
pub use golang::{GoOffChainMapper, GoOnChainMapper};
pub use java::{JavaOffChainMapper, JavaOnChainMapper};
pub use python::{PythonOffChainMapper, PythonOnChainMapper};
pub use typescript::TypeScriptMapper;

use cpm_core::{Error, ParamType, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target language of a generated SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "go", alias = "golang")]
    Go,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "csharp")]
    CSharp,
    #[serde(rename = "ts", alias = "typescript")]
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Go,
        Language::Python,
        Language::Java,
        Language::CSharp,
        Language::TypeScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "python",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::TypeScript => "ts",
        }
    }

    /// Mode used when none is requested explicitly
    pub fn default_mode(&self) -> SdkMode {
        match self {
            Language::TypeScript => SdkMode::OffChain,
            _ => SdkMode::OnChain,
        }
    }

    /// Whether a renderer exists for this language and mode
    pub fn supports(&self, mode: SdkMode) -> bool {
        !matches!(
            (self, mode),
            (Language::CSharp, SdkMode::OffChain) | (Language::TypeScript, SdkMode::OnChain)
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "go" | "golang" => Ok(Language::Go),
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "csharp" | "c#" => Ok(Language::CSharp),
            "ts" | "typescript" => Ok(Language::TypeScript),
            other => Err(Error::config(format!("language '{}' is unsupported", other))),
        }
    }
}

/// SDK flavour
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum SdkMode {
    /// Compiled into another contract, calls the target natively
    #[serde(rename = "onchain")]
    #[value(name = "onchain")]
    OnChain,
    /// Runs in an external client and talks to a node
    #[serde(rename = "offchain")]
    #[value(name = "offchain")]
    OffChain,
}

impl SdkMode {
    pub const ALL: [SdkMode; 2] = [SdkMode::OnChain, SdkMode::OffChain];

    pub fn as_str(&self) -> &'static str {
        match self {
            SdkMode::OnChain => "onchain",
            SdkMode::OffChain => "offchain",
        }
    }
}

impl fmt::Display for SdkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SdkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "onchain" | "on-chain" => Ok(SdkMode::OnChain),
            "offchain" | "off-chain" => Ok(SdkMode::OffChain),
            other => Err(Error::config(format!(
                "SDK type '{}' is unsupported, allowed values are onchain, offchain",
                other
            ))),
        }
    }
}

/// Type and naming strategy for one language and mode
pub trait TypeMapper: Send + Sync {
    /// Language this mapper produces code for
    fn language(&self) -> Language;

    /// Language type used for an ABI type
    fn map_type(&self, ty: ParamType) -> &'static str;

    /// Case convention applied to ABI method names
    fn map_method_name(&self, name: &str) -> String;

    /// Expression extracting a typed value from a raw invocation result.
    ///
    /// `None` marks a gap in the language's table.
    fn unwrap_expression(&self, _ty: ParamType) -> Option<&'static str> {
        None
    }

    /// Expression converting an argument into a contract parameter.
    ///
    /// `None` marks a gap in the language's table.
    fn wrap_expression(&self, _ty: ParamType) -> Option<&'static str> {
        None
    }

    /// Type returned to callers, with wrapper substitutions for complex types
    fn return_type(&self, ty: ParamType) -> String {
        self.map_type(ty).to_string()
    }
}

static CSHARP: CSharpMapper = CSharpMapper;
static GO_ON_CHAIN: GoOnChainMapper = GoOnChainMapper;
static GO_OFF_CHAIN: GoOffChainMapper = GoOffChainMapper;
static JAVA_ON_CHAIN: JavaOnChainMapper = JavaOnChainMapper;
static JAVA_OFF_CHAIN: JavaOffChainMapper = JavaOffChainMapper;
static PYTHON_ON_CHAIN: PythonOnChainMapper = PythonOnChainMapper;
static PYTHON_OFF_CHAIN: PythonOffChainMapper = PythonOffChainMapper;
static TYPESCRIPT: TypeScriptMapper = TypeScriptMapper;

/// Select the mapper for a language and mode.
///
/// C# only has an on-chain table and TypeScript only an off-chain one; both
/// languages use their single table for either mode.
pub fn mapper_for(language: Language, mode: SdkMode) -> &'static dyn TypeMapper {
    match (language, mode) {
        (Language::CSharp, _) => &CSHARP,
        (Language::Go, SdkMode::OnChain) => &GO_ON_CHAIN,
        (Language::Go, SdkMode::OffChain) => &GO_OFF_CHAIN,
        (Language::Java, SdkMode::OnChain) => &JAVA_ON_CHAIN,
        (Language::Java, SdkMode::OffChain) => &JAVA_OFF_CHAIN,
        (Language::Python, SdkMode::OnChain) => &PYTHON_ON_CHAIN,
        (Language::Python, SdkMode::OffChain) => &PYTHON_OFF_CHAIN,
        (Language::TypeScript, _) => &TYPESCRIPT,
    }
}

/// Uppercase the first character, leaving the rest untouched
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
