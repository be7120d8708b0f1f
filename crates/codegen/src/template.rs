//! Language-agnostic contract template
//!
//! Built from a manifest and a [`TypeMapper`]: method names are resolved so they
//! never collide, and every type is translated into the target language.

use cpm_core::{Error, Manifest, ParamType, Parameter, Result, ScriptHash};
use serde::Serialize;
use std::collections::HashMap;

use crate::mapper::{upper_first, TypeMapper};
use crate::GenerationConfig;

/// Method or event argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    /// Language type
    pub type_name: String,
    /// ABI type
    pub type_abi: ParamType,
}

/// Method with its resolved, collision-free name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodTemplate {
    pub name: String,
    pub name_abi: String,
    pub comment: String,
    pub safe: bool,
    pub arguments: Vec<Argument>,
    pub return_type: String,
    pub return_type_abi: ParamType,
}

impl MethodTemplate {
    /// Methods returning a server-side iterator are paged by off-chain SDKs
    pub fn returns_iterator(&self) -> bool {
        self.return_type_abi.is_iterator()
    }

    pub fn returns_void(&self) -> bool {
        self.return_type_abi.is_void()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTemplate {
    pub name: String,
    pub arguments: Vec<Argument>,
}

/// Everything a renderer needs to emit an SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractTemplate {
    /// Sanitized class name
    pub contract_name: String,
    /// Name exactly as declared in the manifest
    pub manifest_name: String,
    /// `0x`-prefixed display hash
    pub hash: String,
    #[serde(skip)]
    pub script_hash: ScriptHash,
    pub methods: Vec<MethodTemplate>,
    pub events: Vec<EventTemplate>,
}

impl ContractTemplate {
    /// Build the template for a manifest
    pub fn build(
        manifest: &Manifest,
        mapper: &dyn TypeMapper,
        config: &GenerationConfig,
    ) -> Result<Self> {
        let contract_name = sanitize_contract_name(&manifest.name);
        if contract_name.is_empty() {
            return Err(Error::manifest(format!(
                "contract name '{}' has no usable characters",
                manifest.name
            )));
        }

        let mut seen: HashMap<String, bool> = manifest
            .abi
            .methods
            .iter()
            .map(|m| (mapper.map_method_name(&m.name), false))
            .collect();

        let mut methods = Vec::new();
        for method in manifest.public_methods() {
            let base = mapper.map_method_name(&method.name);
            let name = resolve_name(&mut seen, &base, method.parameters.len());

            methods.push(MethodTemplate {
                name,
                name_abi: method.name.clone(),
                comment: format!("invokes `{}` method of contract.", method.name),
                safe: method.safe,
                arguments: map_arguments(&method.parameters, mapper),
                return_type: mapper.map_type(method.return_type).to_string(),
                return_type_abi: method.return_type,
            });
        }

        let events = manifest
            .abi
            .events
            .iter()
            .map(|event| EventTemplate {
                name: event.name.clone(),
                arguments: map_arguments(&event.parameters, mapper),
            })
            .collect();

        Ok(Self {
            contract_name,
            manifest_name: manifest.name.clone(),
            hash: config.script_hash.to_string(),
            script_hash: config.script_hash,
            methods,
            events,
        })
    }

    /// Display hash without the `0x` prefix
    pub fn hash_without_prefix(&self) -> &str {
        self.hash.strip_prefix("0x").unwrap_or(&self.hash)
    }

    pub fn has_iterators(&self) -> bool {
        self.methods.iter().any(MethodTemplate::returns_iterator)
    }
}

/// Pick a name for the next method sharing `base`.
///
/// A name that is unseen or not yet emitted is used as is. Otherwise the
/// parameter count is appended, growing a `_` prefix on the suffix until the
/// name is free: `f`, `f_2`, `f__2`.
fn resolve_name(seen: &mut HashMap<String, bool>, base: &str, param_count: usize) -> String {
    let mut name = base.to_string();
    if seen.get(&name).copied().unwrap_or(false) {
        let mut suffix = param_count.to_string();
        while seen.get(&name).copied().unwrap_or(false) {
            suffix = format!("_{}", suffix);
            name = format!("{}{}", base, suffix);
        }
    }
    seen.insert(name.clone(), true);
    name
}

fn map_arguments(parameters: &[Parameter], mapper: &dyn TypeMapper) -> Vec<Argument> {
    parameters
        .iter()
        .enumerate()
        .map(|(i, p)| Argument {
            name: if p.name.is_empty() {
                format!("arg{}", i)
            } else {
                p.name.clone()
            },
            type_name: mapper.map_type(p.param_type).to_string(),
            type_abi: p.param_type,
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Strip non-word characters and uppercase the first letter
pub fn sanitize_contract_name(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| is_word_char(*c)).collect();
    upper_first(&stripped)
}

/// Lowercased name with runs of non-word characters replaced by `-`
pub fn kebab_folder_name(name: &str) -> String {
    let mut folder = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if is_word_char(c) {
            folder.extend(c.to_lowercase());
            in_separator = false;
        } else if !in_separator {
            folder.push('-');
            in_separator = true;
        }
    }
    folder
}

/// Lowercased name with spaces replaced by `_`
pub fn snake_folder_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}
