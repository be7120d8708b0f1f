use cpm_core::Result;
use serde_json::json;
use tracing::warn;

use super::{join_arguments, RenderedFile, Renderer};
use crate::mapper::{upper_first, JavaOffChainMapper, TypeMapper};
use crate::template::{Argument, ContractTemplate, MethodTemplate};
use crate::templates::TemplateManager;
use crate::GenerationConfig;

/// Package placeholder left for the user when no namespace is configured
pub const PACKAGE_PLACEHOLDER: &str = "<REPLACE_ME>";

fn package(config: &GenerationConfig) -> &str {
    config.namespace.as_deref().unwrap_or(PACKAGE_PLACEHOLDER)
}

/// neow3j devpack `ContractInterface` with native method declarations
pub struct JavaOnChainRenderer;

impl Renderer for JavaOnChainRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let methods: String = ctr
            .methods
            .iter()
            .map(|m| {
                format!(
                    "\n    public native {} {}({});\n",
                    m.return_type,
                    m.name_abi,
                    join_arguments(&m.arguments, |a| format!("{} {}", a.type_name, a.name))
                )
            })
            .collect();

        let content = templates.render(
            "java_onchain",
            &json!({
                "package": package(config),
                "contract_name": ctr.contract_name,
                "hash": ctr.hash_without_prefix(),
                "methods": methods,
            }),
        )?;

        Ok(vec![RenderedFile::new(
            format!("{}.java", ctr.contract_name),
            content,
        )])
    }
}

/// neow3j `SmartContract` wrapper
pub struct JavaOffChainRenderer;

impl Renderer for JavaOffChainRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let mapper = JavaOffChainMapper;
        let mut methods = String::new();
        for method in &ctr.methods {
            if !method.safe {
                methods.push_str(&render_invoke(method, &mapper));
                methods.push_str(&render_test(&format!("test{}", upper_first(&method.name)), method, &mapper));
            } else {
                methods.push_str(&render_test(&method.name, method, &mapper));
            }
        }

        let content = templates.render(
            "java_offchain",
            &json!({
                "package": package(config),
                "contract_name": ctr.contract_name,
                "hash": ctr.hash,
                "has_iterators": ctr.has_iterators(),
                "methods": methods,
            }),
        )?;

        Ok(vec![RenderedFile::new(
            format!("{}.java", ctr.contract_name),
            content,
        )])
    }
}

fn wrap_argument(argument: &Argument, mapper: &dyn TypeMapper) -> String {
    let wrap = mapper.wrap_expression(argument.type_abi).unwrap_or_else(|| {
        warn!(
            "No contract parameter conversion for {} argument '{}', passing it as any",
            argument.type_abi, argument.name
        );
        "ContractParameter.any"
    });
    format!("{}({})", wrap, argument.name)
}

fn parameter_list(method: &MethodTemplate, mapper: &dyn TypeMapper) -> String {
    match method.arguments.as_slice() {
        [] => "Collections.emptyList()".to_string(),
        [single] => format!("Collections.singletonList({})", wrap_argument(single, mapper)),
        arguments => format!(
            "Arrays.asList({})",
            join_arguments(arguments, |a| wrap_argument(a, mapper))
        ),
    }
}

fn doc(comment: &str) -> String {
    format!("\n\t/**\n\t * {}\n\t */\n", comment)
}

/// Builds the transaction for a state-changing method
fn render_invoke(method: &MethodTemplate, mapper: &dyn TypeMapper) -> String {
    let params = join_arguments(&method.arguments, |a| format!("{} {}", a.type_name, a.name));
    let wraps: String = method
        .arguments
        .iter()
        .map(|a| format!(", {}", wrap_argument(a, mapper)))
        .collect();

    format!(
        "{}\tpublic TransactionBuilder {}({}) {{\n\t\treturn smartContract.invokeFunction(\"{}\"{});\n\t}}\n",
        doc(&method.comment),
        method.name,
        params,
        method.name_abi,
        wraps
    )
}

/// Test invocation returning the unwrapped result, or result pages for iterators
fn render_test(name: &str, method: &MethodTemplate, mapper: &dyn TypeMapper) -> String {
    let mut params: Vec<String> = method
        .arguments
        .iter()
        .map(|a| format!("{} {}", a.type_name, a.name))
        .collect();

    if method.returns_iterator() {
        params.push("int itemsPerRequest".to_string());
        params.push("AccountSigner... signers".to_string());
        return format!(
            "{}\tpublic java.util.Iterator<List<StackItem>> {}({}) {{\n\t\treturn pages(openIterator(\"{}\", {}, signers), itemsPerRequest);\n\t}}\n",
            doc(&method.comment),
            name,
            params.join(", "),
            method.name_abi,
            parameter_list(method, mapper)
        );
    }

    params.push("AccountSigner... signers".to_string());
    let call = format!(
        "smartContract.callInvokeFunction(\"{}\", {}, signers)",
        method.name_abi,
        parameter_list(method, mapper)
    );

    let unwrap = if method.returns_void() {
        None
    } else {
        mapper.unwrap_expression(method.return_type_abi)
    };
    let (return_type, declaration, assignment, tail) = match unwrap {
        Some(expression) => (
            mapper.return_type(method.return_type_abi),
            "\t\tNeoInvokeFunction response;\n".to_string(),
            "response = ",
            format!("\t\treturn {};\n", expression),
        ),
        None => ("void".to_string(), String::new(), "", String::new()),
    };

    format!(
        "{doc}\tpublic {ret} {name}({params}) {{\n{decl}\t\ttry {{\n\t\t\t{assign}{call};\n\t\t}} catch (IOException e) {{\n\t\t\tthrow new RuntimeException(e);\n\t\t}}\n{tail}\t}}\n",
        doc = doc(&method.comment),
        ret = return_type,
        name = name,
        params = params.join(", "),
        decl = declaration,
        assign = assignment,
        call = call,
        tail = tail,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{mapper_for, Language, SdkMode};
    use cpm_core::Manifest;

    fn manifest() -> Manifest {
        Manifest::from_value(json!({
            "name": "Sample Contract",
            "abi": {"methods": [
                {"name": "balanceOf", "parameters": [{"name": "account", "type": "Hash160"}], "returntype": "Integer", "safe": true},
                {"name": "transfer", "parameters": [
                    {"name": "from", "type": "Hash160"}, {"name": "to", "type": "Hash160"}, {"name": "amount", "type": "Integer"}
                ], "returntype": "Boolean", "safe": false},
                {"name": "tokensOf", "parameters": [{"name": "owner", "type": "Hash160"}], "returntype": "InteropInterface", "safe": true},
                {"name": "update", "parameters": [], "returntype": "Void", "safe": false}
            ], "events": []}
        }))
        .unwrap()
    }

    fn render(mode: SdkMode, renderer: &dyn Renderer, config: GenerationConfig) -> RenderedFile {
        let ctr = ContractTemplate::build(&manifest(), mapper_for(Language::Java, mode), &config).unwrap();
        renderer
            .render_files(&ctr, &config, &TemplateManager::new().unwrap())
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_on_chain_interface() {
        let config = GenerationConfig::new(Language::Java, SdkMode::OnChain);
        let file = render(SdkMode::OnChain, &JavaOnChainRenderer, config);
        assert_eq!(file.path.to_str(), Some("SampleContract.java"));
        assert!(file.content.starts_with("package <REPLACE_ME>;\n"));
        assert!(file.content.contains("static final String scriptHash = \"0000000000000000000000000000000000000000\";"));
        assert!(file.content.contains("public native boolean transfer(Hash160 from, Hash160 to, int amount);"));
        assert!(file.content.contains("public native void update();"));
    }

    #[test]
    fn test_on_chain_package_from_namespace() {
        let config = GenerationConfig::new(Language::Java, SdkMode::OnChain).with_namespace("com.acme.sdk");
        let file = render(SdkMode::OnChain, &JavaOnChainRenderer, config);
        assert!(file.content.starts_with("package com.acme.sdk;\n"));
    }

    #[test]
    fn test_off_chain_safe_method_is_query_only() {
        let config = GenerationConfig::new(Language::Java, SdkMode::OffChain);
        let file = render(SdkMode::OffChain, &JavaOffChainRenderer, config);
        assert!(file.content.contains("public BigInteger balanceOf(Hash160 account, AccountSigner... signers) {"));
        assert!(file.content.contains(
            "response = smartContract.callInvokeFunction(\"balanceOf\", Collections.singletonList(ContractParameter.hash160(account)), signers);"
        ));
        assert!(file.content.contains("return response.getInvocationResult().getFirstStackItem().getInteger();"));
        assert!(!file.content.contains("TransactionBuilder balanceOf"));
    }

    #[test]
    fn test_off_chain_unsafe_method_gets_invoke_and_test() {
        let config = GenerationConfig::new(Language::Java, SdkMode::OffChain);
        let file = render(SdkMode::OffChain, &JavaOffChainRenderer, config);
        assert!(file.content.contains(
            "public TransactionBuilder transfer(Hash160 from, Hash160 to, BigInteger amount) {\n\t\treturn smartContract.invokeFunction(\"transfer\", ContractParameter.hash160(from), ContractParameter.hash160(to), ContractParameter.integer(amount));\n\t}"
        ));
        assert!(file.content.contains("public boolean testTransfer(Hash160 from, Hash160 to, BigInteger amount, AccountSigner... signers) {"));
        assert!(file.content.contains("Arrays.asList(ContractParameter.hash160(from), ContractParameter.hash160(to), ContractParameter.integer(amount))"));
    }

    #[test]
    fn test_off_chain_void_test_yields_nothing() {
        let config = GenerationConfig::new(Language::Java, SdkMode::OffChain);
        let file = render(SdkMode::OffChain, &JavaOffChainRenderer, config);
        assert!(file.content.contains(
            "public void testUpdate(AccountSigner... signers) {\n\t\ttry {\n\t\t\tsmartContract.callInvokeFunction(\"update\", Collections.emptyList(), signers);\n\t\t} catch (IOException e) {\n\t\t\tthrow new RuntimeException(e);\n\t\t}\n\t}"
        ));
    }

    #[test]
    fn test_off_chain_iterator_pages() {
        let config = GenerationConfig::new(Language::Java, SdkMode::OffChain);
        let file = render(SdkMode::OffChain, &JavaOffChainRenderer, config);
        assert!(file.content.contains(
            "public java.util.Iterator<List<StackItem>> tokensOf(Hash160 owner, int itemsPerRequest, AccountSigner... signers) {"
        ));
        assert!(file.content.contains("import io.neow3j.types.StackItemType;"));
        assert!(file.content.contains("can not have an iterator inside another iterator"));
    }
}
