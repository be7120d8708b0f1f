//! neo-go bindings
//!
//! The on-chain flavour mirrors neo-go's contract binding (`neogointernal`
//! call shims), the off-chain flavour its RPC binding (`ContractReader` for
//! safe methods, `Contract` for state-changing ones).

use cpm_core::Result;
use serde_json::json;
use std::collections::BTreeSet;

use super::{join_arguments, RenderedFile, Renderer};
use crate::mapper::{GoOffChainMapper, TypeMapper};
use crate::template::{ContractTemplate, MethodTemplate};
use crate::templates::TemplateManager;
use crate::GenerationConfig;

const NESTED_ITERATOR: &str = "can not have an iterator inside another iterator";

/// Go keywords, plus the receiver and paging names generated methods declare
const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "c", "itemsPerRequest",
];

/// Argument name usable as a Go identifier
fn identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Go package name: lowercased alphanumeric characters of the contract name
pub fn package_name(name: &str) -> String {
    let package: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if package.is_empty() {
        "contract".to_string()
    } else {
        package
    }
}

fn import_block(std: &BTreeSet<&str>, external: &BTreeSet<&str>) -> String {
    if std.is_empty() && external.is_empty() {
        return String::new();
    }

    let mut block = String::from("\nimport (\n");
    for path in std {
        block.push_str(&format!("\t\"{}\"\n", path));
    }
    if !std.is_empty() && !external.is_empty() {
        block.push('\n');
    }
    for path in external {
        block.push_str(&format!("\t\"{}\"\n", path));
    }
    block.push_str(")\n");
    block
}

fn call_arguments(method: &MethodTemplate) -> String {
    method
        .arguments
        .iter()
        .map(|a| format!(", {}", identifier(&a.name)))
        .collect()
}

fn parameters(method: &MethodTemplate) -> String {
    join_arguments(&method.arguments, |a| format!("{} {}", identifier(&a.name), a.type_name))
}

/// Contract-to-contract call shims
pub struct GoOnChainRenderer;

impl Renderer for GoOnChainRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        _config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let package = package_name(&ctr.manifest_name);

        let mut external = BTreeSet::new();
        if !ctr.methods.is_empty() {
            external.insert("github.com/nspcc-dev/neo-go/pkg/interop/contract");
            external.insert("github.com/nspcc-dev/neo-go/pkg/interop/neogointernal");
        }
        let uses_interop = ctr.methods.iter().any(|m| {
            (!m.returns_void() && m.return_type.starts_with("interop."))
                || m.arguments.iter().any(|a| a.type_name.starts_with("interop."))
        });
        if uses_interop {
            external.insert("github.com/nspcc-dev/neo-go/pkg/interop");
        }

        let hash_bytes: String = ctr
            .script_hash
            .as_bytes()
            .iter()
            .map(|b| format!("\\x{:02x}", b))
            .collect();
        let methods: String = ctr.methods.iter().map(render_on_chain_method).collect();

        let content = templates.render(
            "go_onchain",
            &json!({
                "package": package,
                "manifest_name": ctr.manifest_name,
                "imports": import_block(&BTreeSet::new(), &external),
                "hash_bytes": hash_bytes,
                "methods": methods,
            }),
        )?;

        Ok(vec![RenderedFile::new(format!("{}.go", package), content)])
    }
}

fn render_on_chain_method(method: &MethodTemplate) -> String {
    let flags = if method.safe {
        "contract.ReadStates"
    } else {
        "contract.All"
    };
    let mut out = format!("\n// {} {}\n", method.name, method.comment);

    if method.returns_void() {
        out.push_str(&format!(
            "func {}({}) {{\n\tneogointernal.CallWithTokenNoRet(Hash, \"{}\", int({}){})\n}}\n",
            method.name,
            parameters(method),
            method.name_abi,
            flags,
            call_arguments(method)
        ));
    } else {
        out.push_str(&format!(
            "func {}({}) {} {{\n\treturn neogointernal.CallWithToken(Hash, \"{}\", int({}){}).({})\n}}\n",
            method.name,
            parameters(method),
            method.return_type,
            method.name_abi,
            flags,
            call_arguments(method),
            method.return_type
        ));
    }
    out
}

/// RPC client binding
pub struct GoOffChainRenderer;

impl Renderer for GoOffChainRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        _config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let mapper = GoOffChainMapper;
        let package = package_name(&ctr.manifest_name);

        let mut std = BTreeSet::new();
        let mut external = BTreeSet::from([
            "github.com/google/uuid",
            "github.com/nspcc-dev/neo-go/pkg/core/transaction",
            "github.com/nspcc-dev/neo-go/pkg/neorpc/result",
            "github.com/nspcc-dev/neo-go/pkg/util",
            "github.com/nspcc-dev/neo-go/pkg/vm/stackitem",
        ]);
        if !ctr.methods.is_empty() {
            external.insert("github.com/nspcc-dev/neo-go/pkg/rpcclient/unwrap");
        }
        if ctr.has_iterators() {
            std.insert("errors");
            std.insert("iter");
        }
        let mut types: Vec<String> = Vec::new();
        for method in &ctr.methods {
            types.extend(method.arguments.iter().map(|a| a.type_name.clone()));
            if !method.returns_iterator() && !method.returns_void() {
                types.push(mapper.return_type(method.return_type_abi));
            }
        }
        if types.iter().any(|t| t.contains("big.")) {
            std.insert("math/big");
        }
        if types.iter().any(|t| t.contains("keys.")) {
            external.insert("github.com/nspcc-dev/neo-go/pkg/crypto/keys");
        }

        let hash_bytes = ctr
            .script_hash
            .as_bytes()
            .iter()
            .map(|b| format!("0x{:02x}", b))
            .collect::<Vec<_>>()
            .join(", ");

        let mut methods = String::new();
        if ctr.has_iterators() {
            methods.push_str(&traverse_helper());
        }
        for method in &ctr.methods {
            methods.push_str(&render_off_chain_method(method, &mapper));
        }

        let content = templates.render(
            "go_offchain",
            &json!({
                "package": package,
                "manifest_name": ctr.manifest_name,
                "imports": import_block(&std, &external),
                "hash_bytes": hash_bytes,
                "methods": methods,
            }),
        )?;

        Ok(vec![RenderedFile::new(format!("{}.go", package), content)])
    }
}

fn traverse_helper() -> String {
    format!(
        r#"
// traverse calls a method returning an iterator and pages through it.
func traverse(invoker Invoker, num int, call func() (*result.Invoke, error)) iter.Seq2[[]stackitem.Item, error] {{
	return func(yield func([]stackitem.Item, error) bool) {{
		sessionID, iterator, err := unwrap.SessionIterator(call())
		if err != nil {{
			yield(nil, err)
			return
		}}
		defer func() {{ _ = invoker.TerminateSession(sessionID) }}()
		for {{
			items, err := invoker.TraverseIterator(sessionID, &iterator, num)
			if err != nil {{
				yield(nil, err)
				return
			}}
			if len(items) == 0 {{
				return
			}}
			for _, item := range items {{
				if item.Type() == stackitem.InteropT {{
					yield(nil, errors.New("{}"))
					return
				}}
			}}
			if !yield(items, nil) {{
				return
			}}
		}}
	}}
}}
"#,
        NESTED_ITERATOR
    )
}

fn render_off_chain_method(method: &MethodTemplate, mapper: &dyn TypeMapper) -> String {
    let params = parameters(method);
    let args = call_arguments(method);

    if method.safe {
        return render_query("ContractReader", "c.invoker", &method.name, method, mapper, &params, &args);
    }

    let mut out = format!(
        "\n// {name} creates a transaction invoking `{abi}` method of the contract.\n\
         // This transaction is signed and immediately sent to the network.\n\
         // The values returned are its hash, ValidUntilBlock value and error if any.\n\
         func (c *Contract) {name}({params}) (util.Uint256, uint32, error) {{\n\
         \treturn c.actor.SendCall(c.hash, \"{abi}\"{args})\n}}\n",
        name = method.name,
        abi = method.name_abi,
        params = params,
        args = args,
    );
    let test_name = format!("Test{}", method.name);
    out.push_str(&render_query("Contract", "c.actor", &test_name, method, mapper, &params, &args));
    out
}

/// Read-only call returning the unwrapped result, or an iterator over its pages
fn render_query(
    receiver: &str,
    invoker: &str,
    name: &str,
    method: &MethodTemplate,
    mapper: &dyn TypeMapper,
    params: &str,
    args: &str,
) -> String {
    let call = format!("{}.Call(c.hash, \"{}\"{})", invoker, method.name_abi, args);

    if method.returns_iterator() {
        let params = if params.is_empty() {
            "itemsPerRequest int".to_string()
        } else {
            format!("{}, itemsPerRequest int", params)
        };
        return format!(
            "\n// {name} {comment}\n\
             // The returned iterator yields pages of at most itemsPerRequest items.\n\
             func (c *{receiver}) {name}({params}) iter.Seq2[[]stackitem.Item, error] {{\n\
             \treturn traverse({invoker}, itemsPerRequest, func() (*result.Invoke, error) {{\n\
             \t\treturn {call}\n\
             \t}})\n}}\n",
            name = name,
            comment = method.comment,
            receiver = receiver,
            params = params,
            invoker = invoker,
            call = call,
        );
    }

    // The Go unwrap table is total
    let unwrap = mapper
        .unwrap_expression(method.return_type_abi)
        .unwrap_or("unwrap.Item");
    let results = if method.returns_void() {
        "error".to_string()
    } else {
        format!("({}, error)", mapper.return_type(method.return_type_abi))
    };

    format!(
        "\n// {name} {comment}\nfunc (c *{receiver}) {name}({params}) {results} {{\n\treturn {unwrap}({call})\n}}\n",
        name = name,
        comment = method.comment,
        receiver = receiver,
        params = params,
        results = results,
        unwrap = unwrap,
        call = call,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{mapper_for, Language, SdkMode};
    use cpm_core::{Manifest, ScriptHash};

    const NEO: &str = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";

    fn manifest() -> Manifest {
        Manifest::from_value(json!({
            "name": "Sample Contract",
            "abi": {"methods": [
                {"name": "balanceOf", "parameters": [{"name": "account", "type": "Hash160"}], "returntype": "Integer", "safe": true},
                {"name": "transfer", "parameters": [
                    {"name": "from", "type": "Hash160"}, {"name": "to", "type": "Hash160"}, {"name": "amount", "type": "Integer"}
                ], "returntype": "Boolean", "safe": false},
                {"name": "tokens", "parameters": [], "returntype": "InteropInterface", "safe": true},
                {"name": "update", "parameters": [], "returntype": "Void", "safe": false}
            ], "events": []}
        }))
        .unwrap()
    }

    fn render(mode: SdkMode, renderer: &dyn Renderer) -> RenderedFile {
        let config = GenerationConfig::new(Language::Go, mode).with_script_hash(NEO.parse::<ScriptHash>().unwrap());
        let ctr = ContractTemplate::build(&manifest(), mapper_for(Language::Go, mode), &config).unwrap();
        let templates = TemplateManager::new().unwrap();
        renderer.render_files(&ctr, &config, &templates).unwrap().remove(0)
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("Sample Contract"), "samplecontract");
        assert_eq!(package_name("NEO"), "neo");
        assert_eq!(package_name("$$$"), "contract");
    }

    #[test]
    fn test_on_chain_binding() {
        let file = render(SdkMode::OnChain, &GoOnChainRenderer);
        assert_eq!(file.path.to_str(), Some("samplecontract.go"));
        assert!(file.content.contains("package samplecontract\n"));
        assert!(file.content.contains("const Hash = \"\\xf5\\x63\\xea\\x40"));
        assert!(file.content.contains("\"github.com/nspcc-dev/neo-go/pkg/interop\"\n"));
        assert!(file.content.contains(
            "func BalanceOf(account interop.Hash160) int {\n\treturn neogointernal.CallWithToken(Hash, \"balanceOf\", int(contract.ReadStates), account).(int)\n}"
        ));
        assert!(file.content.contains(
            "func Update() {\n\tneogointernal.CallWithTokenNoRet(Hash, \"update\", int(contract.All))\n}"
        ));
    }

    #[test]
    fn test_on_chain_without_methods_has_no_imports() {
        let manifest = Manifest::from_value(json!({"name": "Empty", "abi": {"methods": [], "events": []}})).unwrap();
        let config = GenerationConfig::new(Language::Go, SdkMode::OnChain);
        let ctr = ContractTemplate::build(&manifest, mapper_for(Language::Go, SdkMode::OnChain), &config).unwrap();
        let file = GoOnChainRenderer
            .render_files(&ctr, &config, &TemplateManager::new().unwrap())
            .unwrap()
            .remove(0);
        assert!(!file.content.contains("import"));
    }

    #[test]
    fn test_off_chain_safe_and_unsafe_methods() {
        let file = render(SdkMode::OffChain, &GoOffChainRenderer);
        assert!(file.content.contains("var Hash = util.Uint160{ 0xf5, 0x63, 0xea, 0x40"));
        assert!(file.content.contains(
            "func (c *ContractReader) BalanceOf(account util.Uint160) (*big.Int, error) {\n\treturn unwrap.BigInt(c.invoker.Call(c.hash, \"balanceOf\", account))\n}"
        ));
        assert!(file.content.contains(
            "func (c *Contract) Transfer(from util.Uint160, to util.Uint160, amount *big.Int) (util.Uint256, uint32, error) {\n\treturn c.actor.SendCall(c.hash, \"transfer\", from, to, amount)\n}"
        ));
        assert!(file.content.contains("func (c *Contract) TestTransfer(from util.Uint160, to util.Uint160, amount *big.Int) (bool, error) {"));
        assert!(file.content.contains("func (c *Contract) TestUpdate() error {\n\treturn unwrap.Nothing(c.actor.Call(c.hash, \"update\"))\n}"));
        assert!(!file.content.contains("ContractReader) Transfer("));
        assert!(!file.content.contains("TestBalanceOf"));
    }

    #[test]
    fn test_keyword_arguments_are_escaped() {
        let manifest = Manifest::from_value(json!({
            "name": "Registry",
            "abi": {"methods": [
                {"name": "lookup", "parameters": [
                    {"name": "type", "type": "String"}, {"name": "range", "type": "Integer"}, {"name": "c", "type": "Boolean"}
                ], "returntype": "Boolean", "safe": true}
            ], "events": []}
        }))
        .unwrap();
        let templates = TemplateManager::new().unwrap();

        let config = GenerationConfig::new(Language::Go, SdkMode::OnChain);
        let ctr = ContractTemplate::build(&manifest, mapper_for(Language::Go, SdkMode::OnChain), &config).unwrap();
        let file = GoOnChainRenderer.render_files(&ctr, &config, &templates).unwrap().remove(0);
        assert!(file.content.contains("func Lookup(type_ string, range_ int, c_ bool) bool {"));
        assert!(file.content.contains("\"lookup\", int(contract.ReadStates), type_, range_, c_)"));

        let config = GenerationConfig::new(Language::Go, SdkMode::OffChain);
        let ctr = ContractTemplate::build(&manifest, mapper_for(Language::Go, SdkMode::OffChain), &config).unwrap();
        let file = GoOffChainRenderer.render_files(&ctr, &config, &templates).unwrap().remove(0);
        assert!(file.content.contains("Lookup(type_ string, range_ *big.Int, c_ bool) (bool, error)"));
        assert!(file.content.contains("c.invoker.Call(c.hash, \"lookup\", type_, range_, c_)"));
    }

    #[test]
    fn test_off_chain_iterators_page() {
        let file = render(SdkMode::OffChain, &GoOffChainRenderer);
        assert!(file.content.contains(
            "func (c *ContractReader) Tokens(itemsPerRequest int) iter.Seq2[[]stackitem.Item, error] {"
        ));
        assert!(file.content.contains("if len(items) == 0 {"));
        assert!(file.content.contains(NESTED_ITERATOR));
        assert!(file.content.contains("\t\"errors\"\n\t\"iter\"\n\t\"math/big\"\n\n"));
    }
}
