use cpm_core::{ParamType, Result};
use serde_json::json;

use super::{RenderedFile, Renderer};
use crate::mapper::{PythonOffChainMapper, TypeMapper};
use crate::template::{snake_folder_name, ContractTemplate, MethodTemplate};
use crate::templates::TemplateManager;
use crate::GenerationConfig;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Argument name usable as a Python identifier
fn identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// neo3-boa contract stub
pub struct PythonOnChainRenderer;

impl Renderer for PythonOnChainRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        _config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let methods = if ctr.methods.is_empty() {
            "    pass\n".to_string()
        } else {
            ctr.methods.iter().map(render_stub).collect()
        };

        let data = json!({
            "contract_name": ctr.contract_name,
            "hash": ctr.hash,
            "methods": methods,
        });
        let folder = snake_folder_name(&ctr.manifest_name);

        Ok(vec![
            RenderedFile::new(
                format!("{}/__init__.py", folder),
                templates.render("python_init", &data)?,
            ),
            RenderedFile::new(
                format!("{}/contract.py", folder),
                templates.render("python_onchain", &data)?,
            ),
        ])
    }
}

fn render_stub(method: &MethodTemplate) -> String {
    let params = method
        .arguments
        .iter()
        .map(|a| format!("{}: {}", identifier(&a.name), a.type_name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "\n    @staticmethod\n    def {}({}) -> {}:\n        pass\n",
        method.name, params, method.return_type
    )
}

/// neo-mamba `GenericContract` wrapper
pub struct PythonOffChainRenderer;

impl Renderer for PythonOffChainRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        _config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let mapper = PythonOffChainMapper;
        let mut methods = String::new();
        for method in &ctr.methods {
            match (method.safe, method.returns_iterator()) {
                (true, true) => methods.push_str(&render_generator(&method.name, method)),
                (true, false) => methods.push_str(&render_method(method, &mapper)),
                (false, true) => {
                    methods.push_str(&render_method(method, &mapper));
                    methods.push_str(&render_generator(&format!("test_{}", method.name), method));
                }
                (false, false) => {
                    methods.push_str(&render_method(method, &mapper));
                    methods.push_str(&render_test(method, &mapper));
                }
            }
        }

        let content = templates.render(
            "python_offchain",
            &json!({
                "contract_name": ctr.contract_name,
                "hash": ctr.hash,
                "has_iterators": ctr.has_iterators(),
                "methods": methods,
            }),
        )?;
        let folder = snake_folder_name(&ctr.manifest_name);

        Ok(vec![
            RenderedFile::new(format!("{}/__init__.py", folder), String::new()),
            RenderedFile::new(format!("{}/contract_off_chain_sdk.py", folder), content),
        ])
    }
}

fn typed_parameters(method: &MethodTemplate) -> String {
    method
        .arguments
        .iter()
        .map(|a| format!(", {}: {}", identifier(&a.name), a.type_name))
        .collect()
}

fn argument_names(method: &MethodTemplate) -> String {
    method
        .arguments
        .iter()
        .map(|a| identifier(&a.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Address conversion and invocation script shared by every method flavour
fn script(method: &MethodTemplate, unwrap_iterator: bool) -> String {
    let mut out = String::new();
    for argument in &method.arguments {
        if argument.type_abi == ParamType::Hash160 {
            let name = identifier(&argument.name);
            out.push_str(&format!("\t\t{} = _check_address_and_convert({})\n", name, name));
        }
    }

    let iterator = if unwrap_iterator { "_and_unwrap_iterator" } else { "" };
    let emit = if method.arguments.is_empty() {
        format!(
            ".emit_contract_call{}(self.hash, \"{}\")",
            iterator, method.name_abi
        )
    } else {
        format!(
            ".emit_contract_call_with_args{}(self.hash, \"{}\", [{}])",
            iterator,
            method.name_abi,
            argument_names(method)
        )
    };
    out.push_str(&format!(
        "\t\tscript = (\n\t\t\tvm.ScriptBuilder()\n\t\t\t{}\n\t\t\t.to_array()\n\t\t)\n",
        emit
    ));
    out
}

/// Method returning a `ContractMethodResult`, usable with both facade invoke and test invoke
fn render_method(method: &MethodTemplate, mapper: &dyn TypeMapper) -> String {
    // The neo-mamba unwrap table is total
    let unwrap = mapper
        .unwrap_expression(method.return_type_abi)
        .unwrap_or("unwrap.item");
    format!(
        "\n\tdef {}(self{}) -> ContractMethodResult[{}]:\n{}\t\treturn ContractMethodResult(script, {})\n",
        method.name,
        typed_parameters(method),
        mapper.return_type(method.return_type_abi),
        script(method, method.returns_iterator()),
        unwrap
    )
}

/// Test invocation of a state-changing method through the given RPC client
fn render_test(method: &MethodTemplate, mapper: &dyn TypeMapper) -> String {
    let unwrap = mapper
        .unwrap_expression(method.return_type_abi)
        .unwrap_or("unwrap.item");
    let result = if method.returns_void() {
        format!("\t\t{}(res)\n", unwrap)
    } else {
        format!("\t\treturn {}(res)\n", unwrap)
    };
    format!(
        "\n\tasync def test_{}(self, rpc: noderpc.NeoRpcClient{}) -> {}:\n\t\tres = await rpc.invoke_script(self.{}({}).script)\n{}",
        method.name,
        typed_parameters(method),
        mapper.return_type(method.return_type_abi),
        method.name,
        argument_names(method),
        result
    )
}

/// Async generator paging through the iterator returned by the method
fn render_generator(name: &str, method: &MethodTemplate) -> String {
    format!(
        "\n\tasync def {name}(self, rpc: noderpc.NeoRpcClient{params}, items_per_request: int = 20) -> AsyncGenerator[list, None]:\n\
         {script}\
         \t\tres = await rpc.invoke_script(script)\n\
         \t\titerator = unwrap.item(res)\n\
         \t\tif iterator.type != noderpc.StackItemType.INTEROP_INTERFACE or res.session_id is None:\n\
         \t\t\traise ValueError(res.exception or \"unrecognized response\")\n\
         \t\twhile True:\n\
         \t\t\titems = await rpc.traverse_iterator(res.session_id, iterator.value, items_per_request)\n\
         \t\t\tif len(items) == 0:\n\
         \t\t\t\tbreak\n\
         \t\t\tif any(item.type == noderpc.StackItemType.INTEROP_INTERFACE for item in items):\n\
         \t\t\t\traise ValueError(\"can not have an iterator inside another iterator\")\n\
         \t\t\tyield items\n",
        name = name,
        params = typed_parameters(method),
        script = script(method, false),
    )
}
