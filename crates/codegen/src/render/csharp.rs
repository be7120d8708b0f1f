use cpm_core::Result;
use serde_json::json;

use super::{join_arguments, RenderedFile, Renderer};
use crate::template::{ContractTemplate, MethodTemplate};
use crate::templates::TemplateManager;
use crate::GenerationConfig;

const DEFAULT_NAMESPACE: &str = "cpm";

/// C# contract calling the target through `Contract.Call`
pub struct CSharpRenderer;

impl Renderer for CSharpRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let methods: String = ctr.methods.iter().map(render_method).collect();
        let content = templates.render(
            "csharp_contract",
            &json!({
                "namespace": config.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE),
                "contract_name": ctr.contract_name,
                "hash": ctr.hash,
                "methods": methods,
            }),
        )?;

        Ok(vec![RenderedFile::new(
            format!("{}.cs", ctr.contract_name),
            content,
        )])
    }
}

fn render_method(method: &MethodTemplate) -> String {
    let params = join_arguments(&method.arguments, |a| format!("{} {}", a.type_name, a.name));
    let call_args = if method.arguments.is_empty() {
        ", new object[0]".to_string()
    } else {
        method
            .arguments
            .iter()
            .map(|a| format!(", {}", a.name))
            .collect()
    };
    let call = format!(
        "Contract.Call(ScriptHash, \"{}\", CallFlags.All{})",
        method.name_abi, call_args
    );
    let body = if method.returns_void() {
        format!("{};", call)
    } else {
        format!("return ({}) {};", method.return_type, call)
    };

    format!(
        "\n        public static {} {}({}) {{\n            {}\n        }}\n",
        method.return_type, method.name, params, body
    )
}
