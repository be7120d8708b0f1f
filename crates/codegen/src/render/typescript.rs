//! neon-dappkit SDK
//!
//! Produces a folder with `api.ts` (invocation builders), the contract class
//! and an `index.ts` re-exporting both.

use cpm_core::Result;
use serde_json::json;

use super::{join_arguments, RenderedFile, Renderer};
use crate::mapper::upper_first;
use crate::template::{kebab_folder_name, ContractTemplate, EventTemplate, MethodTemplate};
use crate::templates::TemplateManager;
use crate::GenerationConfig;

pub struct TypeScriptRenderer;

impl Renderer for TypeScriptRenderer {
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        _config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>> {
        let api: String = ctr.methods.iter().map(render_api_function).collect();
        let events: String = ctr.events.iter().map(render_event_hooks).collect();

        let mut methods = String::new();
        for method in &ctr.methods {
            if method.safe {
                methods.push_str(&render_test(&method.name, method));
            } else {
                methods.push_str(&render_invoke(method));
                methods.push_str(&render_test(&format!("test{}", upper_first(&method.name)), method));
            }
        }

        let api = templates.render("ts_api", &json!({ "methods": api }))?;
        let class = templates.render(
            "ts_class",
            &json!({
                "contract_name": ctr.contract_name,
                "hash": ctr.hash,
                "events": events,
                "methods": methods,
            }),
        )?;
        let index = templates.render("ts_index", &json!({ "contract_name": ctr.contract_name }))?;

        let folder = kebab_folder_name(&ctr.manifest_name);
        Ok(vec![
            RenderedFile::new(format!("{}/api.ts", folder), api),
            RenderedFile::new(format!("{}/{}.ts", folder, ctr.contract_name), class),
            RenderedFile::new(format!("{}/index.ts", folder), index),
        ])
    }
}

/// `params: { a: T, b: U }`
fn params_type(method: &MethodTemplate) -> String {
    format!(
        "params: {{ {} }}",
        join_arguments(&method.arguments, |a| format!("{}: {}", a.name, a.type_name))
    )
}

fn invocation(method: &MethodTemplate) -> String {
    if method.arguments.is_empty() {
        format!("Invocation.{}API(this.config.scriptHash)", method.name)
    } else {
        format!(
            "Invocation.{}API(this.config.scriptHash, params, this.config.parser)",
            method.name
        )
    }
}

fn render_api_function(method: &MethodTemplate) -> String {
    let signature = if method.arguments.is_empty() {
        "scriptHash: string".to_string()
    } else {
        format!("scriptHash: string, {}, parser: Neo3Parser", params_type(method))
    };
    let args: String = method
        .arguments
        .iter()
        .map(|a| {
            format!(
                "\n\t\t\tparser.formatRpcArgument(params.{}, {{ type: '{}' }}),",
                a.name, a.type_abi
            )
        })
        .collect();
    let args = if args.is_empty() {
        args
    } else {
        format!("{}\n\t\t", args)
    };

    format!(
        "\nexport function {}API({}): ContractInvocation {{\n\treturn {{\n\t\tscriptHash,\n\t\toperation: '{}',\n\t\targs: [{}],\n\t}}\n}}\n",
        method.name, signature, method.name_abi, args
    )
}

fn render_invoke(method: &MethodTemplate) -> String {
    let params = if method.arguments.is_empty() {
        String::new()
    } else {
        params_type(method)
    };
    format!(
        "\n\tasync {}({}): Promise<string> {{\n\t\treturn await this.config.invoker.invokeFunction({{\n\t\t\tinvocations: [{}],\n\t\t\tsigners: [],\n\t\t}})\n\t}}\n",
        method.name,
        params,
        invocation(method)
    )
}

fn render_test(name: &str, method: &MethodTemplate) -> String {
    let test_invoke = format!(
        "\t\tconst res = await this.config.invoker.testInvoke({{\n\t\t\tinvocations: [{}],\n\t\t\tsigners: [],\n\t\t}})\n",
        invocation(method)
    );

    if method.returns_iterator() {
        let params = if method.arguments.is_empty() {
            "itemsPerRequest: number = 20".to_string()
        } else {
            format!("{}, itemsPerRequest: number = 20", params_type(method))
        };
        return format!(
            "\n\tasync* {name}({params}): AsyncGenerator<any[], void> {{\n\
             {test_invoke}\n\
             \t\tif (res.stack.length === 0 || res.session === undefined || !TypeChecker.isStackTypeInteropInterface(res.stack[0])) {{\n\
             \t\t\tthrow new Error(res.exception ?? 'unrecognized response')\n\
             \t\t}}\n\n\
             \t\tconst session = res.session\n\
             \t\tconst iteratorId = res.stack[0].id\n\
             \t\tlet iterator = await this.config.invoker.traverseIterator(session, iteratorId, itemsPerRequest)\n\n\
             \t\twhile (iterator.length !== 0) {{\n\
             \t\t\tif (iterator.some((item) => TypeChecker.isStackTypeInteropInterface(item))) {{\n\
             \t\t\t\tthrow new Error('can not have an iterator inside another iterator')\n\
             \t\t\t}}\n\n\
             \t\t\tyield iterator.map((item) => this.config.parser.parseRpcResponse(item))\n\
             \t\t\titerator = await this.config.invoker.traverseIterator(session, iteratorId, itemsPerRequest)\n\
             \t\t}}\n\
             \t}}\n",
            name = name,
            params = params,
            test_invoke = test_invoke,
        );
    }

    let params = if method.arguments.is_empty() {
        String::new()
    } else {
        params_type(method)
    };

    if method.returns_void() {
        return format!(
            "\n\tasync {}({}): Promise<void> {{\n{}\n\t\tif (res.state === 'FAULT') {{\n\t\t\tthrow new Error(res.exception ?? 'unrecognized response')\n\t\t}}\n\t}}\n",
            name, params, test_invoke
        );
    }

    format!(
        "\n\tasync {}({}): Promise<{}> {{\n{}\n\t\tif (res.stack.length === 0) {{\n\t\t\tthrow new Error(res.exception ?? 'unrecognized response')\n\t\t}}\n\n\t\treturn this.config.parser.parseRpcResponse(res.stack[0], {{ type: '{}' }})\n\t}}\n",
        name, params, method.return_type, test_invoke, method.return_type_abi
    )
}

fn render_event_hooks(event: &EventTemplate) -> String {
    let upper = upper_first(&event.name);
    format!(
        "\n\tasync confirm{upper}Event(txId: string): Promise<void> {{\n\
         \t\tif (!this.config.eventListener) throw new Error('EventListener not provided')\n\n\
         \t\tconst txResult = await this.config.eventListener.waitForApplicationLog(txId)\n\
         \t\tthis.config.eventListener.confirmTransaction(\n\
         \t\t\ttxResult, {{ contract: this.config.scriptHash, eventname: '{name}' }}\n\
         \t\t)\n\
         \t}}\n\n\
         \tlisten{upper}Event(callback: Neo3EventListenerCallback): void {{\n\
         \t\tif (!this.config.eventListener) throw new Error('EventListener not provided')\n\n\
         \t\tthis.config.eventListener.addEventListener(this.config.scriptHash, '{name}', callback)\n\
         \t}}\n\n\
         \tremove{upper}EventListener(callback: Neo3EventListenerCallback): void {{\n\
         \t\tif (!this.config.eventListener) throw new Error('EventListener not provided')\n\n\
         \t\tthis.config.eventListener.removeEventListener(this.config.scriptHash, '{name}', callback)\n\
         \t}}\n",
        upper = upper,
        name = event.name,
    )
}
