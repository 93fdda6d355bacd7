//! Template source → wire format, the compiler's public entry points.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::parser::{preprocess_source, PreprocessOptions};
use crate::syntax_error::SyntaxResult;
use crate::v2::normalize_template;
use crate::wire_format::{encode, SerializedTemplateBlock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrecompileOptions {
    #[serde(flatten)]
    pub preprocess: PreprocessOptions,
    /// Overrides the id derived from the compiled block.
    pub id: Option<String>,
}

impl From<PreprocessOptions> for PrecompileOptions {
    fn from(preprocess: PreprocessOptions) -> Self {
        PrecompileOptions { preprocess, id: None }
    }
}

/// A compiled template ready to be embedded in a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTemplateWithLazyBlock {
    pub id: String,
    /// The block as a JSON string.
    pub block: String,
    pub module_name: String,
    /// Embedder locals the template uses, in upvar order.
    pub scope: Vec<String>,
    pub is_strict_mode: bool,
}

impl SerializedTemplateWithLazyBlock {
    pub fn block(&self) -> Result<SerializedTemplateBlock, crate::wire_format::WireFormatError> {
        SerializedTemplateBlock::from_json_str(&self.block)
    }

    /// The object literal form used when the template is inlined into a
    /// JavaScript module. `scope` becomes a closure over the used locals.
    pub fn to_module_source(&self) -> String {
        let scope = if self.scope.is_empty() {
            "null".to_string()
        } else {
            format!("() => [{}]", self.scope.join(", "))
        };
        format!(
            "{{\"id\":{},\"block\":{},\"moduleName\":{},\"scope\":{},\"isStrictMode\":{}}}",
            Value::from(self.id.as_str()),
            Value::from(self.block.as_str()),
            Value::from(self.module_name.as_str()),
            scope,
            self.is_strict_mode,
        )
    }
}

/// Compiles `text` to a block plus the embedder locals it referenced.
pub fn precompile_json(
    text: &str,
    options: &PreprocessOptions,
) -> SyntaxResult<(SerializedTemplateBlock, Vec<String>)> {
    let source = options.source_for(text);
    let ast = preprocess_source(&source, options)?;
    let template = normalize_template(&ast, &source, options)?;
    let block = encode(&template);
    Ok((block, template.table.used_locals))
}

pub fn precompile(text: &str, options: &PrecompileOptions) -> SyntaxResult<SerializedTemplateWithLazyBlock> {
    let (block, used_locals) = precompile_json(text, &options.preprocess)?;
    let block = block.to_json_string();
    let id = options.id.clone().unwrap_or_else(|| template_id(&block));
    debug!(%id, module = options.preprocess.module_name(), "precompiled template");

    Ok(SerializedTemplateWithLazyBlock {
        id,
        block,
        module_name: options.preprocess.module_name().to_string(),
        scope: used_locals,
        is_strict_mode: options.preprocess.strict_mode,
    })
}

/// First eight hex digits of the SHA-256 of the serialized block.
pub fn template_id(block_json: &str) -> String {
    let digest = Sha256::digest(block_json.as_bytes());
    digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
}
