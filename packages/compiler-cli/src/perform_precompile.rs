//! Perform Precompile
//!
//! Resolves inputs, compiles them in parallel and renders the results in the
//! configured output format.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use glimmer_compiler::wire_format::debug_format;
use glimmer_compiler::{precompile, SerializedTemplateWithLazyBlock, SyntaxError};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{OutputFormat, ProjectConfig};

/// A template that failed to compile.
#[derive(Debug)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub error: SyntaxError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

#[derive(Debug)]
pub struct CompiledTemplate {
    pub path: PathBuf,
    pub template: SerializedTemplateWithLazyBlock,
}

/// Everything one run produced, in input order.
#[derive(Debug, Default)]
pub struct PrecompileResult {
    pub compiled: Vec<CompiledTemplate>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PrecompileResult {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expands glob patterns; plain paths pass through untouched. Duplicates
/// keep their first position.
pub fn resolve_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut inputs = IndexSet::new();
    for pattern in patterns {
        if !is_glob(pattern) {
            inputs.insert(PathBuf::from(pattern));
            continue;
        }
        let matches = glob::glob(pattern).with_context(|| format!("invalid glob pattern {pattern:?}"))?;
        for entry in matches {
            let path = entry.with_context(|| format!("failed to expand {pattern:?}"))?;
            if path.is_file() {
                inputs.insert(path);
            }
        }
    }
    debug!(count = inputs.len(), "resolved inputs");
    Ok(inputs.into_iter().collect())
}

/// Compiles every input. Unreadable files abort the run; syntax errors are
/// collected as diagnostics.
pub fn perform_precompile(inputs: &[PathBuf], config: &ProjectConfig) -> anyhow::Result<PrecompileResult> {
    info!(files = inputs.len(), strict = config.options.strict_mode, "precompiling");

    let outcomes = inputs
        .par_iter()
        .map(|path| {
            let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok::<_, anyhow::Error>((path.clone(), precompile(&text, &config.precompile_options(path))))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut result = PrecompileResult::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(template) => result.compiled.push(CompiledTemplate { path, template }),
            Err(error) => result.diagnostics.push(Diagnostic { path, error }),
        }
    }
    Ok(result)
}

pub fn render_output(template: &SerializedTemplateWithLazyBlock, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(template)?,
        OutputFormat::Module => format!("export default {};", template.to_module_source()),
        OutputFormat::Debug => {
            let block = template.block()?;
            serde_json::to_string_pretty(&json!({
                "id": template.id,
                "moduleName": template.module_name,
                "scope": template.scope,
                "isStrictMode": template.is_strict_mode,
                "block": debug_format(&block),
            }))?
        }
    })
}

/// `<out_dir>/<input stem>.<extension>`
pub fn output_path(out_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().map_or_else(|| "template".into(), |stem| stem.to_string_lossy());
    out_dir.join(format!("{stem}.{}", format.extension()))
}

/// Writes compiled templates under the configured output directory, or to
/// `stdout` without one. Returns the files written. Two inputs that map to
/// the same output file fail the run before anything is written.
pub fn emit(result: &PrecompileResult, config: &ProjectConfig, stdout: &mut dyn Write) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let Some(out_dir) = &config.out_dir else {
        let labelled = result.compiled.len() > 1;
        for compiled in &result.compiled {
            if labelled {
                writeln!(stdout, "// {}", compiled.path.display())?;
            }
            writeln!(stdout, "{}", render_output(&compiled.template, config.format)?)?;
        }
        return Ok(written);
    };

    let mut targets: IndexMap<PathBuf, &CompiledTemplate> = IndexMap::new();
    for compiled in &result.compiled {
        let path = output_path(out_dir, &compiled.path, config.format);
        if let Some(previous) = targets.get(&path) {
            bail!(
                "{} and {} would both be written to {}",
                previous.path.display(),
                compiled.path.display(),
                path.display()
            );
        }
        targets.insert(path, compiled);
    }

    fs::create_dir_all(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;
    for (path, compiled) in targets {
        let output = render_output(&compiled.template, config.format)?;
        fs::write(&path, output + "\n").with_context(|| format!("failed to write {}", path.display()))?;
        debug!(input = %compiled.path.display(), output = %path.display(), "wrote template");
        written.push(path);
    }
    Ok(written)
}
