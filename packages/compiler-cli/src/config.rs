//! Project configuration
//!
//! `glimmer.json` carries the compiler's camelCase preprocess options
//! (`strictMode`, `locals`, `meta.moduleName`, `mode`) next to the output
//! settings. Command line flags are laid over whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use glimmer_compiler::{PrecompileOptions, PreprocessOptions};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "glimmer.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// The serialized template as JSON.
    #[default]
    Json,
    /// An ES module whose default export is the template.
    Module,
    /// The block with opcodes and symbols spelled out.
    Debug,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Module => "js",
            OutputFormat::Json | OutputFormat::Debug => "json",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    #[serde(flatten)]
    pub options: PreprocessOptions,
    pub format: OutputFormat,
    pub out_dir: Option<PathBuf>,
    /// Files or glob patterns compiled when none are named on the command line.
    pub include: Vec<String>,
}

impl ProjectConfig {
    /// Options for one input. Without an explicit module name the input's
    /// path names the module.
    pub fn precompile_options(&self, input: &Path) -> PrecompileOptions {
        let mut options = self.options.clone();
        if options.meta.module_name.is_none() {
            options.meta.module_name = Some(input.to_string_lossy().replace('\\', "/"));
        }
        PrecompileOptions::from(options)
    }
}

/// Reads a config file. Relative `outDir` and `include` entries are taken
/// relative to the file's directory.
pub fn read_configuration(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut config: ProjectConfig =
        serde_json::from_str(&content).with_context(|| format!("invalid configuration in {}", path.display()))?;

    let base_dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(base_dir) = base_dir {
        if let Some(out_dir) = config.out_dir.take() {
            config.out_dir = Some(if out_dir.is_relative() {
                base_dir.join(out_dir)
            } else {
                out_dir
            });
        }
        config.include = config
            .include
            .iter()
            .map(|pattern| {
                if Path::new(pattern).is_relative() {
                    base_dir.join(pattern).to_string_lossy().into_owned()
                } else {
                    pattern.clone()
                }
            })
            .collect();
    }

    debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

/// Precompile Handlebars templates to the Glimmer wire format
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "glimmer-precompile", version)]
pub struct CommandLine {
    /// Template files or glob patterns
    #[arg(value_name = "INPUTS")]
    pub inputs: Vec<String>,

    /// Compile in strict mode
    #[arg(long)]
    pub strict: bool,

    /// Module name recorded in compiled templates and error messages
    #[arg(long, value_name = "NAME")]
    pub module_name: Option<String>,

    /// Comma separated names in scope for strict mode templates
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub locals: Vec<String>,

    /// Configuration file (defaults to ./glimmer.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write one file per input here instead of printing to stdout
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// More logging; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    /// The configuration file (if any) with these flags applied on top.
    pub fn resolve(&self) -> anyhow::Result<ProjectConfig> {
        let mut config = match &self.config {
            Some(path) => read_configuration(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => read_configuration(Path::new(DEFAULT_CONFIG_FILE))?,
            None => ProjectConfig::default(),
        };
        self.overlay(&mut config);
        Ok(config)
    }

    pub fn overlay(&self, config: &mut ProjectConfig) {
        if self.strict {
            config.options.strict_mode = true;
        }
        if let Some(module_name) = &self.module_name {
            config.options.meta.module_name = Some(module_name.clone());
        }
        let locals: Vec<String> = self
            .locals
            .iter()
            .map(|local| local.trim())
            .filter(|local| !local.is_empty())
            .map(String::from)
            .collect();
        if !locals.is_empty() {
            config.options.locals = locals;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = Some(out_dir.clone());
        }
        if !self.inputs.is_empty() {
            config.include = self.inputs.clone();
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
