//! Toolchain registry: how each supported language is executed

mod c;
mod go;
mod python;
mod rust;

pub use python::GUI_MARKERS;

use serde::Serialize;
use std::collections::BTreeMap;
use which::which;

use crate::{config::ExecConfig, types::Language};

/// How source text is turned into a running program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipe {
    /// `program flag <text>`, the text is passed inline rather than as a file
    Inline { program: String, flag: String },
    /// `compiler args.. <source> -o <binary>`, then `<binary>`
    CompileThenRun { compiler: String, args: Vec<String> },
    /// `program args.. <source>`, compile and run in one step
    RunFromSource { program: String, args: Vec<String> },
}

impl Recipe {
    /// The executable the recipe starts with
    pub fn program(&self) -> &str {
        match self {
            Recipe::Inline { program, .. } => program,
            Recipe::CompileThenRun { compiler, .. } => compiler,
            Recipe::RunFromSource { program, .. } => program,
        }
    }

    fn set_program(&mut self, replacement: &str) {
        match self {
            Recipe::Inline { program, .. }
            | Recipe::CompileThenRun {
                compiler: program, ..
            }
            | Recipe::RunFromSource { program, .. } => *program = replacement.to_string(),
        }
    }
}

/// Invocation recipe of one language. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSpec {
    pub language: Language,
    pub extension: &'static str,
    pub recipe: Recipe,
}

impl LanguageSpec {
    pub fn required_tools(&self) -> Vec<&str> {
        vec![self.recipe.program()]
    }

    pub fn is_available(&self) -> bool {
        self.required_tools().iter().all(|tool| check_command(tool))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolchainStatus {
    pub language: Language,
    pub extension: &'static str,
    pub program: String,
    pub available: bool,
}

/// Maps every offered language to exactly one `LanguageSpec`
#[derive(Debug, Clone)]
pub struct Registry {
    specs: BTreeMap<Language, LanguageSpec>,
}

impl Registry {
    pub fn new(config: &ExecConfig) -> Self {
        let specs = Language::ALL
            .iter()
            .map(|&language| {
                let mut spec = default_spec(language);
                if let Some(program) = config.program_override(language) {
                    spec.recipe.set_program(program);
                }
                (language, spec)
            })
            .collect();
        Self { specs }
    }

    pub fn get(&self, language: Language) -> &LanguageSpec {
        // Built from Language::ALL, every variant is present
        &self.specs[&language]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageSpec> {
        self.specs.values()
    }

    pub fn availability(&self) -> Vec<ToolchainStatus> {
        self.iter()
            .map(|spec| ToolchainStatus {
                language: spec.language,
                extension: spec.extension,
                program: spec.recipe.program().to_string(),
                available: spec.is_available(),
            })
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(&ExecConfig::default())
    }
}

fn default_spec(language: Language) -> LanguageSpec {
    match language {
        Language::Python => python::spec(),
        Language::Rust => rust::spec(),
        Language::Go => go::spec(),
        Language::C => c::c_spec(),
        Language::Cpp => c::cpp_spec(),
    }
}

pub fn check_command(cmd: &str) -> bool {
    which(cmd).is_ok()
}

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| which(**tool).is_err())
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
