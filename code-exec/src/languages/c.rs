//! C and C++ share the gcc driver conventions

use super::{LanguageSpec, Recipe};
use crate::types::Language;

pub(crate) fn c_spec() -> LanguageSpec {
    LanguageSpec {
        language: Language::C,
        extension: "c",
        recipe: Recipe::CompileThenRun {
            compiler: "gcc".to_string(),
            args: Vec::new(),
        },
    }
}

pub(crate) fn cpp_spec() -> LanguageSpec {
    LanguageSpec {
        language: Language::Cpp,
        extension: "cpp",
        recipe: Recipe::CompileThenRun {
            compiler: "g++".to_string(),
            args: Vec::new(),
        },
    }
}
