use super::{LanguageSpec, Recipe};
use crate::types::Language;

pub(crate) fn spec() -> LanguageSpec {
    LanguageSpec {
        language: Language::Rust,
        extension: "rs",
        recipe: Recipe::CompileThenRun {
            compiler: "rustc".to_string(),
            args: vec!["--edition".to_string(), "2021".to_string()],
        },
    }
}
