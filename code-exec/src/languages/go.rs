use super::{LanguageSpec, Recipe};
use crate::types::Language;

pub(crate) fn spec() -> LanguageSpec {
    LanguageSpec {
        language: Language::Go,
        extension: "go",
        recipe: Recipe::RunFromSource {
            program: "go".to_string(),
            args: vec!["run".to_string()],
        },
    }
}
