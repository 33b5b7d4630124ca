use super::{LanguageSpec, Recipe};
use crate::types::Language;

/// Markers whose presence turns a Python snippet into a GUI preview
pub const GUI_MARKERS: [&str; 3] = ["tkinter", "Tkinter", "PyQt6"];

pub(crate) fn spec() -> LanguageSpec {
    LanguageSpec {
        language: Language::Python,
        extension: "py",
        recipe: Recipe::Inline {
            program: "python3".to_string(),
            flag: "-c".to_string(),
        },
    }
}
