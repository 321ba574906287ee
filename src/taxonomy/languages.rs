/// Colour used when neither the source nor the table knows a language.
pub const FALLBACK_LANGUAGE_COLOR: &str = "#8b949e";

const KNOWN_LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("TypeScript", "#3178c6"),
    ("JavaScript", "#f1e05a"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Ruby", "#701516"),
    ("PHP", "#4F5D95"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("C#", "#178600"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#A97BFF"),
    ("Scala", "#c22d40"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("SCSS", "#c6538c"),
    ("Shell", "#89e051"),
    ("Vim", "#199f4b"),
    ("Lua", "#000080"),
    ("Dart", "#00B4AB"),
    ("Elixir", "#6e4a7e"),
    ("Haskell", "#5e5086"),
    ("Clojure", "#db5855"),
    ("Vue", "#41b883"),
    ("Svelte", "#ff3e00"),
];

/// Source-provided colour first, then the well-known table, then grey.
pub fn language_color(language: &str, provided: Option<&str>) -> String {
    if let Some(color) = provided.filter(|c| !c.is_empty()) {
        return color.to_string();
    }

    KNOWN_LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| color.to_string())
        .unwrap_or_else(|| FALLBACK_LANGUAGE_COLOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_color() {
        assert_eq!(language_color("Rust", Some("#123456")), "#123456");
        assert_eq!(language_color("Rust", None), "#dea584");
        assert_eq!(language_color("Rust", Some("")), "#dea584");
        assert_eq!(language_color("Brainfuck", None), FALLBACK_LANGUAGE_COLOR);
    }
}
