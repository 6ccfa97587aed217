/// Check if a string is a valid JavaScript identifier (ASCII subset)
///
/// A valid identifier must:
/// - Not be empty
/// - Start with a letter (a-z, A-Z), underscore (_) or dollar sign ($)
/// - Contain only alphanumeric characters, underscores or dollar signs
pub fn is_valid_identifier(name: &str) -> bool {
    let Some(first_char) = name.chars().next() else {
        return false;
    };
    if !first_char.is_ascii_alphabetic() && first_char != '_' && first_char != '$' {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Strip every whitespace character from a display name.
///
/// Examples:
///   - "Skeleton" -> "Skeleton"
///   - "Story Behind" -> "StoryBehind"
///   - "Magical  Chat\tInput" -> "MagicalChatInput"
pub fn strip_whitespace(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Turn a display name into a symbol that is safe to emit in generated code.
///
/// Whitespace is removed, characters that cannot appear in an identifier are
/// dropped, and a leading digit gets a `Component` prefix. An empty result
/// becomes `Component`.
pub fn symbol_for_display_name(name: &str) -> String {
    let stripped: String = strip_whitespace(name)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();

    if stripped.is_empty() {
        return "Component".to_string();
    }
    if is_valid_identifier(&stripped) {
        stripped
    } else {
        format!("Component{}", stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_identifier_valid_names() {
        assert!(is_valid_identifier("Skeleton"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("$store"));
        assert!(is_valid_identifier("name123"));
        assert!(is_valid_identifier("AIChatShowcase"));
    }

    #[test]
    fn test_is_valid_identifier_invalid_names() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("3DScene"));
        assert!(!is_valid_identifier("has-dash"));
        assert!(!is_valid_identifier("has space"));
        assert!(!is_valid_identifier("has.dot"));
    }

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace("Skeleton"), "Skeleton");
        assert_eq!(strip_whitespace("Story Behind"), "StoryBehind");
        assert_eq!(strip_whitespace(" Magical  Chat\tInput "), "MagicalChatInput");
    }

    #[test]
    fn test_symbol_for_display_name() {
        assert_eq!(symbol_for_display_name("AI Chat"), "AIChat");
        assert_eq!(symbol_for_display_name("Before/After Slider"), "BeforeAfterSlider");
        assert_eq!(symbol_for_display_name("3D Globe"), "Component3DGlobe");
        assert_eq!(symbol_for_display_name("✨"), "Component");
    }
}
