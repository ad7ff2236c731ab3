// src/styler.rs
// Styling capability exposed by simulation objects for selector matching.

/// Class tags and instance name of a styled object.
///
/// Objects that do not expose a `Styler` match every selector whose target
/// type fits, so plain config records can be styled by type alone.
#[cfg_attr(test, mockall::automock)]
pub trait Styler {
    /// Space-separated class tags, without the leading `.`
    fn style_class(&self) -> &str;

    /// Unique instance name, without the leading `#`
    fn style_name(&self) -> &str;
}

/// True if `tag` is one of the whitespace-separated tokens in `classes`.
///
/// Repeated or surrounding whitespace in `classes` is ignored.
pub fn class_match(tag: &str, classes: &str) -> bool {
    classes.split_whitespace().any(|c| c == tag)
}

/// Matches a selector pattern against an object's name, class tags and its
/// two notions of type: the declared target type and the implementation
/// type name.
///
/// An empty pattern never matches.
pub fn selector_matches(
    pattern: &str,
    name: &str,
    classes: &str,
    style_type: &str,
    type_name: &str,
) -> bool {
    if let Some(tag) = pattern.strip_prefix('.') {
        return class_match(tag, classes);
    }
    if let Some(id) = pattern.strip_prefix('#') {
        return id == name;
    }
    !pattern.is_empty() && (pattern == style_type || pattern == type_name)
}

/// Matches a selector pattern against an optional styler; objects without
/// one match by default.
pub fn styler_matches(
    pattern: &str,
    styler: Option<&dyn Styler>,
    style_type: &str,
    type_name: &str,
) -> bool {
    if pattern.is_empty() {
        return false;
    }
    match styler {
        Some(s) => selector_matches(pattern, s.style_name(), s.style_class(), style_type, type_name),
        None => true,
    }
}
