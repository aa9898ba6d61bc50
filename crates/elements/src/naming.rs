//! Property name to attribute name derivation.

/// `fooBar` -> `foo-bar`. Every uppercase letter after the first character
/// starts a new dash-separated segment; the result is lowercase.
pub fn dash_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.char_indices() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Attribute name for `property`: an explicit name wins, then dash-casing,
/// else plain lowercasing.
pub fn attribute_name(property: &str, explicit: Option<&str>, dashcase: bool) -> String {
    match explicit {
        Some(name) => name.to_lowercase(),
        None if dashcase => dash_case(property),
        None => property.to_lowercase(),
    }
}

/// `onClick` -> `click`. Names without the `on` prefix are only lowercased.
pub fn event_name(property: &str) -> String {
    let lower = property.to_lowercase();
    match lower.strip_prefix("on") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => lower,
    }
}
