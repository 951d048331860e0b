//! Layer naming utilities
//!
//! An uploaded dataset's base file name becomes the PostGIS table name and
//! the published GeoServer layer name. Both systems are picky about
//! identifiers, so the name is canonicalized once and threaded through the
//! whole pipeline unchanged.

/// Sanitize a raw dataset base name into a canonical layer name.
///
/// The result is safe to use both as a PostgreSQL table name and as a
/// GeoServer feature type name:
///
/// - lower-cases the input
/// - replaces every character outside `[a-z0-9_]` with `_`
/// - prefixes a `_` when the name would otherwise start with a digit
///
/// The transformation is idempotent; sanitizing an already-sanitized name
/// returns it unchanged.
pub fn sanitize_layer_name(raw: &str) -> String {
    let mut name: String = raw
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    name
}

/// Human-facing title for a layer: the layer name with its first character
/// upper-cased.
pub fn layer_title(layer_name: &str) -> String {
    let mut chars = layer_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
