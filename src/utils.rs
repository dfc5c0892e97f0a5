//! Naming helpers shared by the extractor and the binding types.

/// Derive the protobuf JSON name from a declared field name
///
/// Same rule protoc applies when it fills `json_name`: every `_` is dropped
/// and the character after it is uppercased. Everything else is copied as is.
pub fn to_json_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Join a scope and a name into a fully-qualified protobuf name
///
/// An empty scope (no package) yields the bare name.
pub fn qualify_name(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}
