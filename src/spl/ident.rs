//! SPL identifier sanitizing.
//!
//! User supplied names and namespaces are mapped onto legal SPL identifiers.
//! Every fallback is a pure function of its input (an MD5 digest folded to
//! eight bytes and base64 encoded) so repeated builds of the same topology
//! emit the same identifiers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use md5::{Digest, Md5};

/// Longest name emitted unchanged as a runtime identifier.
pub const MAX_RUNTIME_ID_LEN: usize = 80;

/// Prefix used for every generated identifier.
pub const GENERATED_PREFIX: &str = "__spl_";

/// Reserved words of the SPL language.
const SPL_KEYWORDS: &[&str] = &[
    "as", "attribute", "blob", "boolean", "break", "complex32", "complex64", "composite",
    "config", "continue", "decimal128", "decimal32", "decimal64", "else", "enum",
    "expression", "false", "float32", "float64", "for", "function", "graph", "if", "in",
    "input", "int16", "int32", "int64", "int8", "list", "logic", "map", "matrix",
    "mutable", "namespace", "onProcess", "onPunct", "onTuple", "operator", "optional",
    "output", "param", "public", "return", "rstring", "set", "state", "stateful",
    "static", "stream", "timestamp", "true", "tuple", "type", "uint16", "uint32",
    "uint64", "uint8", "use", "ustring", "void", "while", "window", "xml",
];

pub fn is_keyword(token: &str) -> bool {
    SPL_KEYWORDS.contains(&token)
}

/// True if `s` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// MD5 of `s`, first half XOR second half, base64 without padding and
/// with `+` and `/` replaced by `_`. Always 11 characters.
pub fn folded_digest(s: &str) -> String {
    let digest = Md5::digest(s.as_bytes());
    let mut folded = [0u8; 8];
    for (i, b) in folded.iter_mut().enumerate() {
        *b = digest[i] ^ digest[i + 8];
    }
    STANDARD_NO_PAD.encode(folded).replace(['+', '/'], "_")
}

fn strip_illegal(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Sanitize a dot separated namespace.
///
/// Each token loses every character outside `[A-Za-z0-9_]`, empty tokens are
/// dropped, and reserved words or tokens left starting with a digit are
/// replaced by a hashed identifier. Returns `default` when nothing survives.
pub fn fix_namespace(ns: &str, default: &str) -> String {
    let tokens: Vec<String> = ns
        .split('.')
        .filter_map(|token| {
            let stripped = strip_illegal(token);
            if stripped.is_empty() {
                None
            } else if is_keyword(&stripped) || !is_identifier(&stripped) {
                Some(format!("{GENERATED_PREFIX}{}", folded_digest(token)))
            } else {
                Some(stripped)
            }
        })
        .collect();

    if tokens.is_empty() {
        default.to_string()
    } else {
        tokens.join(".")
    }
}

/// Sanitize a single identifier such as a graph name.
pub fn fix_name(name: &str, default: &str) -> String {
    let stripped = strip_illegal(name);
    if stripped.is_empty() {
        return default.to_string();
    }
    if is_keyword(&stripped) || !is_identifier(&stripped) {
        return format!("{GENERATED_PREFIX}{}", folded_digest(name));
    }
    stripped
}

/// Identifier emitted for an operator or stream called `name`.
///
/// Short legal identifiers pass through; anything else becomes
/// `<kind suffix>_<digest>` where the suffix is the part of `kind` after the
/// last `::`.
pub fn runtime_id(kind: &str, name: &str) -> String {
    if name.len() <= MAX_RUNTIME_ID_LEN && is_identifier(name) {
        return name.to_string();
    }

    let suffix = strip_illegal(kind.rsplit("::").next().unwrap_or(kind));
    let id = format!("{}_{}", suffix, folded_digest(name));
    if is_identifier(&id) { id } else { format!("_{id}") }
}
