//! Serializers for filtered triples and knowledge graphs.
//!
//! Three RDF formats are supported, each a pure function over a triple
//! list with its own identifier counter:
//! - **Turtle** ([`turtle`]): prefixed, with the T-Box template as comments
//! - **JSON-LD** ([`jsonld`]): one `@graph` node per triple
//! - **N-Triples** ([`ntriples`]): absolute IRIs, one statement per line
//!
//! [`graphml`] and [`gexf`] write a [`crate::graph::KnowledgeGraph`] with
//! all node and edge attributes for graph tools.

pub mod gexf;
pub mod graphml;
pub mod jsonld;
pub mod ntriples;
pub mod turtle;

use crate::text::contains_arabic;

/// Namespace of entity resources (prefix `:`).
pub const RESOURCE_NS: &str = "http://example.org/resource/";
/// Namespace of ontology predicates (prefix `onto:`).
pub const ONTOLOGY_NS: &str = "http://example.org/ontology/";
/// DBpedia ontology namespace (prefix `dbo:`).
pub const DBO_NS: &str = "http://dbpedia.org/ontology/";
/// RDF Schema namespace (prefix `rdfs:`).
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Language tag for a label: `ar` for Arabic script, none otherwise.
#[must_use]
pub fn label_language(label: &str) -> Option<&'static str> {
    contains_arabic(label).then_some("ar")
}

/// Escapes a string for the inside of a Turtle/N-Triples `"..."` literal.
pub(crate) fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// A quoted literal with its language tag when the label is Arabic.
pub(crate) fn label_literal(label: &str) -> String {
    match label_language(label) {
        Some(lang) => format!("\"{}\"@{lang}", escape_literal(label)),
        None => format!("\"{}\"", escape_literal(label)),
    }
}

/// Escapes text for XML 1.0 element content and attribute values.
///
/// Characters XML 1.0 cannot represent (C0 controls other than tab, line
/// feed and carriage return, and U+FFFE/U+FFFF) are dropped. Tab, line
/// feed and carriage return become character references so attribute
/// values keep them.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {}
            other => out.push(other),
        }
    }
    out
}

/// Characters of RFC 3987 `ucschar`.
fn is_ucschar(c: char) -> bool {
    let cp = u32::from(c);
    match cp {
        0xA0..=0xD7FF | 0xF900..=0xFDCF | 0xFDF0..=0xFFEF => true,
        0x1_0000..=0xE_FFFD => (cp & 0xFFFF) < 0xFFFE && !(0xE_0000..0xE_1000).contains(&cp),
        _ => false,
    }
}

/// Characters an IRI path segment may carry unescaped (`ipchar` without
/// percent-encoded octets). Whitespace is never kept.
fn is_ipchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';'
                | '=' | ':' | '@'
        )
        || (is_ucschar(c) && !c.is_whitespace())
}

fn push_percent_encoded(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    for byte in c.encode_utf8(&mut buf).bytes() {
        out.push_str(&format!("%{byte:02X}"));
    }
}

/// `true` if the `%` at byte `i` starts a `%HH` escape.
fn starts_escape(s: &str, i: usize) -> bool {
    s.as_bytes()
        .get(i + 1..i + 3)
        .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
}

/// Percent-encodes `local` so it can be appended to a namespace as a
/// single path segment. Existing `%HH` escapes are kept; a bare `%`, `/`,
/// `?`, `#` and everything outside `ipchar` are encoded.
pub(crate) fn escape_iri(local: &str) -> String {
    let mut out = String::with_capacity(local.len());
    for (i, c) in local.char_indices() {
        if is_ipchar(c) || (c == '%' && starts_escape(local, i)) {
            out.push(c);
        } else {
            push_percent_encoded(&mut out, c);
        }
    }
    out
}

/// Percent-encodes a whole IRI. Like [`escape_iri`], but `/` and `?` are
/// kept, and so is the first `#` (later ones are encoded).
pub(crate) fn escape_full_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    let mut in_fragment = false;
    for (i, c) in iri.char_indices() {
        let keep = match c {
            '/' | '?' => true,
            '#' if !in_fragment => {
                in_fragment = true;
                true
            }
            '%' => starts_escape(iri, i),
            other => is_ipchar(other),
        };
        if keep {
            out.push(c);
        } else {
            push_percent_encoded(&mut out, c);
        }
    }
    out
}

fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02FF}'
        | '\u{0370}'..='\u{037D}'
        | '\u{037F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_pn_chars(c: char) -> bool {
    is_pn_chars_base(c)
        || matches!(c,
            '_' | '-' | '0'..='9' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// Returns `true` if `local` can follow a prefix in a Turtle prefixed name
/// without escapes.
pub(crate) fn is_pn_local(local: &str) -> bool {
    let Some(first) = local.chars().next() else {
        return false;
    };
    let last = local.chars().last().unwrap_or(first);
    let first_ok = is_pn_chars_base(first) || matches!(first, '_' | ':' | '0'..='9');
    let last_ok = is_pn_chars(last) || last == ':';
    let middle_ok = local.chars().all(|c| is_pn_chars(c) || matches!(c, '.' | ':'));
    first_ok && last_ok && middle_ok
}

/// Returns `true` if `prefix:local` is a valid Turtle prefixed name whose
/// expansion is also a valid IRI.
pub(crate) fn is_safe_local(local: &str) -> bool {
    is_pn_local(local) && local.chars().all(is_ipchar)
}

/// A Turtle term for `local` in namespace `ns`: the prefixed name when
/// `local` allows it, the full IRI otherwise.
pub(crate) fn turtle_name(prefix: &str, ns: &str, local: &str) -> String {
    if is_safe_local(local) {
        format!("{prefix}:{local}")
    } else {
        format!("<{ns}{}>", escape_iri(local))
    }
}
