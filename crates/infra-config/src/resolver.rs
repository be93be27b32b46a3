//! Cross-reference resolution (second substitution pass).
//!
//! Every key of every section becomes a `$KEY` token. The table is applied
//! exactly once: a value referencing `$A`, where `A` itself still holds
//! `$B`, ends up containing `$B`. Chains are not followed.

use indexmap::IndexMap;

use crate::document::ConfigDocument;

/// Flat `$KEY` -> value table built from a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    tokens: IndexMap<String, String>,
}

impl SubstitutionTable {
    /// Build the table in document order. When the same key appears in more
    /// than one section, the section parsed last wins.
    pub fn from_document(doc: &ConfigDocument) -> Self {
        let mut tokens = IndexMap::new();
        for (_, section) in doc.sections() {
            for (key, value) in section.iter() {
                if key.is_empty() {
                    continue;
                }
                tokens.insert(format!("${key}"), value.to_string());
            }
        }
        Self { tokens }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Substitute tokens in `value` with a single left-to-right scan.
    ///
    /// At each `$` the longest matching token wins, so `$PERSONAL_DIR` is
    /// never shadowed by a shorter `$PERSONAL`. Inserted text is not
    /// rescanned. Unknown tokens stay verbatim.
    pub fn apply(&self, value: &str) -> String {
        if self.tokens.is_empty() || !value.contains('$') {
            return value.to_string();
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(idx) = rest.find('$') {
            out.push_str(&rest[..idx]);
            let candidate = &rest[idx..];
            match self.longest_match(candidate) {
                Some((token_len, replacement)) => {
                    out.push_str(replacement);
                    rest = &candidate[token_len..];
                }
                None => {
                    out.push('$');
                    rest = &candidate[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn longest_match(&self, candidate: &str) -> Option<(usize, &str)> {
        self.tokens
            .iter()
            .filter(|(token, _)| candidate.starts_with(token.as_str()))
            .max_by_key(|(token, _)| token.len())
            .map(|(token, value)| (token.len(), value.as_str()))
    }
}

/// Replace `$KEY` references across all sections of `doc`, in place.
pub fn resolve_cross_references(doc: &mut ConfigDocument) {
    let table = SubstitutionTable::from_document(doc);
    if table.is_empty() {
        return;
    }

    let mut changed = 0usize;
    for section in doc.sections_mut() {
        for value in section.values_mut() {
            let resolved = table.apply(value);
            if resolved != *value {
                *value = resolved;
                changed += 1;
            }
        }
    }
    tracing::debug!(tokens = table.len(), changed, "Resolved cross-references");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(sections: &[(&str, &[(&str, &str)])]) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for (name, entries) in sections {
            let section = doc.open_section(*name);
            for (key, value) in entries.iter() {
                section.insert(*key, *value);
            }
        }
        doc
    }

    #[test]
    fn test_reference_across_sections() {
        let mut d = doc(&[
            ("PATHS", &[("PERSONAL_DIR", "/home/x/data")]),
            ("CORE_MCP_SERVERS", &[("rag-memory", "$PERSONAL_DIR/rag")]),
        ]);
        resolve_cross_references(&mut d);
        assert_eq!(d.get("CORE_MCP_SERVERS", "rag-memory"), Some("/home/x/data/rag"));
    }

    #[test]
    fn test_reference_to_later_section() {
        let mut d = doc(&[
            ("CORE_MCP_SERVERS", &[("rag-memory", "$MCP_ROOT/rag")]),
            ("PATHS", &[("MCP_ROOT", "/opt/mcp")]),
        ]);
        resolve_cross_references(&mut d);
        assert_eq!(d.get("CORE_MCP_SERVERS", "rag-memory"), Some("/opt/mcp/rag"));
    }

    #[test]
    fn test_later_section_shadows_earlier() {
        let mut d = doc(&[
            ("A", &[("ROOT", "/first")]),
            ("B", &[("ROOT", "/second")]),
            ("C", &[("USE", "$ROOT/x")]),
        ]);
        resolve_cross_references(&mut d);
        assert_eq!(d.get("C", "USE"), Some("/second/x"));
    }

    #[test]
    fn test_chained_reference_expands_one_level_only() {
        let mut d = doc(&[("PATHS", &[("A", "$B/a"), ("B", "$C/b"), ("C", "/c")])]);
        resolve_cross_references(&mut d);
        // Every value is resolved against the pre-pass table
        assert_eq!(d.get("PATHS", "A"), Some("$C/b/a"));
        assert_eq!(d.get("PATHS", "B"), Some("/c/b"));
        assert_eq!(d.get("PATHS", "C"), Some("/c"));
    }

    #[test]
    fn test_unknown_token_left_verbatim() {
        let mut d = doc(&[("PATHS", &[("X", "$NOPE/and/$ALSO_NOPE")])]);
        resolve_cross_references(&mut d);
        assert_eq!(d.get("PATHS", "X"), Some("$NOPE/and/$ALSO_NOPE"));
    }

    #[test]
    fn test_longest_token_wins() {
        let mut d = doc(&[(
            "PATHS",
            &[
                ("PERSONAL", "/short"),
                ("PERSONAL_DIR", "/long"),
                ("USE", "$PERSONAL_DIR|$PERSONAL"),
            ],
        )]);
        resolve_cross_references(&mut d);
        assert_eq!(d.get("PATHS", "USE"), Some("/long|/short"));
    }

    #[test]
    fn test_lone_dollar_kept() {
        let table = SubstitutionTable::from_document(&doc(&[("S", &[("K", "v")])]));
        assert_eq!(table.apply("cost: $5 and $"), "cost: $5 and $");
        assert_eq!(table.apply("$K$K"), "vv");
    }

    #[test]
    fn test_second_pass_is_noop_without_remaining_tokens() {
        let mut d = doc(&[("PATHS", &[("ROOT", "/r"), ("USE", "$ROOT/x")])]);
        resolve_cross_references(&mut d);
        let once = d.clone();
        resolve_cross_references(&mut d);
        assert_eq!(d, once);
    }
}
