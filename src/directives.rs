//! Per-source `@jsx` / `@jsxFrag` directive scanning (spec §4.3, §6).
//!
//! Scanned over the *original*, pre-strip input — by the time comments are
//! blanked out the directive text is gone. A simple substring scan is
//! enough here (the teacher reaches for `regex` for heavier text surgery in
//! `jsx_transformer`, but a two-literal lookup doesn't earn that dependency).

/// Finds the first `@jsx <dotted.name>` hint, ignoring `@jsxFrag` matches.
pub fn find_pragma(input: &str) -> Option<String> {
    find_directive(input, "@jsx", &["Frag"])
}

/// Finds the first `@jsxFrag <dotted.name>` hint.
pub fn find_pragma_frag(input: &str) -> Option<String> {
    find_directive(input, "@jsxFrag", &[])
}

fn find_directive(input: &str, directive: &str, reject_suffixes: &[&str]) -> Option<String> {
    let mut search_from = 0usize;
    while let Some(rel) = input[search_from..].find(directive) {
        let at = search_from + rel;
        let after = at + directive.len();

        if reject_suffixes
            .iter()
            .any(|suffix| input[after..].starts_with(suffix))
        {
            search_from = after;
            continue;
        }

        let rest = &input[after..];
        let trimmed = rest.trim_start_matches([' ', '\t']);
        let ident_len = trimmed
            .chars()
            .take_while(|&c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
            .count();
        if ident_len > 0 {
            return Some(trimmed[..ident_len].to_string());
        }
        search_from = after;
    }
    None
}
