/// Rewrite LaTeX-style notation into the syntax accepted by [`super::parser`].
///
/// * `^{body}` becomes `**(body)`
/// * `_{body}` becomes `_body`
/// * backslashes are dropped (`\cdot` becomes the bare word `cdot`)
/// * surrounding whitespace is trimmed
///
/// Braced groups are matched by depth, so nested groups such as `x^{a^{b}}`
/// are rewritten from the inside out. A `^{` or `_{` without a matching close
/// brace is left as text; the parser rejects it later. Groups nested deeper
/// than [`MAX_GROUP_DEPTH`] are also left as text. Never fails.
pub fn normalize(expr: &str) -> String {
    rewrite_groups(expr, 0).replace('\\', "").trim().to_string()
}

pub const MAX_GROUP_DEPTH: usize = 64;

fn rewrite_groups(input: &str, depth: usize) -> String {
    if depth >= MAX_GROUP_DEPTH {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len() + 8);
    let mut rest = input;

    while let Some(pos) = rest.find(['^', '_']) {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);

        // Both markers are ASCII, so slicing one byte is safe.
        let marker = &tail[..1];
        let after = &tail[1..];

        if let Some(close) = matching_brace(after) {
            let body = &after[1..close];
            if !body.is_empty() {
                let body = rewrite_groups(body, depth + 1);
                if marker == "^" {
                    out.push_str("**(");
                    out.push_str(&body);
                    out.push(')');
                } else {
                    out.push('_');
                    out.push_str(&body);
                }
                rest = &after[close + 1..];
                continue;
            }
        }

        out.push_str(marker);
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Byte offset of the `}` closing the `{` that starts `s`, if any.
fn matching_brace(s: &str) -> Option<usize> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_block_becomes_power() {
        assert_eq!(normalize("m_Z^{2}"), "m_Z**(2)");
    }

    #[test]
    fn braced_subscript_collapses() {
        assert_eq!(normalize("m_{Z}"), "m_Z");
        assert_eq!(normalize("m_{\\mu}"), "m_mu");
    }

    #[test]
    fn backslashes_are_stripped_lossily() {
        assert_eq!(normalize("\\alpha \\cdot m_Z"), "alpha cdot m_Z");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize("   alpha  "), "alpha");
    }

    #[test]
    fn nested_groups_are_rewritten() {
        assert_eq!(normalize("x^{a^{b}}"), "x**(a**(b))");
        assert_eq!(normalize("m_{W}^{2}/m_{Z}^{2}"), "m_W**(2)/m_Z**(2)");
        assert_eq!(normalize("\\theta_{1_{2}}"), "theta_1_2");
    }

    #[test]
    fn unmatched_group_is_left_alone() {
        assert_eq!(normalize("x^{2"), "x^{2");
        assert_eq!(normalize("m_{Z"), "m_{Z");
    }

    #[test]
    fn empty_group_is_left_alone() {
        assert_eq!(normalize("x^{}"), "x^{}");
    }

    #[test]
    fn bare_markers_pass_through() {
        assert_eq!(normalize("x^2 + m_Z"), "x^2 + m_Z");
    }

    #[test]
    fn single_pass_reaches_fixed_point() {
        let inputs = [
            "m_Z^{2}",
            "\\frac{\\alpha}{\\pi}",
            "  \\sin^{2}\\theta_{W} ",
            "\\sqrt{m_{\\mu} m_{Z}}",
            "G_{F}^{-1/2} + x^{a^{b}}",
            "alpha_{S}(m_{Z}^{2})",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn deeply_nested_groups_stop_rewriting() {
        let depth = 100_000;
        let input = format!("x{}1{}", "^{".repeat(depth), "}".repeat(depth));
        let out = normalize(&input);
        assert!(out.starts_with(&format!("x{}", "**(".repeat(MAX_GROUP_DEPTH))));
        assert!(out.contains("^{"));
        assert!(out.ends_with(&")".repeat(MAX_GROUP_DEPTH)));
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(normalize("µ_{é}^{2}"), "µ_é**(2)");
    }
}
