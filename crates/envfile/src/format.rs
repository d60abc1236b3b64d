use crate::param::EnvParam;

/// Marker that flags a line as a secret: `KEY=VALUE # encrypted`.
pub const ENCRYPTED_MARKER: &str = "encrypted";

/// Parse one `KEY=VALUE [# comment]` line.
///
/// Lines without exactly one `=`, or with an empty key, yield `None`. Text
/// after `#` is a comment; a comment reading `encrypted` (any case) marks
/// the value as a secret. A `#` inside the value therefore truncates it.
pub fn parse_line(line: &str) -> Option<EnvParam> {
    let mut parts = line.split('=');
    let (key, rest) = match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(rest), None) => (key.trim(), rest),
        _ => return None,
    };
    if key.is_empty() {
        return None;
    }

    let mut portions = rest.split('#');
    let value = portions.next().unwrap_or_default().trim();
    let is_encrypted = portions
        .next()
        .is_some_and(|comment| comment.trim().eq_ignore_ascii_case(ENCRYPTED_MARKER));

    Some(EnvParam::new(key, value).encrypted(is_encrypted))
}

/// Parse every usable line; malformed lines are dropped silently.
pub fn parse_env_str(text: &str) -> Vec<EnvParam> {
    text.lines().filter_map(parse_line).collect()
}

/// Render params one per line, marking secrets with ` # encrypted`.
pub fn render_env(params: &[EnvParam]) -> String {
    params
        .iter()
        .map(|param| {
            if param.is_encrypted {
                format!("{}={} # {ENCRYPTED_MARKER}", param.key, param.value)
            } else {
                format!("{}={}", param.key, param.value)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_line() {
        assert_eq!(parse_line(" DB_HOST = db1 "), Some(EnvParam::new("DB_HOST", "db1")));
    }

    #[test]
    fn encrypted_marker_is_case_insensitive() {
        let param = parse_line("TOKEN=abc # Encrypted").unwrap();
        assert_eq!(param.value, "abc");
        assert!(param.is_encrypted);
    }

    #[test]
    fn other_comments_are_stripped() {
        let param = parse_line("PORT=8080 # default port").unwrap();
        assert_eq!(param.value, "8080");
        assert!(!param.is_encrypted);
    }

    #[test]
    fn drops_lines_without_exactly_one_equals() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("# just a comment"), None);
        assert_eq!(parse_line("NO_VALUE"), None);
        assert_eq!(parse_line("URL=a=b"), None);
        assert_eq!(parse_line("=orphan"), None);
    }

    #[test]
    fn empty_value_is_kept() {
        assert_eq!(parse_line("EMPTY="), Some(EnvParam::new("EMPTY", "")));
    }

    #[test]
    fn render_then_parse_keeps_secret_flags() {
        let params = vec![
            EnvParam::new("A", "1"),
            EnvParam::new("SECRET", "s3cr3t").encrypted(true),
        ];
        let text = render_env(&params);
        assert_eq!(text, "A=1\nSECRET=s3cr3t # encrypted");
        assert_eq!(parse_env_str(&text), params);
    }

    #[test]
    fn parse_skips_blank_and_malformed_lines() {
        let text = "A=1\n\n  \nbroken\nB=2 # encrypted\n";
        let params = parse_env_str(text);
        assert_eq!(params.len(), 2);
        assert!(params[1].is_encrypted);
    }
}
