//! URL helpers

/// Join a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_slash() {
        assert_eq!(
            join_url("https://api.hyperbolic.xyz/v1/", "/chat/completions"),
            "https://api.hyperbolic.xyz/v1/chat/completions"
        );
        assert_eq!(join_url("http://x", "completions"), "http://x/completions");
    }
}
