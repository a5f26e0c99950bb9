use tracing_subscriber::EnvFilter;

/// Initialize tracing to stderr. ANSI colours are only used when stderr is a
/// terminal so piped output stays clean.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

/// Redact a secret for logging, keeping only enough of the tail to tell keys
/// apart.
pub fn redact_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_short_secret() {
        assert_eq!(redact_secret(""), "***");
        assert_eq!(redact_secret("abcd1234"), "***");
    }

    #[test]
    fn test_redact_long_secret_keeps_tail() {
        let redacted = redact_secret("sk-or-v1-supersecretvalue9f3a");
        assert_eq!(redacted, "***9f3a");
        assert!(!redacted.contains("supersecret"));
    }
}
