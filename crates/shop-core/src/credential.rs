//! # Credential Resolution
//!
//! Resolves the provider secret key for a request. Sources are checked in
//! fixed priority order:
//!
//! 1. the runtime environment bindings supplied by the hosting platform
//! 2. the process environment variable
//! 3. the value injected at build time
//!
//! Empty values count as absent. The key is wrapped in [`SecretString`] so it
//! never shows up in `Debug` output or logs.

use crate::error::{PaymentError, PaymentResult};
use secrecy::SecretString;
use std::collections::HashMap;

/// Name of the secret key in every source
pub const SECRET_KEY_VAR: &str = "STRIPE_KEY";

/// Platform-provided environment bindings (deployment secrets)
pub type RuntimeEnv = HashMap<String, String>;

/// Resolve the secret key from the runtime bindings, the process
/// environment, or the build-time value, in that order.
pub fn resolve_secret_key(runtime_env: Option<&RuntimeEnv>) -> PaymentResult<SecretString> {
    resolve_from_sources(
        runtime_env,
        std::env::var(SECRET_KEY_VAR).ok(),
        option_env!("STRIPE_KEY"),
    )
}

/// Source-explicit form of [`resolve_secret_key`].
pub fn resolve_from_sources(
    runtime_env: Option<&RuntimeEnv>,
    process_env: Option<String>,
    build_env: Option<&str>,
) -> PaymentResult<SecretString> {
    let non_empty = |value: &String| !value.is_empty();

    runtime_env
        .and_then(|env| env.get(SECRET_KEY_VAR))
        .filter(|v| non_empty(v))
        .cloned()
        .or_else(|| process_env.filter(non_empty))
        .or_else(|| build_env.map(str::to_string).filter(non_empty))
        .map(SecretString::from)
        .ok_or_else(|| {
            PaymentError::Configuration(format!(
                "Missing {SECRET_KEY_VAR} - make sure it is set as an env var / secret \
                 in your deployment platform AND in .env for local dev."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn runtime(value: &str) -> RuntimeEnv {
        RuntimeEnv::from([(SECRET_KEY_VAR.to_string(), value.to_string())])
    }

    #[test]
    fn test_runtime_env_wins() {
        let env = runtime("sk_test_runtime");
        let key =
            resolve_from_sources(Some(&env), Some("sk_test_process".into()), Some("sk_test_build"))
                .unwrap();
        assert_eq!(key.expose_secret(), "sk_test_runtime");
    }

    #[test]
    fn test_process_env_before_build_env() {
        let key = resolve_from_sources(None, Some("sk_test_process".into()), Some("sk_test_build"))
            .unwrap();
        assert_eq!(key.expose_secret(), "sk_test_process");
    }

    #[test]
    fn test_build_env_fallback() {
        let key = resolve_from_sources(None, None, Some("sk_test_build")).unwrap();
        assert_eq!(key.expose_secret(), "sk_test_build");
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let env = runtime("");
        let key = resolve_from_sources(Some(&env), Some(String::new()), Some("sk_test_build"))
            .unwrap();
        assert_eq!(key.expose_secret(), "sk_test_build");
    }

    #[test]
    fn test_missing_everywhere() {
        let err = resolve_from_sources(Some(&RuntimeEnv::new()), None, None).unwrap_err();
        assert!(matches!(err, PaymentError::Configuration(_)));
        let message = err.to_string();
        assert!(message.contains("STRIPE_KEY"));
        assert!(message.contains("deployment platform"));
        assert!(message.contains(".env"));
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let key = resolve_from_sources(None, Some("sk_test_hidden".into()), None).unwrap();
        assert!(!format!("{key:?}").contains("sk_test_hidden"));
    }
}
