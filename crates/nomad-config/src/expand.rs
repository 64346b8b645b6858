//! `${VAR}` expansion for configuration strings.
//!
//! Only the braced form is recognised: `${VAR}` fails when `VAR` is unset,
//! `${VAR:-fallback}` uses `fallback` instead. A bare `$VAR` is left alone.

use crate::ConfigError;

/// Name of the variable that could not be resolved.
struct Unset(String);

/// Expand variable references in `value`, reporting failures against `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |name: &str| -> Result<Option<String>, Unset> {
        std::env::var(name)
            .map(Some)
            .map_err(|_| Unset(name.to_owned()))
    };

    shellexpand::env_with_context(&escape_bare_dollars(value), lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Double every `$` outside a `${...}` reference so the expander keeps it.
fn escape_bare_dollars(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 4);
    let mut rest = value;
    while let Some(idx) = rest.find('$') {
        escaped.push_str(&rest[..idx]);
        rest = &rest[idx..];
        if rest[1..].starts_with('{') {
            let end = rest.find('}').map_or(2, |close| close + 1);
            escaped.push_str(&rest[..end]);
            rest = &rest[end..];
        } else {
            escaped.push_str("$$");
            rest = &rest[1..];
        }
    }
    escaped.push_str(rest);
    escaped
}

/// Expand an optional value in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}
