//! `${VAR}` expansion for configuration values.

use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

static BRACED_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").unwrap());

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// An unset variable without a default is an error naming `field`. Only the
/// braced references are handed to `shellexpand`; text between them, bare
/// `$VAR` included, is copied as written.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut expanded = String::with_capacity(value.len());
    let mut last = 0;
    for m in BRACED_VAR_RE.find_iter(value) {
        expanded.push_str(&value[last..m.start()]);
        expanded.push_str(&expand_braced(m.as_str(), field)?);
        last = m.end();
    }
    expanded.push_str(&value[last..]);
    Ok(expanded)
}

/// Expand a single `${...}` reference.
fn expand_braced(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |var| std::env::var(var).map(Some))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
