use std::env::VarError;

#[derive(Debug, thiserror::Error)]
pub enum FromEnvError {
  #[error("Invalid value for {0}")]
  InvalidKey(String, #[source] anyhow::Error),
}

/// Reads an environment variable, treating unset and empty values the same
pub fn optional_var(key: &str) -> Option<String> {
  match std::env::var(key) {
    Ok(value) if !value.trim().is_empty() => Some(value),
    Ok(_) | Err(VarError::NotPresent) | Err(VarError::NotUnicode(_)) => None,
  }
}
