//! Parses the `--key=value` arguments the calling tool passes to the helper binary.
use std::collections::BTreeMap;
use std::ffi::OsString;

pub use self::cli_options::CliOptions;
use crate::WorkerpackError;

mod cli_options;

/// Flag names (without the leading dashes) mapped to their values
///
/// A repeated flag keeps its last value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgumentMap(BTreeMap<String, String>);

impl ArgumentMap {
  /// Parses every token, failing on the first one that is not `--key=value`
  pub fn parse<I, S>(tokens: I) -> Result<Self, WorkerpackError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut arguments = BTreeMap::new();

    for token in tokens {
      let (key, value) = parse_token(token.as_ref())?;
      arguments.insert(key.to_string(), value.to_string());
    }

    Ok(Self(arguments))
  }

  /// Parses the process arguments, skipping the program name
  pub fn from_env() -> Result<Self, WorkerpackError> {
    let tokens = std::env::args_os()
      .skip(1)
      .map(|token: OsString| {
        token
          .into_string()
          .map_err(|token| WorkerpackError::MalformedArguments {
            token: token.to_string_lossy().into_owned(),
          })
      })
      .collect::<Result<Vec<String>, WorkerpackError>>()?;

    Self::parse(tokens)
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(|value| value.as_str())
  }

  /// Flags are enabled with the value `1`
  pub fn is_enabled(&self, key: &str) -> bool {
    self.get(key) == Some("1")
  }

  pub fn to_map(&self) -> BTreeMap<String, String> {
    self.0.clone()
  }
}

fn parse_token(token: &str) -> Result<(&str, &str), WorkerpackError> {
  let malformed = || WorkerpackError::MalformedArguments {
    token: token.to_string(),
  };

  let flag = token.strip_prefix("--").ok_or_else(malformed)?;
  let (key, value) = flag.split_once('=').ok_or_else(malformed)?;

  if key.is_empty() {
    return Err(malformed());
  }

  Ok((key, value))
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn parse(tokens: &[&str]) -> Result<ArgumentMap, WorkerpackError> {
    ArgumentMap::parse(tokens)
  }

  #[test]
  fn parses_key_value_tokens() {
    let args = parse(&["--output-file=/tmp/bundle.json", "--watch=1", "--wasm-binding=WASM"]).unwrap();

    assert_eq!(args.get("output-file"), Some("/tmp/bundle.json"));
    assert!(args.is_enabled("watch"));
    assert_eq!(args.get("wasm-binding"), Some("WASM"));
    assert_eq!(args.get("use-entry"), None);
  }

  #[test]
  fn splits_on_the_first_equals_sign() {
    let args = parse(&["--use-entry=./src/index.js?a=b", "--wasm-binding="]).unwrap();

    assert_eq!(args.get("use-entry"), Some("./src/index.js?a=b"));
    assert_eq!(args.get("wasm-binding"), Some(""));
  }

  #[test]
  fn keeps_the_last_value_of_a_repeated_key() {
    let args = parse(&["--watch=0", "--watch=1"]).unwrap();
    assert_eq!(args.get("watch"), Some("1"));
  }

  #[test]
  fn empty_argument_vectors_are_valid() {
    assert_eq!(parse(&[]), Ok(ArgumentMap::default()));
  }

  #[test]
  fn rejects_malformed_tokens() {
    for token in ["output-file=/tmp/a.json", "--watch", "-watch=1", "--=1", "watch"] {
      assert_eq!(
        parse(&["--watch=1", token]),
        Err(WorkerpackError::MalformedArguments {
          token: token.to_string()
        }),
        "{token} should be rejected"
      );
    }
  }

  #[test]
  fn round_trips_valid_tokens() {
    let tokens = ["--a=1", "--b=", "--c=x=y"];
    let args = parse(&tokens).unwrap();

    let rendered = args
      .to_map()
      .into_iter()
      .map(|(key, value)| format!("--{key}={value}"))
      .collect::<Vec<String>>();

    assert_eq!(rendered, tokens);
  }
}
