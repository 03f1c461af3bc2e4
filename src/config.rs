//! The on-disk configuration file.
//!
//! The file is a human-edited list of `key = value` lines with `#` comments.
//! [`Configuration::load`] reads it into a typed record.  [`Configuration::save`]
//! writes back only the two managed keys (`default_model` and `models`) by
//! patching their lines in place, so comments, blank lines, field order and
//! keys this program does not know about survive untouched.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::observability::CONFIG_SAVES;
use crate::platform;

/// Name of the configuration file inside the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".ai_cli_config";

/// Credential written into a freshly created configuration file.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Endpoint used when `base_url` is not set.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used when `default_model` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Request timeout used when `request_timeout` is not set or invalid.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const KEY_API_KEY: &str = "api_key";
const KEY_BASE_URL: &str = "base_url";
const KEY_DEFAULT_MODEL: &str = "default_model";
const KEY_MODELS: &str = "models";
const KEY_REQUEST_TIMEOUT: &str = "request_timeout";
const KEY_SYSTEM_PROMPT: &str = "system_prompt";
const KEY_PROXY_URL: &str = "proxy_url";

/// Returns `~/.ai_cli_config`.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or_else(|| {
            Error::io(
                "could not determine user home directory",
                io::Error::new(io::ErrorKind::NotFound, "home directory not set"),
            )
        })
}

//////////////////////////////////////////// RawDocument ///////////////////////////////////////////

/// The configuration file's text as an ordered sequence of lines.
///
/// Lines are split on `\n` only, so a `\r` from a CRLF file stays attached to
/// its line and is written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl RawDocument {
    /// Splits `text` into lines.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let mut lines: Vec<String> = text.split('\n').map(String::from).collect();
        let trailing_newline = text.ends_with('\n');
        if trailing_newline {
            lines.pop();
        }
        Self {
            lines,
            trailing_newline,
        }
    }

    /// Iterates over the raw lines, without their `\n` terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Iterates over the `(key, value)` pairs in document order.
    ///
    /// Blank lines, comments and lines without `=` are skipped.  Keys and
    /// values are trimmed and values lose any surrounding quote characters.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| split_entry(line))
    }

    /// Replaces every line holding `key` with `key = value`, or appends one
    /// such line at the end when no line holds it.
    pub fn set(&mut self, key: &str, value: &str) {
        let entry = format!("{key} = {value}");
        let mut found = false;
        for line in self.lines.iter_mut() {
            if !holds_key(line, key) {
                continue;
            }
            let mut replacement = entry.clone();
            if line.ends_with('\r') {
                replacement.push('\r');
            }
            *line = replacement;
            found = true;
        }
        if !found {
            if self.lines.is_empty() {
                self.trailing_newline = true;
            }
            self.lines.push(entry);
        }
    }
}

impl fmt::Display for RawDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))?;
        if self.trailing_newline {
            writeln!(f)?;
        }
        Ok(())
    }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
    Some((key.trim(), value))
}

fn holds_key(line: &str, key: &str) -> bool {
    line.trim_start()
        .strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

fn split_models(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(String::from)
        .collect()
}

/////////////////////////////////////////// Configuration //////////////////////////////////////////

/// The outcome of [`Configuration::load_or_create`].
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The file existed and holds a usable configuration.
    Loaded(Configuration),
    /// The file was missing; a template was written and must be edited
    /// before the program can run.
    Created {
        /// Where the template was written.
        path: PathBuf,
    },
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Bearer credential for the API.
    pub api_key: String,
    /// Endpoint prefix, without trailing slashes.
    pub base_url: String,
    /// Model used when none is given on the command line.
    pub default_model: String,
    /// Models offered for selection, in display order.
    pub models: Vec<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// System message sent ahead of the prompt; empty sends none.
    pub system_prompt: String,
    /// Proxy every request goes through, if any.
    pub proxy_url: Option<String>,
}

impl Configuration {
    /// Creates a configuration with the built-in defaults and the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            models: vec![DEFAULT_MODEL.to_string()],
            request_timeout: DEFAULT_TIMEOUT_SECS,
            system_prompt: platform::detect_system_prompt(),
            proxy_url: None,
        }
    }

    /// Sets the endpoint, stripping trailing slashes.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model list and makes its first entry the default.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.default_model = models.first().cloned().unwrap_or_default();
        self.models = models;
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout = seconds;
        self
    }

    /// Sets the proxy URL.
    pub fn with_proxy_url(mut self, proxy_url: Option<String>) -> Self {
        self.proxy_url = proxy_url;
        self
    }

    /// Reads the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNotFound`] when the file does not exist.  Callers
    ///   usually want [`Configuration::load_or_create`] instead.
    /// - [`Error::MissingCredential`] when `api_key` is unset or still the
    ///   placeholder.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::config_not_found(path));
            }
            Err(err) => {
                return Err(Error::io(
                    format!("could not read {}: {err}", path.display()),
                    err,
                ));
            }
        };
        Self::from_document(&RawDocument::parse(&text), path)
    }

    /// Reads the configuration file, writing the template when it is missing.
    pub fn load_or_create(path: &Path) -> Result<LoadOutcome> {
        match Self::load(path) {
            Ok(config) => Ok(LoadOutcome::Loaded(config)),
            Err(err) if err.is_config_not_found() => {
                create_default(path)?;
                Ok(LoadOutcome::Created {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Overlays the entries of `document` onto the built-in defaults.
    ///
    /// `path` is only used to point the user at the file in error messages.
    pub fn from_document(document: &RawDocument, path: &Path) -> Result<Self> {
        let mut config = Self::new(String::new());
        config.models.clear();
        for (key, value) in document.entries() {
            match key {
                KEY_API_KEY => config.api_key = value.to_string(),
                KEY_BASE_URL => config.base_url = value.to_string(),
                KEY_DEFAULT_MODEL => config.default_model = value.to_string(),
                KEY_MODELS => {
                    let models = split_models(value);
                    if !models.is_empty() {
                        config.models = models;
                    }
                }
                KEY_REQUEST_TIMEOUT => match value.parse::<u64>() {
                    Ok(seconds) if seconds > 0 => config.request_timeout = seconds,
                    _ => config.request_timeout = DEFAULT_TIMEOUT_SECS,
                },
                KEY_SYSTEM_PROMPT => config.system_prompt = value.to_string(),
                KEY_PROXY_URL => {
                    config.proxy_url = Some(value.to_string()).filter(|url| !url.is_empty());
                }
                _ => {}
            }
        }

        if config.api_key.is_empty() || config.api_key == PLACEHOLDER_API_KEY {
            return Err(Error::missing_credential(path));
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        if config.models.is_empty() {
            let fallback = if config.default_model.is_empty() {
                DEFAULT_MODEL
            } else {
                config.default_model.as_str()
            };
            config.models.push(fallback.to_string());
        }
        Ok(config)
    }

    /// Writes `default_model` and `models` back into the file at `path`.
    ///
    /// Every other line of the file is left exactly as it was.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)?;
        let mut document = RawDocument::parse(&text);
        self.patch(&mut document);
        fs::write(path, document.to_string())?;
        CONFIG_SAVES.click();
        Ok(())
    }

    /// Applies the managed keys to `document`.
    pub fn patch(&self, document: &mut RawDocument) {
        document.set(KEY_DEFAULT_MODEL, &self.default_model);
        document.set(KEY_MODELS, &self.models.join(", "));
    }

    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Returns true if `name` is in the model list.
    pub fn has_model(&self, name: &str) -> bool {
        self.models.iter().any(|model| model == name)
    }

    /// Makes `name` the default model.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownModel`] if `name` is not in the model list.
    pub fn set_default_model(&mut self, name: &str) -> Result<()> {
        if !self.has_model(name) {
            return Err(Error::unknown_model(name, &self.models));
        }
        self.default_model = name.to_string();
        Ok(())
    }

    /// Appends `name` to the model list.
    ///
    /// The new model becomes the default when there was no usable default,
    /// which includes the case of a previously empty list.  Names that would
    /// not read back from the `models` line are rejected.
    pub fn add_model(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("model name must not be empty"));
        }
        if name.contains([',', '\n', '\r']) {
            return Err(Error::validation(format!(
                "model name {name:?} must not contain commas or line breaks"
            )));
        }
        if name.starts_with(['"', '\'']) || name.ends_with(['"', '\'']) {
            return Err(Error::validation(format!(
                "model name {name:?} must not start or end with a quote"
            )));
        }
        if self.has_model(name) {
            return Err(Error::duplicate_model(name));
        }
        self.models.push(name.to_string());
        if self.default_model.is_empty() || !self.has_model(&self.default_model) {
            self.default_model = name.to_string();
        }
        Ok(())
    }

    /// Removes the model at `index` and returns its name.
    ///
    /// Removing the default moves the default to the first remaining model,
    /// or clears it when the list is now empty.
    pub fn remove_model(&mut self, index: usize) -> Result<String> {
        if index >= self.models.len() {
            return Err(Error::index_out_of_range(index, self.models.len()));
        }
        let removed = self.models.remove(index);
        if removed == self.default_model || !self.has_model(&self.default_model) {
            self.default_model = self.models.first().cloned().unwrap_or_default();
        }
        Ok(removed)
    }
}

/// Writes the commented configuration template to `path`.
///
/// An existing file is never overwritten.
pub fn create_default(path: &Path) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| {
            Error::io(format!("could not create {}: {err}", path.display()), err)
        })?;
    file.write_all(template(&platform::detect_system_prompt()).as_bytes())?;
    Ok(())
}

/// The text of a freshly created configuration file.
pub fn template(system_prompt: &str) -> String {
    format!(
        "# Configuration for the AI CLI Tool

# Your API Key (REQUIRED)
{KEY_API_KEY} = {PLACEHOLDER_API_KEY}

# Base URL for the OpenAI-compatible API
{KEY_BASE_URL} = {DEFAULT_BASE_URL}

# Default model to use if --model is not specified
{KEY_DEFAULT_MODEL} = {DEFAULT_MODEL}

# Comma-separated list of available models you want to use
{KEY_MODELS} = {DEFAULT_MODEL}, gpt-4.1-nano, gpt-4.1-mini

# Request timeout in seconds
{KEY_REQUEST_TIMEOUT} = {DEFAULT_TIMEOUT_SECS}

# System prompt to guide the AI's behavior
{KEY_SYSTEM_PROMPT} = {system_prompt}

# Optional: Specify a proxy URL if needed (e.g., http://127.0.0.1:7890)
# Leave blank if you don't need a proxy
{KEY_PROXY_URL} =
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = concat!(
        "# my settings\n",
        "api_key = sk-test\n",
        "\n",
        "# keep this comment\n",
        "temperature = 0.2\n",
        "default_model = gpt-4o-mini\n",
        "models = gpt-4o-mini, gpt-4.1-nano\n",
        "   # indented comment\n",
        "extra_key=unchanged\n",
    );

    fn write_document(text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn load_reads_recognized_keys() {
        let (_dir, path) = write_document(
            "api_key = \"sk-abc\"\n\
base_url = https://example.com/v1//\n\
default_model = m2\n\
models = m1 , m2,, m3\n\
request_timeout = 90\n\
system_prompt = 'be brief'\n\
proxy_url = http://127.0.0.1:7890\n",
        );
        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.base_url, "https://example.com/v1");
        assert_eq!(config.default_model, "m2");
        assert_eq!(config.models, vec!["m1", "m2", "m3"]);
        assert_eq!(config.request_timeout, 90);
        assert_eq!(config.timeout(), Duration::from_secs(90));
        assert_eq!(config.system_prompt, "be brief");
        assert_eq!(config.proxy_url.as_deref(), Some("http://127.0.0.1:7890"));
    }

    #[test]
    fn load_missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Configuration::load(&dir.path().join("absent")).unwrap_err();
        assert!(err.is_config_not_found());
    }

    #[test]
    fn load_placeholder_key_is_missing_credential() {
        let (_dir, path) = write_document("api_key = YOUR_API_KEY_HERE\n");
        let err = Configuration::load(&path).unwrap_err();
        assert!(err.is_missing_credential());
    }

    #[test]
    fn load_without_key_is_missing_credential() {
        let (_dir, path) = write_document("# nothing here\nbase_url = https://x\n");
        let err = Configuration::load(&path).unwrap_err();
        assert!(err.is_missing_credential());
    }

    #[test]
    fn load_without_models_falls_back_to_default_model() {
        let (_dir, path) = write_document("api_key = sk\ndefault_model = my-model\n");
        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.models, vec!["my-model"]);
        assert_eq!(config.default_model, "my-model");
    }

    #[test]
    fn load_with_empty_models_keeps_fallback() {
        let (_dir, path) = write_document("api_key = sk\nmodels = , ,\n");
        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.models, vec![DEFAULT_MODEL]);
        assert_eq!(config.default_model, DEFAULT_MODEL);
    }

    #[test]
    fn load_applies_defaults() {
        let (_dir, path) = write_document("api_key = sk\n");
        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.system_prompt, platform::detect_system_prompt());
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn load_ignores_bad_timeout_and_malformed_lines() {
        let (_dir, path) = write_document(
            "api_key = sk\nrequest_timeout = soon\nthis line has no separator\nunknown = 1\nproxy_url =\n",
        );
        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT_SECS);
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn load_or_create_writes_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        match Configuration::load_or_create(&path).unwrap() {
            LoadOutcome::Created { path: created } => assert_eq!(created, path),
            LoadOutcome::Loaded(_) => panic!("expected a fresh template"),
        }
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("api_key = YOUR_API_KEY_HERE"));
        assert!(text.contains("models = gpt-4o-mini, gpt-4.1-nano, gpt-4.1-mini"));
        assert!(text.contains("# Default model to use if --model is not specified"));
        let err = Configuration::load_or_create(&path).unwrap_err();
        assert!(err.is_missing_credential());
    }

    #[test]
    fn create_default_never_overwrites() {
        let (_dir, path) = write_document("api_key = sk\n");
        assert!(create_default(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "api_key = sk\n");
    }

    #[test]
    fn template_loads_once_key_is_set() {
        let text = template("be brief").replace(PLACEHOLDER_API_KEY, "sk-real");
        let config =
            Configuration::from_document(&RawDocument::parse(&text), Path::new("t")).unwrap();
        assert_eq!(config.models, vec!["gpt-4o-mini", "gpt-4.1-nano", "gpt-4.1-mini"]);
        assert_eq!(config.system_prompt, "be brief");
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn save_round_trips_and_preserves_other_lines() {
        let (_dir, path) = write_document(DOCUMENT);
        let mut config = Configuration::load(&path).unwrap();
        config.add_model("o3-mini").unwrap();
        config.set_default_model("o3-mini").unwrap();
        config.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            DOCUMENT
                .replace("default_model = gpt-4o-mini", "default_model = o3-mini")
                .replace(
                    "models = gpt-4o-mini, gpt-4.1-nano",
                    "models = gpt-4o-mini, gpt-4.1-nano, o3-mini"
                )
        );
        assert!(text.contains("\n   # indented comment\n"));

        let reloaded = Configuration::load(&path).unwrap();
        assert_eq!(reloaded.default_model, config.default_model);
        assert_eq!(reloaded.models, config.models);
    }

    #[test]
    fn save_appends_missing_keys_at_end() {
        let original = "api_key = sk\n# trailing comment\n";
        let (_dir, path) = write_document(original);
        let config = Configuration::load(&path).unwrap();
        config.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            format!("{original}default_model = gpt-4o-mini\nmodels = gpt-4o-mini\n")
        );
    }

    #[test]
    fn save_appends_after_unterminated_last_line() {
        let (_dir, path) = write_document("api_key = sk");
        let config = Configuration::load(&path).unwrap();
        config.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "api_key = sk\ndefault_model = gpt-4o-mini\nmodels = gpt-4o-mini"
        );
    }

    #[test]
    fn save_leaves_lookalike_keys_alone() {
        let (_dir, path) = write_document(
            "api_key = sk\nmodels_backup = a, b\n# models = old\nmodels = a\n",
        );
        let mut config = Configuration::load(&path).unwrap();
        config.add_model("b").unwrap();
        config.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "api_key = sk\nmodels_backup = a, b\n# models = old\nmodels = a, b\ndefault_model = b\n"
        );
    }

    #[test]
    fn patch_keeps_crlf_line_endings() {
        let mut document = RawDocument::parse("api_key = sk\r\nmodels = a\r\n");
        let config = Configuration::new("sk").with_models(vec!["a".into(), "b".into()]);
        config.patch(&mut document);
        assert_eq!(
            document.to_string(),
            "api_key = sk\r\nmodels = a, b\r\ndefault_model = a\n"
        );
    }

    #[test]
    fn raw_document_round_trips_text() {
        for text in ["", "\n", "a", "a\n", "a\n\n# c\n  b = 1\n"] {
            assert_eq!(RawDocument::parse(text).to_string(), text);
        }
        let document = RawDocument::parse("a\r\n\n  b = 1");
        assert_eq!(document.lines().collect::<Vec<_>>(), vec!["a\r", "", "  b = 1"]);
        assert_eq!(document.entries().collect::<Vec<_>>(), vec![("b", "1")]);
    }

    #[test]
    fn add_model_on_empty_list_sets_default() {
        let mut config = Configuration::new("sk").with_models(vec![]);
        assert_eq!(config.default_model, "");
        config.add_model("  fresh  ").unwrap();
        assert_eq!(config.models, vec!["fresh"]);
        assert_eq!(config.default_model, "fresh");
    }

    #[test]
    fn add_duplicate_model_leaves_state_unchanged() {
        let mut config = Configuration::new("sk").with_models(vec!["a".into(), "b".into()]);
        let before = config.clone();
        let err = config.add_model("b").unwrap_err();
        assert!(matches!(err, Error::DuplicateModel { .. }));
        assert_eq!(config, before);
        assert!(config.add_model("   ").is_err());
        assert_eq!(config, before);
    }

    #[test]
    fn add_model_rejects_names_that_do_not_read_back() {
        let mut config = Configuration::new("sk").with_models(vec!["a".into()]);
        let before = config.clone();
        for name in ["b,c", "'q'", "\"q", "q'", "b\nc", "b\rc"] {
            let err = config.add_model(name).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{name:?}: {err}");
            assert_eq!(config, before);
        }
    }

    #[test]
    fn added_models_survive_save_and_load() {
        let (_dir, path) = write_document("api_key = sk\nmodels = a\n");
        let mut config = Configuration::load(&path).unwrap();
        for name in ["vendor/model:tag", "it's-q", "x=y", "with space"] {
            config.add_model(name).unwrap();
        }
        config.save(&path).unwrap();
        let reloaded = Configuration::load(&path).unwrap();
        assert_eq!(
            reloaded.models,
            vec!["a", "vendor/model:tag", "it's-q", "x=y", "with space"]
        );
        assert_eq!(reloaded.default_model, config.default_model);
    }

    #[test]
    fn set_default_model_rejects_unknown_names() {
        let mut config = Configuration::new("sk").with_models(vec!["a".into(), "b".into()]);
        let err = config.set_default_model("c").unwrap_err();
        assert!(matches!(err, Error::UnknownModel { .. }));
        assert_eq!(config.default_model, "a");
        config.set_default_model("b").unwrap();
        assert_eq!(config.default_model, "b");
    }

    #[test]
    fn remove_default_model_promotes_first_remaining() {
        let mut config =
            Configuration::new("sk").with_models(vec!["a".into(), "b".into(), "c".into()]);
        config.set_default_model("b").unwrap();
        assert_eq!(config.remove_model(1).unwrap(), "b");
        assert_eq!(config.models, vec!["a", "c"]);
        assert_eq!(config.default_model, "a");
    }

    #[test]
    fn remove_non_default_model_keeps_default() {
        let mut config =
            Configuration::new("sk").with_models(vec!["a".into(), "b".into(), "c".into()]);
        config.set_default_model("b").unwrap();
        config.remove_model(2).unwrap();
        assert_eq!(config.default_model, "b");
    }

    #[test]
    fn remove_last_model_clears_default() {
        let mut config = Configuration::new("sk").with_models(vec!["only".into()]);
        config.remove_model(0).unwrap();
        assert!(config.models.is_empty());
        assert_eq!(config.default_model, "");
    }

    #[test]
    fn remove_out_of_range_is_rejected() {
        let mut config = Configuration::new("sk").with_models(vec!["a".into()]);
        let before = config.clone();
        let err = config.remove_model(1).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(config, before);
    }
}
