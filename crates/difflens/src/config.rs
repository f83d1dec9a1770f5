#![forbid(unsafe_code)]

//! Environment configuration.
//!
//! | variable | meaning | default |
//! |----------|---------|---------|
//! | `DIFFLENS_WIDTH` | terminal width the diff is rendered for | terminal `COLUMNS`, else 120 |
//! | `DIFFLENS_LAYOUT` | `split` or `unified` | `unified` |
//! | `DIFFLENS_DARK` | force dark (`1`) or light (`0`) colors | detected from `COLORFGBG` |
//! | `DIFFLENS_COLOR` | emit SGR codes | `1` |
//! | `DIFFLENS_COMMAND` | diff program used by `--run` | `difft` |
//! | `DIFFLENS_STYLE_<CLASS>` | style for a color class (`name:Group`, `#rrggbb[/#rrggbb]`, `link:Group[:bg]`) | theme default |
//!
//! Invalid values are reported as diagnostics and the default is kept.

use std::env;
use std::fmt;

use difflens_style::{ColorClass, DiffTheme, StyleRef, themes};

pub const ENV_WIDTH: &str = "DIFFLENS_WIDTH";
pub const ENV_LAYOUT: &str = "DIFFLENS_LAYOUT";
pub const ENV_DARK: &str = "DIFFLENS_DARK";
pub const ENV_COLOR: &str = "DIFFLENS_COLOR";
pub const ENV_COMMAND: &str = "DIFFLENS_COMMAND";

/// `(class, env variable, field name)` for per-class style overrides.
pub const STYLE_VARS: [(ColorClass, &str, &str); 7] = [
    (ColorClass::Add, "DIFFLENS_STYLE_ADD", "style_add"),
    (ColorClass::Delete, "DIFFLENS_STYLE_DELETE", "style_delete"),
    (ColorClass::Change, "DIFFLENS_STYLE_CHANGE", "style_change"),
    (ColorClass::Info, "DIFFLENS_STYLE_INFO", "style_info"),
    (ColorClass::Hint, "DIFFLENS_STYLE_HINT", "style_hint"),
    (ColorClass::Dim, "DIFFLENS_STYLE_DIM", "style_dim"),
    (ColorClass::Neutral, "DIFFLENS_STYLE_NEUTRAL", "style_neutral"),
];

const DEFAULT_WIDTH: usize = 120;
const MIN_WIDTH: usize = 20;
const DEFAULT_COMMAND: &str = "difft";

/// How the diff is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Lines as difftastic printed them.
    #[default]
    Unified,
    /// Side-by-side sections split into two columns.
    Split,
}

impl Layout {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unified" | "inline" => Some(Self::Unified),
            "split" | "side-by-side" => Some(Self::Split),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unified => "unified",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Terminal width the diff was (or will be) rendered for.
    pub width: usize,
    pub layout: Layout,
    /// `None` means detect from the terminal.
    pub dark: Option<bool>,
    pub color: bool,
    pub command: String,
    /// Per-class overrides applied on top of the base theme.
    pub styles: Vec<(ColorClass, StyleRef)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            layout: Layout::Unified,
            dark: None,
            color: true,
            command: DEFAULT_COMMAND.to_string(),
            styles: Vec::new(),
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: Config,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(
        field: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Config {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.width < MIN_WIDTH {
            errors.push(ConfigError::new(
                "width",
                self.width.to_string(),
                format!("must be >= {MIN_WIDTH}"),
            ));
        }
        if self.command.trim().is_empty() {
            errors.push(ConfigError::new(
                "command",
                self.command.clone(),
                "must not be empty",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Set or replace the style override for a class.
    pub fn set_style(&mut self, class: ColorClass, style: StyleRef) {
        match self.styles.iter_mut().find(|(c, _)| *c == class) {
            Some(slot) => slot.1 = style,
            None => self.styles.push((class, style)),
        }
    }

    /// Whether dark colors are used, detecting when not configured.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.dark.unwrap_or_else(DiffTheme::detect_dark_mode)
    }

    /// Base theme for the color mode with every override applied.
    #[must_use]
    pub fn theme(&self) -> DiffTheme {
        let mut theme = themes::for_mode(self.is_dark());
        for (class, style) in &self.styles {
            theme.set_style(*class, style.clone());
        }
        theme
    }
}

pub(crate) fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = Config::default();
    let mut errors = Vec::new();

    if let Some(value) = get("COLUMNS")
        && let Some(parsed) = parse_usize(&value)
        && parsed >= MIN_WIDTH
    {
        config.width = parsed;
    }

    if let Some(value) = get(ENV_WIDTH) {
        match parse_usize(&value) {
            Some(parsed) if parsed >= MIN_WIDTH => config.width = parsed,
            _ => errors.push(ConfigError::new(
                "width",
                value,
                format!("expected integer >= {MIN_WIDTH}"),
            )),
        }
    }

    if let Some(value) = get(ENV_LAYOUT) {
        match Layout::parse(&value) {
            Some(parsed) => config.layout = parsed,
            None => errors.push(ConfigError::new("layout", value, "expected split|unified")),
        }
    }

    if let Some(value) = get(ENV_DARK) {
        match parse_bool(&value) {
            Some(parsed) => config.dark = Some(parsed),
            None => errors.push(ConfigError::new(
                "dark",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_COLOR) {
        match parse_bool(&value) {
            Some(parsed) => config.color = parsed,
            None => errors.push(ConfigError::new(
                "color",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_COMMAND) {
        if value.trim().is_empty() {
            errors.push(ConfigError::new("command", value, "must not be empty"));
        } else {
            config.command = value.trim().to_string();
        }
    }

    for (class, key, field) in STYLE_VARS {
        let Some(value) = get(key) else {
            continue;
        };
        match value.parse::<StyleRef>() {
            Ok(style) => config.set_style(class, style),
            Err(err) => errors.push(ConfigError::new(field, value, err.message)),
        }
    }

    if let Err(mut validation) = config.validate() {
        errors.append(&mut validation);
    }

    ConfigParse { config, errors }
}

#[inline]
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
