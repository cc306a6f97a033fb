use ahorro_prefs::{DEFAULT_COLLAPSE_PREFIX, DEFAULT_THEME_KEY, Preference, ResolvedPreference};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/ahorro.toml";
const DEFAULT_STATE_PATH: &str = "config/ahorro_state.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Durable storage file for the theme preference.
    pub state_path: String,
    pub theme_key: String,
    pub collapse_prefix: String,
    /// What the OS reports; `None` when it reports nothing.
    pub system_appearance: Option<ResolvedPreference>,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_path: DEFAULT_STATE_PATH.to_string(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
            collapse_prefix: DEFAULT_COLLAPSE_PREFIX.to_string(),
            system_appearance: None,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ahorro", disable_version_flag = true)]
#[command(about = "Theme and panel preferences for Ahorro Invisible")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the durable state file.
    #[arg(long)]
    state_path: Option<String>,
    /// Override the OS appearance (light or dark).
    #[arg(long)]
    system_appearance: Option<ResolvedPreference>,
    /// Override the log level (e.g. debug).
    #[arg(long, env = "AHORRO_LOG")]
    level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read or change the persisted theme.
    Theme(Theme),
    /// Interactive session over stdin; panel state lives until it ends.
    Session,
}

#[derive(Debug, ClapArgs)]
pub struct Theme {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the stored and resolved theme.
    Show,
    /// Store a preference: light, dark or system.
    Set { preference: Preference },
    /// Flip between light and dark.
    Toggle,
}

pub fn load() -> Result<(AppConfig, Command)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("AHORRO"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }
    if let Some(system_appearance) = args.system_appearance {
        settings.system_appearance = Some(system_appearance);
    }
    if let Some(level) = args.level {
        settings.level = level;
    }

    Ok((settings, args.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stores() {
        let config = AppConfig::default();
        assert_eq!(config.theme_key, "theme");
        assert_eq!(config.collapse_prefix, "collapse");
        assert_eq!(config.system_appearance, None);
    }

    #[test]
    fn args_parse_theme_set() {
        let args = Args::try_parse_from(["ahorro", "theme", "set", "system"]).unwrap();
        match args.command {
            Command::Theme(Theme {
                command: ThemeCommand::Set { preference },
            }) => assert_eq!(preference, Preference::System),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn args_reject_unknown_theme() {
        assert!(Args::try_parse_from(["ahorro", "theme", "set", "sepia"]).is_err());
    }

    #[test]
    fn args_parse_system_appearance() {
        let args =
            Args::try_parse_from(["ahorro", "--system-appearance", "dark", "session"]).unwrap();
        assert_eq!(args.system_appearance, Some(ResolvedPreference::Dark));
        assert!(matches!(args.command, Command::Session));
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "state_path = \"/tmp/a.json\"\nsystem_appearance = \"dark\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.state_path, "/tmp/a.json");
        assert_eq!(settings.system_appearance, Some(ResolvedPreference::Dark));
        assert_eq!(settings.level, "info");
    }
}
