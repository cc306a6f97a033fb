use std::{
    cell::RefCell,
    collections::HashMap,
    io::{BufRead, Write},
    rc::Rc,
};

use ahorro_prefs::{
    CollapseEntry, CollapseStore, Host, ManualAppearance, ParsePreferenceError, Preference,
    PreferenceStore, Subscription,
};

use crate::{app::write_theme, config::AppConfig, error::Result};

const HELP: &str = "\
commands:
  theme show | theme set <light|dark|system> | theme toggle
  panel <key> show [true|false]   (the default only counts the first time)
  panel <key> toggle
  panel <key> set <true|false>
  os <light|dark|none>
  help | quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SessionAction {
    ThemeShow,
    ThemeSet(Preference),
    ThemeToggle,
    PanelShow { key: String, default: bool },
    PanelToggle(String),
    PanelSet { key: String, collapsed: bool },
    Os(Option<bool>),
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("expected true or false, got \"{0}\"")]
    InvalidFlag(String),
    #[error("expected light, dark or none, got \"{0}\"")]
    InvalidAppearance(String),
    #[error(transparent)]
    InvalidTheme(#[from] ParsePreferenceError),
}

type ParseResult<T> = std::result::Result<T, ParseError>;

fn parse_flag(raw: &str) -> ParseResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ParseError::InvalidFlag(raw.to_string())),
    }
}

/// Parses one line typed during a session.
pub(crate) fn parse_line(line: &str) -> ParseResult<SessionAction> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(SessionAction::Nothing);
    };

    match command.to_ascii_lowercase().as_str() {
        "theme" => match words.next() {
            None | Some("show") => Ok(SessionAction::ThemeShow),
            Some("toggle") => Ok(SessionAction::ThemeToggle),
            Some("set") => {
                let raw = words.next().ok_or(ParseError::Missing("theme"))?;
                Ok(SessionAction::ThemeSet(raw.parse()?))
            }
            Some(other) => Err(ParseError::Unknown(format!("theme {other}"))),
        },
        "panel" => {
            let key = words.next().ok_or(ParseError::Missing("panel key"))?.to_string();
            match words.next() {
                None | Some("show") => {
                    let default = words.next().map(parse_flag).transpose()?.unwrap_or(false);
                    Ok(SessionAction::PanelShow { key, default })
                }
                Some("toggle") => Ok(SessionAction::PanelToggle(key)),
                Some("set") => {
                    let raw = words.next().ok_or(ParseError::Missing("panel state"))?;
                    let collapsed = parse_flag(raw)?;
                    Ok(SessionAction::PanelSet { key, collapsed })
                }
                Some(other) => Err(ParseError::Unknown(format!("panel {other}"))),
            }
        }
        "os" => {
            let raw = words.next().ok_or(ParseError::Missing("appearance"))?;
            match raw.to_ascii_lowercase().as_str() {
                "dark" => Ok(SessionAction::Os(Some(true))),
                "light" => Ok(SessionAction::Os(Some(false))),
                "none" => Ok(SessionAction::Os(None)),
                _ => Err(ParseError::InvalidAppearance(raw.to_string())),
            }
        }
        "help" | "?" => Ok(SessionAction::Help),
        "quit" | "exit" => Ok(SessionAction::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

/// One interactive session. Panel state is kept in the host's session
/// storage and forgotten when the process exits.
///
/// Each panel is read once, on first mention; the default given then wins
/// for the rest of the session.
pub struct Session {
    theme: PreferenceStore,
    panels: CollapseStore,
    entries: HashMap<String, CollapseEntry>,
    appearance: ManualAppearance,
    notices: Rc<RefCell<Vec<String>>>,
    _view: Subscription,
}

impl Session {
    pub fn new(host: &Host, config: &AppConfig, appearance: ManualAppearance) -> Self {
        let notices: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&notices);
        let view = match host.document() {
            Some(document) => document.on_theme_change(move |theme| {
                sink.borrow_mut().push(format!("theme is now {theme}"));
            }),
            None => Subscription::inert(),
        };

        let theme = PreferenceStore::with_key(host, &config.theme_key);
        theme.initialize();

        Self {
            theme,
            panels: CollapseStore::with_prefix(host, &config.collapse_prefix),
            entries: HashMap::new(),
            appearance,
            notices,
            _view: view,
        }
    }

    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        self.flush_notices(out)?;

        for line in input.lines() {
            let line = line?;
            match parse_line(&line) {
                Ok(action) => {
                    let keep_going = self.execute(action, out)?;
                    self.flush_notices(out)?;
                    if !keep_going {
                        break;
                    }
                }
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }

        self.theme.teardown();
        tracing::info!(panels = self.entries.len(), "session ended");
        Ok(())
    }

    fn panel(&mut self, key: &str, default: bool) -> &CollapseEntry {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| self.panels.entry(key, default))
    }

    fn execute(&mut self, action: SessionAction, out: &mut impl Write) -> Result<bool> {
        match action {
            SessionAction::ThemeShow => write_theme(out, &self.theme)?,
            SessionAction::ThemeSet(preference) => self.theme.apply(preference),
            SessionAction::ThemeToggle => {
                self.theme.toggle();
            }
            SessionAction::PanelShow { key, default } => {
                let collapsed = self.panel(&key, default).is_collapsed();
                write_panel(out, &key, collapsed)?;
            }
            SessionAction::PanelToggle(key) => {
                let collapsed = self.panel(&key, false).toggle();
                write_panel(out, &key, collapsed)?;
            }
            SessionAction::PanelSet { key, collapsed } => {
                self.panel(&key, collapsed).set(collapsed);
                write_panel(out, &key, collapsed)?;
            }
            SessionAction::Os(prefers_dark) => self.appearance.set(prefers_dark),
            SessionAction::Help => writeln!(out, "{HELP}")?,
            SessionAction::Quit => return Ok(false),
            SessionAction::Nothing => {}
        }
        Ok(true)
    }

    fn flush_notices(&self, out: &mut impl Write) -> Result<()> {
        for notice in self.notices.borrow_mut().drain(..) {
            writeln!(out, "{notice}")?;
        }
        Ok(())
    }
}

fn write_panel(out: &mut impl Write, key: &str, collapsed: bool) -> std::io::Result<()> {
    let state = if collapsed { "collapsed" } else { "expanded" };
    writeln!(out, "panel {key}: {state}")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use ahorro_prefs::{Document, MemoryStorage};

    use super::*;

    #[test]
    fn parse_theme_commands() {
        assert_eq!(parse_line("theme").unwrap(), SessionAction::ThemeShow);
        assert_eq!(parse_line("theme toggle").unwrap(), SessionAction::ThemeToggle);
        assert_eq!(
            parse_line("  theme   set  System ").unwrap(),
            SessionAction::ThemeSet(Preference::System)
        );
    }

    #[test]
    fn parse_theme_set_requires_a_value() {
        assert_eq!(
            parse_line("theme set"),
            Err(ParseError::Missing("theme"))
        );
        assert!(matches!(
            parse_line("theme set sepia"),
            Err(ParseError::InvalidTheme(_))
        ));
    }

    #[test]
    fn parse_panel_commands() {
        assert_eq!(
            parse_line("panel widget_goals").unwrap(),
            SessionAction::PanelShow {
                key: "widget_goals".to_string(),
                default: false
            }
        );
        assert_eq!(
            parse_line("panel goals show true").unwrap(),
            SessionAction::PanelShow {
                key: "goals".to_string(),
                default: true
            }
        );
        assert_eq!(
            parse_line("panel goals toggle").unwrap(),
            SessionAction::PanelToggle("goals".to_string())
        );
        assert_eq!(
            parse_line("panel goals set no").unwrap(),
            SessionAction::PanelSet {
                key: "goals".to_string(),
                collapsed: false
            }
        );
    }

    #[test]
    fn parse_panel_errors() {
        assert_eq!(parse_line("panel"), Err(ParseError::Missing("panel key")));
        assert_eq!(
            parse_line("panel goals set maybe"),
            Err(ParseError::InvalidFlag("maybe".to_string()))
        );
        assert_eq!(
            parse_line("panel goals fold"),
            Err(ParseError::Unknown("panel fold".to_string()))
        );
    }

    #[test]
    fn parse_os_and_misc() {
        assert_eq!(parse_line("os dark").unwrap(), SessionAction::Os(Some(true)));
        assert_eq!(parse_line("os none").unwrap(), SessionAction::Os(None));
        assert_eq!(
            parse_line("os sepia"),
            Err(ParseError::InvalidAppearance("sepia".to_string()))
        );
        assert_eq!(parse_line("").unwrap(), SessionAction::Nothing);
        assert_eq!(parse_line("EXIT").unwrap(), SessionAction::Quit);
        assert_eq!(
            parse_line("dance"),
            Err(ParseError::Unknown("dance".to_string()))
        );
    }

    fn run(script: &str, prefers_dark: Option<bool>) -> String {
        let appearance = ManualAppearance::new(prefers_dark);
        let host = Host::builder()
            .durable(Rc::new(MemoryStorage::new()))
            .session(Rc::new(MemoryStorage::new()))
            .appearance(Rc::new(appearance.clone()))
            .document(Document::new())
            .build();
        let mut session = Session::new(&host, &AppConfig::default(), appearance);

        let mut out = Vec::new();
        session.run(Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn session_follows_os_until_pinned() {
        let output = run("os dark\ntheme set light\nos light\nos dark\ntheme show\n", Some(false));
        assert_eq!(
            output,
            "theme is now light\n\
             theme is now dark\n\
             theme is now light\n\
             theme: light (stored: light)\n"
        );
    }

    #[test]
    fn first_panel_default_wins() {
        let output = run("panel goals
panel goals show true
", None);
        assert_eq!(
            output,
            "theme is now light
             panel goals: expanded
             panel goals: expanded
"
        );
    }

    #[test]
    fn session_toggle_flips_the_theme() {
        let output = run("theme toggle
theme toggle
", Some(true));
        assert_eq!(
            output,
            "theme is now dark
             theme is now light
             theme is now dark
"
        );
    }

    #[test]
    fn session_panels() {
        let output = run(
            "panel widget_goals\npanel widget_goals toggle\npanel widget_goals show false\nbogus\nquit\npanel widget_goals\n",
            None,
        );
        assert_eq!(
            output,
            "theme is now light\n\
             panel widget_goals: expanded\n\
             panel widget_goals: collapsed\n\
             panel widget_goals: collapsed\n\
             error: unknown command: bogus\n"
        );
    }
}
