use std::{
    io::{self, Write},
    rc::Rc,
};

use ahorro_prefs::{
    Document, FileStorage, Host, ManualAppearance, MemoryStorage, PreferenceStore,
    ResolvedPreference,
};

use crate::{
    config::{AppConfig, Command, ThemeCommand},
    error::Result,
    session::Session,
};

pub struct App {
    config: AppConfig,
    appearance: ManualAppearance,
    host: Host,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let appearance = ManualAppearance::new(
            config
                .system_appearance
                .map(|theme| theme == ResolvedPreference::Dark),
        );
        let host = Host::builder()
            .durable(Rc::new(FileStorage::new(&config.state_path)))
            .session(Rc::new(MemoryStorage::new()))
            .appearance(Rc::new(appearance.clone()))
            .document(Document::new())
            .build();
        tracing::debug!(?host, state_path = %config.state_path, "host ready");

        Self {
            config,
            appearance,
            host,
        }
    }

    pub fn run(&self, command: Command) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match command {
            Command::Theme(theme) => self.run_theme(theme.command, &mut out),
            Command::Session => {
                let stdin = io::stdin();
                let mut session = Session::new(&self.host, &self.config, self.appearance.clone());
                session.run(stdin.lock(), &mut out)
            }
        }
    }

    fn run_theme(&self, command: ThemeCommand, out: &mut impl Write) -> Result<()> {
        let store = PreferenceStore::with_key(&self.host, &self.config.theme_key);
        match command {
            ThemeCommand::Show => {}
            ThemeCommand::Set { preference } => store.apply(preference),
            ThemeCommand::Toggle => {
                store.toggle();
            }
        }
        write_theme(out, &store)?;
        Ok(())
    }
}

pub(crate) fn write_theme(out: &mut impl Write, store: &PreferenceStore) -> io::Result<()> {
    let stored = store
        .stored()
        .map_or_else(|| "unset".to_string(), |preference| preference.to_string());
    writeln!(out, "theme: {} (stored: {stored})", store.resolve_current())
}

#[cfg(test)]
mod tests {
    use ahorro_prefs::Preference;

    use super::*;

    #[test]
    fn write_theme_reports_stored_and_resolved() {
        let appearance = ManualAppearance::new(Some(true));
        let host = Host::builder()
            .durable(Rc::new(MemoryStorage::new()))
            .appearance(Rc::new(appearance))
            .build();
        let store = PreferenceStore::new(&host);

        let mut out = Vec::new();
        write_theme(&mut out, &store).unwrap();
        store.apply(Preference::System);
        write_theme(&mut out, &store).unwrap();
        store.apply(Preference::Light);
        write_theme(&mut out, &store).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "theme: dark (stored: unset)\n\
             theme: dark (stored: system)\n\
             theme: light (stored: light)\n"
        );
    }
}
