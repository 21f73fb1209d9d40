mod cli;

use habitflow::coach::anthropic::AnthropicClient;
use habitflow::coach::{Coach, keyring};
use habitflow::config::{HabitflowConfig, Preferences};
use habitflow::report;
use habitflow::session::Session;
use habitflow::storage::DirStore;

use clap::Parser;

use cli::{Cli, Command};

type AppResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Log to the systemd user journal (`journalctl --user -t habitflow -f`).
/// habitflow targets log at info, or debug when enabled; everything else at warn.
fn init_logging() {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("habitflow") {
                let max = if habitflow::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }

        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("habitflow".to_string()),
        Err(e) => {
            eprintln!("habitflow: journal logging unavailable: {}", e);
            return;
        }
    };

    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = HabitflowConfig::load();
    habitflow::set_debug_logging(config.debug_logging || cli.debug);
    init_logging();

    if let Err(e) = run(cli.command.unwrap_or(Command::List), &config).await {
        log::error!("{}", e);
        eprintln!("habitflow: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &HabitflowConfig) -> AppResult {
    let store = config.store();
    log::debug!("Data directory: {}", store.dir().display());
    let mut session = Session::open(store);
    let today = session.today();

    match command {
        Command::List => print!("{}", report::habit_list(session.habits(), today)),
        Command::Add(args) => {
            let habit = session.add(args.into_draft());
            println!("Added {} ({})", habit.name, habit.id);
        }
        Command::Toggle { habit, date } => {
            let id = resolve(&session, &cli::joined(&habit))?;
            let day = date.unwrap_or(today);
            if let Some(h) = session.toggle_on(id, day) {
                let state = if h.is_completed_on(day) { "done" } else { "not done" };
                println!("{}: {} on {} ({}d streak)", h.name, state, day, h.streak);
            }
        }
        Command::Remove { habit } => {
            let habit = cli::joined(&habit);
            let id = resolve(&session, &habit)?;
            session.remove(id);
            println!("Removed {}", habit);
        }
        Command::Stats => print!("{}", report::dashboard(&session.dashboard())),
        Command::Suggest { goal, accept } => {
            let coach = open_coach(config, session.preferences()).await?;
            let drafts = coach.suggest_habits(&cli::joined(&goal)).await?;
            print!("{}", report::suggestions(&drafts));

            let mut chosen = Vec::new();
            for n in accept {
                match drafts.get(n - 1) {
                    Some(draft) => chosen.push(draft.clone()),
                    None => return Err(format!("there is no suggestion {}", n).into()),
                }
            }
            for habit in session.accept_suggestions(chosen) {
                println!("Added {} ({})", habit.name, habit.id);
            }
        }
        Command::Insight => {
            let coach = open_coach(config, session.preferences()).await?;
            println!("{}", coach.weekly_insight(session.habits()).await?);
        }
        Command::Prefs {
            theme,
            dark,
            language,
        } => {
            let current = session.preferences();
            let prefs = Preferences {
                theme: theme.unwrap_or(current.theme),
                dark_mode: dark.unwrap_or(current.dark_mode),
                language: language.unwrap_or(current.language),
            };
            if prefs != current {
                session.set_preferences(prefs)?;
            }
            println!(
                "theme: {}\ndark mode: {}\nlanguage: {}",
                prefs.theme.as_str(),
                if prefs.dark_mode { "on" } else { "off" },
                prefs.language.as_str()
            );
        }
        Command::SetKey { key } => {
            keyring::store_api_key(&key).await?;
            println!("API key stored");
        }
        Command::TestKey => {
            let client = AnthropicClient::new(keyring::resolve_api_key().await?, &config.model);
            client.test_api_key().await?;
            println!("API key valid for {}", client.model());
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(
                    "this deletes every habit; run `habitflow reset --yes` to confirm".into(),
                );
            }
            session.reset();
            println!("All habits deleted");
        }
    }

    if let Some(e) = session.take_save_error() {
        return Err(e.into());
    }
    Ok(())
}

fn resolve(session: &Session<DirStore>, selector: &str) -> AppResult<uuid::Uuid> {
    session
        .store()
        .find(selector)
        .map(|h| h.id)
        .ok_or_else(|| format!("no single habit matches \"{}\"", selector).into())
}

async fn open_coach(
    config: &HabitflowConfig,
    prefs: Preferences,
) -> AppResult<Coach<AnthropicClient>> {
    let api_key = keyring::resolve_api_key().await?;
    Ok(Coach::new(AnthropicClient::new(api_key, &config.model), prefs.language))
}
