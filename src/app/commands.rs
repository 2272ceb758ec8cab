use std::path::PathBuf;

use anyhow::Context as _;
use clap::ArgMatches;
use loto_client::service::{RefreshOutcome, Session, refresh_history};
use loto_client::source::{CsvHistorySource, YeluHistorySource};
use loto_client::{DbPool, LotoConfig, create_pool};
use loto_combora::generator::GenerationRequest;

use super::cli::{DEFAULT_OWNER, apply_filter_args, split_owners};
use super::display;

/// Everything a command needs: settings, the store and the session on top.
pub struct App {
    config: LotoConfig,
    pool: DbPool,
    session: Session,
    json: bool,
}

impl App {
    pub fn new(config: LotoConfig, json: bool) -> anyhow::Result<Self> {
        let pool = create_pool(&config.database.url, config.database.pool_size)?;
        let session = Session::new(pool.clone(), config.clock.offset()?);
        Ok(Self {
            config,
            pool,
            session,
            json,
        })
    }

    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let path = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
        let config = LotoConfig::load(path)?;
        Self::new(config, matches.get_flag("json"))
    }

    pub async fn run(&mut self, matches: &ArgMatches) -> anyhow::Result<()> {
        match matches.subcommand() {
            Some(("sync", sub)) => self.sync(sub).await,
            Some(("generate", sub)) => self.generate(sub),
            Some(("syndicate", sub)) => self.syndicate(sub),
            Some(("oracle", _)) => self.oracle(),
            Some(("vault", _)) => self.vault(),
            Some(("frequency", _)) => self.frequency(),
            Some(("history", sub)) => self.history(sub),
            Some((name, _)) => anyhow::bail!("Unknown command {name}"),
            None => anyhow::bail!("No command given"),
        }
    }

    /// Generator request built from the config file and the filter flags.
    fn request(&self, sub: &ArgMatches) -> anyhow::Result<GenerationRequest> {
        let generator = apply_filter_args(sub, &self.config.generator);
        let request = generator
            .request(self.config.history.cutoff)
            .context("Invalid filter settings")?;
        Ok(request.with_seed(sub.get_one::<u64>("seed").copied()))
    }

    async fn sync(&self, sub: &ArgMatches) -> anyhow::Result<()> {
        let now = self.session.now();
        let history = &self.config.history;
        let outcome: RefreshOutcome = match sub.get_one::<String>("source").map(String::as_str) {
            Some("remote") => {
                let source = YeluHistorySource::new(
                    history.remote_url.as_str(),
                    history.cutoff,
                    now.date(),
                    history.timeout(),
                    history.request_pause(),
                )?;
                refresh_history(&self.pool, &source, now).await
            }
            _ => {
                let source = CsvHistorySource::new(history.csv_path.clone());
                refresh_history(&self.pool, &source, now).await
            }
        };

        if self.json {
            display::print_json(&outcome)?;
        } else {
            display::display_refresh(&outcome);
        }
        anyhow::ensure!(outcome.success, "History refresh failed");
        Ok(())
    }

    fn generate(&mut self, sub: &ArgMatches) -> anyhow::Result<()> {
        let owner = sub
            .get_one::<String>("owner")
            .map_or(DEFAULT_OWNER, String::as_str);
        let count = sub
            .get_one::<usize>("count")
            .copied()
            .unwrap_or(self.config.generator.count);
        let request = self.request(sub)?;

        let outcome = self.session.generate_for(&[owner], count, &request)?;
        if self.json {
            display::print_json(&outcome.entries)
        } else {
            display::display_play(&outcome);
            Ok(())
        }
    }

    fn syndicate(&mut self, sub: &ArgMatches) -> anyhow::Result<()> {
        let owners = split_owners(
            sub.get_one::<String>("owners")
                .map_or("", String::as_str),
        );
        anyhow::ensure!(!owners.is_empty(), "At least one owner is needed");
        let per_owner = sub.get_one::<usize>("per-owner").copied().unwrap_or(1);
        let request = self.request(sub)?;

        let outcome = self.session.generate_for(&owners, per_owner, &request)?;
        if self.json {
            display::print_json(&outcome.entries)
        } else {
            display::display_syndicate(&outcome, &owners);
            Ok(())
        }
    }

    fn oracle(&self) -> anyhow::Result<()> {
        let reports = self.session.detect();
        if self.json {
            display::print_json(&reports)
        } else {
            display::display_reports(&reports);
            Ok(())
        }
    }

    fn vault(&self) -> anyhow::Result<()> {
        let vault = self.session.vault();
        if self.json {
            display::print_json(&vault)
        } else {
            display::display_vault(&vault);
            Ok(())
        }
    }

    fn frequency(&self) -> anyhow::Result<()> {
        let table = self.session.frequency(self.config.history.cutoff);
        if self.json {
            display::print_json(&table)
        } else {
            display::display_frequency(&table);
            Ok(())
        }
    }

    fn history(&self, sub: &ArgMatches) -> anyhow::Result<()> {
        let last = sub.get_one::<i64>("last").copied().unwrap_or(30);
        let drawings = self.session.recent_history(last)?;
        if self.json {
            display::print_json(&drawings)
        } else {
            display::display_history(&drawings);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cli::cli;

    fn in_memory_app() -> App {
        let mut config = LotoConfig::default();
        config.database.url = ":memory:".to_owned();
        config.database.pool_size = 1;
        App::new(config, true).unwrap()
    }

    #[test]
    fn seed_flag_reaches_the_request() {
        let app = in_memory_app();
        let matches = cli()
            .try_get_matches_from(["loto", "generate", "--seed", "7", "--sum-max", "120"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        let request = app.request(sub).unwrap();
        assert_eq!(request.seed, Some(7));
        assert_eq!(request.sum_range.high(), 120);
        assert_eq!(request.cutoff, app.config.history.cutoff);
    }

    #[test]
    fn inverted_sum_range_is_refused() {
        let app = in_memory_app();
        let matches = cli()
            .try_get_matches_from(["loto", "generate", "--sum-min", "150", "--sum-max", "90"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(app.request(sub).is_err());
    }

    #[tokio::test]
    async fn syndicate_then_vault() {
        let mut app = in_memory_app();
        let matches = cli()
            .try_get_matches_from([
                "loto",
                "syndicate",
                "--owners",
                "Ana, Luis",
                "--per-owner",
                "2",
                "--seed",
                "3",
            ])
            .unwrap();
        app.run(&matches).await.unwrap();

        let vault = app.session.vault();
        assert_eq!(vault.len(), 4);
        assert!(vault.iter().all(|(_, marks)| marks.hits.is_empty()));
    }

    #[tokio::test]
    async fn sync_from_missing_csv_fails() {
        let mut app = in_memory_app();
        app.config.history.csv_path = PathBuf::from("does/not/exist.csv");
        let matches = cli().try_get_matches_from(["loto", "sync"]).unwrap();
        assert!(app.run(&matches).await.is_err());
    }
}
