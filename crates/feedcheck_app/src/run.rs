//! Runs the two independent flows back to back. A failing flow is logged and
//! recorded; it never stops the next one.

use anyhow::{anyhow, Context};
use feedcheck_core::Item;
use feedcheck_engine::{
    run_feed_sort_flow, run_login_flow, Credentials, FeedScript, FeedSortReport, LoginScript,
    ReplayFeed, ReplayFixture, ReplaySession, FEED_SORT_FLOW, LOGIN_FLOW,
};
use feedcheck_logging::{check_error, check_info, FlowGuard};

use crate::cli::Cli;
use crate::config::CheckConfig;
use crate::summary::{FlowStatus, RunSummary};

pub async fn run(cli: &Cli, config: &CheckConfig) -> anyhow::Result<RunSummary> {
    let fixture = ReplayFixture::load(&cli.fixture).context("loading replay fixture")?;

    let feed_sort = if cli.skip_feed {
        FlowStatus::Skipped
    } else {
        feed_sort_check(fixture.feed, config).await
    };
    let login = if cli.skip_login {
        FlowStatus::Skipped
    } else {
        login_check(fixture.login, cli, config).await
    };

    Ok(RunSummary { feed_sort, login })
}

async fn feed_sort_check(script: FeedScript, config: &CheckConfig) -> FlowStatus {
    let mut feed = ReplayFeed::new(script);
    match run_feed_sort_flow(&mut feed, &config.feed_sort_settings()).await {
        Ok(report) => {
            let _flow = FlowGuard::enter(FEED_SORT_FLOW);
            log_preview(&report, config.preview_count);
            match report.verdict.violation() {
                None => FlowStatus::Passed,
                Some(violation) => FlowStatus::Failed(format!("items are not sorted: {violation}")),
            }
        }
        Err(err) => failed(FEED_SORT_FLOW, err.into()),
    }
}

async fn login_check(script: LoginScript, cli: &Cli, config: &CheckConfig) -> FlowStatus {
    let Some(credentials) = credentials(cli) else {
        return failed(
            LOGIN_FLOW,
            anyhow!("no credentials; set FEEDCHECK_USERNAME and FEEDCHECK_PASSWORD"),
        );
    };
    let mut session = ReplaySession::new(script);
    match run_login_flow(&mut session, &credentials, &config.retry_settings()).await {
        Ok(_) => FlowStatus::Passed,
        Err(err) => failed(LOGIN_FLOW, err.into()),
    }
}

fn credentials(cli: &Cli) -> Option<Credentials> {
    match (&cli.username, &cli.password) {
        (Some(username), Some(password)) => Some(Credentials::new(username, password)),
        _ => None,
    }
}

fn failed(flow: &'static str, err: anyhow::Error) -> FlowStatus {
    let _flow = FlowGuard::enter(flow);
    let err = err.context(format!("{flow} flow failed"));
    check_error!("Test failed: {:#}", err);
    check_error!("Diagnostic trace: {:?}", err);
    FlowStatus::Failed(format!("{err:#}"))
}

fn log_preview(report: &FeedSortReport, count: usize) {
    check_info!(
        "Collected {} items over {} pages ({})",
        report.collection.items.len(),
        report.collection.pages_visited,
        report.collection.stop_reason
    );
    check_info!("First {} items:", count);
    report.head(count).iter().for_each(log_item);
    check_info!("Last {} items:", count);
    report.tail(count).iter().for_each(log_item);
}

fn log_item(item: &Item) {
    check_info!("  {} {:?} ({})", item.id, item.title, item.age);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const FIXTURE: &str = r#"{
        "feed": {
            "pages": [
                [
                    { "id": "3", "title": "C", "age": "1 minute ago" },
                    { "id": "2", "title": "B", "age": "2 hours ago" }
                ],
                [
                    { "id": "1", "title": "A", "age": "1 day ago" }
                ]
            ]
        },
        "login": {
            "observations": [
                { "rate_limited": true },
                { "rate_limited": false }
            ]
        }
    }"#;

    fn write_fixture(dir: &Path, json: &str) -> String {
        let path = dir.join("fixture.json");
        fs::write(&path, json).unwrap();
        path.display().to_string()
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("feedcheck").chain(args.iter().copied()))
    }

    #[tokio::test]
    async fn both_flows_pass_on_clean_fixture() {
        let temp = TempDir::new().unwrap();
        let fixture = write_fixture(temp.path(), FIXTURE);
        let cli = cli(&["--fixture", &fixture, "--username", "u", "--password", "p"]);

        let summary = run(&cli, &CheckConfig::default()).await.unwrap();

        assert_eq!(summary.feed_sort, FlowStatus::Passed);
        assert_eq!(summary.login, FlowStatus::Passed);
        assert!(summary.all_passed());
    }

    #[tokio::test]
    async fn login_failure_does_not_affect_feed_result() {
        let temp = TempDir::new().unwrap();
        let fixture = write_fixture(
            temp.path(),
            &FIXTURE.replace(r#"{ "rate_limited": false }"#, r#"{ "rate_limited": true }"#),
        );
        let cli = cli(&["--fixture", &fixture, "--username", "u", "--password", "p"]);

        let summary = run(&cli, &CheckConfig::default()).await.unwrap();

        assert_eq!(summary.feed_sort, FlowStatus::Passed);
        match &summary.login {
            FlowStatus::Failed(reason) => assert!(reason.contains("max retries reached")),
            other => panic!("unexpected status {other:?}"),
        }
        assert!(!summary.all_passed());
    }

    #[tokio::test]
    async fn unsorted_feed_fails_its_flow() {
        let temp = TempDir::new().unwrap();
        let fixture = write_fixture(temp.path(), &FIXTURE.replace("1 day ago", "1 minute ago"));
        let cli = cli(&["--fixture", &fixture, "--skip-login"]);

        let summary = run(&cli, &CheckConfig::default()).await.unwrap();

        match &summary.feed_sort {
            FlowStatus::Failed(reason) => assert!(reason.starts_with("items are not sorted")),
            other => panic!("unexpected status {other:?}"),
        }
        assert_eq!(summary.login, FlowStatus::Skipped);
    }

    #[tokio::test]
    async fn missing_credentials_fail_only_the_login_flow() {
        let temp = TempDir::new().unwrap();
        let fixture = write_fixture(temp.path(), FIXTURE);
        let mut cli = cli(&["--fixture", &fixture]);
        cli.username = None;
        cli.password = None;

        let summary = run(&cli, &CheckConfig::default()).await.unwrap();

        assert_eq!(summary.feed_sort, FlowStatus::Passed);
        assert!(matches!(summary.login, FlowStatus::Failed(_)));
    }

    #[tokio::test]
    async fn missing_fixture_aborts_the_run() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.json").display().to_string();
        let cli = cli(&["--fixture", &missing]);

        let err = run(&cli, &CheckConfig::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("loading replay fixture"));
    }
}
