//! Behaviour-driven step definitions driving the CLI command scenarios.

use super::helpers::{StubSourceBuilder, Workspace, sample_countries, written};
use super::*;
use crate::{
    history::HistoryConfig,
    reload::ReloadConfig,
    report::ReportConfig,
};
use popstat_core::{FetchError, RegionSummary, StoredCountry, test_support::point};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

struct CliWorld {
    workspace: Workspace,
    builder: RefCell<StubSourceBuilder>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            builder: RefCell::new(StubSourceBuilder::with_countries(Vec::new())),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn run(&self, argv: &[&str]) {
        let mut invocation: Vec<String> = vec!["popstat".to_owned()];
        invocation.extend(argv.iter().map(|arg| (*arg).to_owned()));
        invocation.extend([
            format!("--{ARG_DATABASE}"),
            self.workspace.database().as_str().to_owned(),
            format!("--{ARG_CONNECT_ATTEMPTS}"),
            "1".to_owned(),
            format!("--{ARG_CONNECT_DELAY_SECS}"),
            "0".to_owned(),
        ]);

        let builder = self.builder.borrow();
        let mut buffer = self.stdout.borrow_mut();
        buffer.clear();
        let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::Reload(args) => {
                reload::run_reload_with(&ReloadConfig::from(args), &*builder, &mut *buffer)
            }
            Command::Countries(args) => {
                report::run_report_with(&ReportConfig::from(args), &mut *buffer)
            }
            Command::Regions(args) => {
                report::run_report_with(&ReportConfig::from(args), &mut *buffer)
            }
            Command::Top(args) => report::run_report_with(&ReportConfig::from(args), &mut *buffer),
            Command::History(args) => HistoryConfig::try_from(args).and_then(|config| {
                history::run_history_with(&config, &*builder, &mut *buffer)
            }),
        });
        self.result.replace(Some(outcome));
    }

    fn stdout(&self) -> String {
        written(self.stdout.borrow().clone())
    }

    fn expect_success(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    }

    fn error_message(&self) -> String {
        let borrowed = self.result.borrow();
        borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error")
            .to_string()
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::new()
}

#[given("the country service returns three countries")]
fn service_returns_three_countries(#[from(world)] world: &CliWorld) {
    world
        .builder
        .replace(StubSourceBuilder::with_countries(sample_countries()));
}

#[given("the snapshot has been reloaded")]
fn snapshot_has_been_reloaded(#[from(world)] world: &CliWorld) {
    world
        .builder
        .replace(StubSourceBuilder::with_countries(sample_countries()));
    world.run(&["reload"]);
    world.expect_success();
}

#[given("the history service has two years for Kenya")]
fn history_has_two_years(#[from(world)] world: &CliWorld) {
    world.builder.replace(StubSourceBuilder::with_history(Ok(Some(vec![
        point("Kenya", 1990, 23_400_000),
        point("Kenya", 1991, 24_100_000),
    ]))));
}

#[given("the history service is unreachable")]
fn history_is_unreachable(#[from(world)] world: &CliWorld) {
    world
        .builder
        .replace(StubSourceBuilder::with_history(Err(FetchError::Network {
            url: "http://history.test".to_owned(),
            message: "connection refused".to_owned(),
        })));
}

#[when("I run the reload command")]
fn run_reload(#[from(world)] world: &CliWorld) {
    world.run(&["reload"]);
}

#[when("I run the regions command")]
fn run_regions(#[from(world)] world: &CliWorld) {
    world.run(&["regions"]);
}

#[when("I run the top command limited to one country")]
fn run_top_one(#[from(world)] world: &CliWorld) {
    world.run(&["top", "--limit", "1"]);
}

#[when("I run the history command for Kenya")]
fn run_history_kenya(#[from(world)] world: &CliWorld) {
    world.run(&["history", "Kenya"]);
}

#[when("I run the history command for Atlantis")]
fn run_history_atlantis(#[from(world)] world: &CliWorld) {
    world.run(&["history", "Atlantis"]);
}

#[then("the command reports three inserted countries")]
fn reports_three_inserted(#[from(world)] world: &CliWorld) {
    world.expect_success();
    let output: serde_json::Value = serde_json::from_str(&world.stdout()).expect("JSON output");
    assert_eq!(output["inserted"], 3);
}

#[then("Asia is listed before Africa")]
fn asia_before_africa(#[from(world)] world: &CliWorld) {
    world.expect_success();
    let summaries: Vec<RegionSummary> =
        serde_json::from_str(&world.stdout()).expect("regions JSON");
    let regions: Vec<&str> = summaries.iter().map(|s| s.region.as_str()).collect();
    assert_eq!(regions, ["Asia", "Africa"]);
}

#[then("only Japan is listed")]
fn only_japan_listed(#[from(world)] world: &CliWorld) {
    world.expect_success();
    let rows: Vec<StoredCountry> = serde_json::from_str(&world.stdout()).expect("rows JSON");
    let names: Vec<&str> = rows.iter().map(|row| row.record.name.as_str()).collect();
    assert_eq!(names, ["Japan"]);
}

#[then("the series is printed in year order")]
fn series_in_year_order(#[from(world)] world: &CliWorld) {
    world.expect_success();
    let output: serde_json::Value = serde_json::from_str(&world.stdout()).expect("JSON output");
    let years: Vec<i64> = output
        .as_array()
        .expect("series array")
        .iter()
        .filter_map(|point| point["year"].as_i64())
        .collect();
    assert_eq!(years, [1990, 1991]);
}

#[then("the command prints that no data is available for KE")]
fn prints_no_data(#[from(world)] world: &CliWorld) {
    world.expect_success();
    assert_eq!(world.stdout(), "no data available for KE\n");
}

#[then("the command fails naming the unknown country")]
fn fails_unknown_country(#[from(world)] world: &CliWorld) {
    let message = world.error_message();
    assert!(message.contains("Atlantis"), "unexpected message: {message}");
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/cli_commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(reload_prints_summary, "reloading prints the inserted count");
register_cli_scenario!(regions_after_reload, "summarising regions after a reload");
register_cli_scenario!(top_with_limit, "listing the most populous country");
register_cli_scenario!(history_prints_series, "printing a population history");
register_cli_scenario!(history_without_data, "reporting an unreachable history service");
register_cli_scenario!(history_unknown_country, "rejecting an unknown country name");
