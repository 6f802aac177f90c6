use fritz::Outcome;
use fritz::handlers::{build, develop, doc, prune, run, stop, testing, update};
use fritz::models::args::{ConfirmArgs, LaunchArgs, SourceArgs, StopArgs, TestArgs};
use fritz::services::launcher::Launcher;
use fritz::services::prompt::FixedAnswer;
use fritz_kernel::domain::config::{LauncherSettings, RetryPolicySettings, RetrySettings};
use fritz_kernel::health::HttpProbe;
use fritz_kernel::{KernelError, Project};
use fritz_process::{CommandOutput, ScriptedRunner};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const UNIFIED: &str = "\
skyportal:
  server:
    host: localhost
    port: 5000
  database:
    host: localhost
  app:
    kowalski:
      protocol: http
      host: localhost
      port: 4000
kowalski:
  server:
    admin_username: admin
    jwt_secret_key: abc0000000000000000000000000000000
    jwt_algorithm: HS256
  skyportal:
    host: localhost
";

const COMPOSE_TEMPLATE: &str = "\
services:
  web:
    image: skyportal/web
    volumes:
      - ${FRITZ_ROOT}/skyportal:/skyportal
    ports:
      - \"${FRITZ_PORT}:5000\"
";

const TOKEN: &str = "1b1c4d9e-7f3a-4c6b-9d2e-5a8f0c1e2b3d";

#[derive(Debug)]
struct StaticProbe(u16);

impl HttpProbe for StaticProbe {
    fn status(&self, _url: &str) -> Result<u16, KernelError> {
        Ok(self.0)
    }
}

fn fast_settings() -> LauncherSettings {
    let mut settings = LauncherSettings::default();
    settings.retry = RetrySettings {
        seed_data: RetryPolicySettings::new(3, 0),
        containers: RetryPolicySettings::new(10, 0),
        web_process: RetryPolicySettings::new(10, 0),
        health: RetryPolicySettings::new(10, 0),
    };
    settings
}

fn scaffold() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("fritz.yaml"), UNIFIED).unwrap();
    fs::write(root.join("docker-compose.defaults.yaml"), COMPOSE_TEMPLATE).unwrap();
    fs::write(root.join("docker-compose.traefik.yaml"), "services: {}\n").unwrap();
    fs::create_dir_all(root.join("kowalski")).unwrap();
    fs::write(root.join("kowalski/docker-compose.yaml"), "services: {}\n").unwrap();
    dir
}

fn healthy_host() -> ScriptedRunner {
    ScriptedRunner::new()
        .on("git --version", [CommandOutput::ok("git version 2.39.2\n")])
        .on("docker --version", [CommandOutput::ok("Docker version 24.0.7, build afdd53b\n")])
        .on("docker compose version", [CommandOutput::ok("Docker Compose version v2.20.2\n")])
        .on(
            "docker exec -i skyportal_web_1 cat",
            [CommandOutput::ok(format!("INITIAL_ADMIN: {TOKEN}\n"))],
        )
}

fn launcher<'a>(root: &Path, runner: &'a ScriptedRunner, probe: &'a StaticProbe) -> Launcher<'a> {
    Launcher::new(Project::new(root, fast_settings()), runner, probe, &FixedAnswer(false))
}

fn position(lines: &[String], needle: &str) -> usize {
    lines
        .iter()
        .position(|line| line.contains(needle))
        .unwrap_or_else(|| panic!("`{needle}` not found in {lines:#?}"))
}

#[test]
fn build_init_runs_steps_in_order() {
    let dir = scaffold();
    let runner = healthy_host();
    let probe = StaticProbe(200);
    let args = LaunchArgs { init: true, ..LaunchArgs::default() };

    build::build(&launcher(dir.path(), &runner, &probe), &args).unwrap();

    let lines = runner.command_lines();
    let order = [
        position(&lines, "git submodule update --init --recursive"),
        position(&lines, "docker compose version"),
        position(&lines, "docker-compose.yaml build"),
        position(&lines, "docker network create fritz_net"),
        position(&lines, "up -d"),
        position(&lines, "/bin/bash -c"),
        position(&lines, "cat /skyportal/.tokens.yaml"),
        position(&lines, " down"),
    ];
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "order {order:?} in {lines:#?}");

    // Kowalski images are built last, from inside its checkout.
    let last = runner.calls().pop().unwrap();
    assert_eq!(last.command_line(), "docker compose -f docker-compose.yaml build");
    assert_eq!(last.cwd(), Some(dir.path().join("kowalski").as_path()));

    let kowalski = fs::read_to_string(dir.path().join("kowalski/config.yaml")).unwrap();
    assert!(kowalski.contains(TOKEN), "token missing from {kowalski}");
    let compose = fs::read_to_string(dir.path().join("docker-compose.yaml")).unwrap();
    assert!(compose.contains(&format!("{}/skyportal:/skyportal", dir.path().display())));
}

#[test]
fn seed_loading_is_retried() {
    let dir = scaffold();
    let runner = healthy_host().on(
        "docker exec -i skyportal_web_1 /bin/bash -c",
        [CommandOutput::failed(2, "db not ready"), CommandOutput::failed(2, "db not ready"), CommandOutput::ok("")],
    );
    let probe = StaticProbe(200);
    let args = LaunchArgs { init: true, no_kowalski: true, ..LaunchArgs::default() };

    build::build(&launcher(dir.path(), &runner, &probe), &args).unwrap();
    assert_eq!(runner.count("docker exec -i skyportal_web_1 /bin/bash -c"), 3);
}

#[test]
fn seed_failure_stops_before_token_exchange() {
    let dir = scaffold();
    let runner = healthy_host()
        .on("docker exec -i skyportal_web_1 /bin/bash -c", [CommandOutput::failed(2, "db not ready")]);
    let probe = StaticProbe(200);
    let args = LaunchArgs { init: true, ..LaunchArgs::default() };

    assert!(build::build(&launcher(dir.path(), &runner, &probe), &args).is_err());
    assert_eq!(runner.count("docker exec -i skyportal_web_1 /bin/bash -c"), 3);
    assert_eq!(runner.count("docker exec -i skyportal_web_1 cat"), 0);
}

#[test]
fn unmet_dependency_fails_before_building() {
    let dir = scaffold();
    let runner = ScriptedRunner::new()
        .on("git --version", [CommandOutput::ok("git version 2.39.2\n")])
        .on("docker --version", [CommandOutput::ok("Docker version 17.3.0\n")])
        .on("docker compose version", [CommandOutput::ok("Docker Compose version v2.20.2\n")]);
    let probe = StaticProbe(200);

    let err = build::build(&launcher(dir.path(), &runner, &probe), &LaunchArgs::default()).unwrap_err();
    assert!(err.to_string().contains("docker: found 17.3.0"), "got: {err}");
    assert_eq!(runner.count("docker compose -f"), 0);
}

#[test]
fn run_with_traefik_layers_the_override() {
    let dir = scaffold();
    let runner = healthy_host();
    let probe = StaticProbe(200);
    let args = LaunchArgs { traefik: true, ..LaunchArgs::default() };

    run::run(&launcher(dir.path(), &runner, &probe), &args).unwrap();

    let lines = runner.command_lines();
    let kowalski_up = position(&lines, "docker compose -f docker-compose.yaml up -d");
    let skyportal_up = position(&lines, "docker-compose.traefik.yaml up -d");
    assert!(kowalski_up < skyportal_up);
    assert_eq!(runner.count("docker compose -f"), 2, "run without --init builds nothing: {lines:#?}");
}

#[test]
fn existing_network_is_not_an_error() {
    let dir = scaffold();
    let runner = healthy_host().on(
        "docker network create",
        [CommandOutput::failed(1, "Error response from daemon: network with name fritz_net already exists")],
    );
    let probe = StaticProbe(200);
    let args = LaunchArgs { no_kowalski: true, ..LaunchArgs::default() };

    run::run(&launcher(dir.path(), &runner, &probe), &args).unwrap();
    assert_eq!(runner.count("docker compose -f docker-compose.yaml up"), 0);
}

#[test]
fn missing_unified_config_is_created_from_defaults_with_yes() {
    let dir = scaffold();
    fs::rename(dir.path().join("fritz.yaml"), dir.path().join("fritz.defaults.yaml")).unwrap();
    let runner = healthy_host();
    let probe = StaticProbe(200);

    let declined = build::build(&launcher(dir.path(), &runner, &probe), &LaunchArgs::default());
    assert!(declined.is_err());
    assert!(!dir.path().join("fritz.yaml").exists());

    let args = LaunchArgs { yes: true, skip_submodules: true, ..LaunchArgs::default() };
    build::build(&launcher(dir.path(), &runner, &probe), &args).unwrap();
    assert!(dir.path().join("fritz.yaml").exists());
    assert!(dir.path().join("skyportal/config.yaml").exists());
}

#[test]
fn stop_brings_both_projects_down() {
    let dir = scaffold();
    fs::write(dir.path().join("docker-compose.yaml"), COMPOSE_TEMPLATE).unwrap();
    let runner = ScriptedRunner::new();
    let probe = StaticProbe(200);

    stop::stop(&launcher(dir.path(), &runner, &probe), &StopArgs::default()).unwrap();
    assert_eq!(runner.count("docker compose -f"), 2);
    assert!(runner.command_lines().iter().all(|line| line.ends_with(" down")));
}

#[test]
fn containers_that_never_come_up_are_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new().on("docker ps", [CommandOutput::ok("")]);
    let probe = StaticProbe(200);

    let err = testing::run_tests(&launcher(dir.path(), &runner, &probe), &TestArgs::default()).unwrap_err();
    assert!(err.downcast_ref::<KernelError>().is_some_and(KernelError::is_timeout), "got: {err}");
    assert_eq!(runner.count("docker ps"), 10);
    assert_eq!(runner.count("docker exec"), 0);
}

fn running_deployment() -> ScriptedRunner {
    ScriptedRunner::new()
        .on(
            "docker ps",
            [CommandOutput::ok(
                "kowalski_ingester_1\tUp 1 minute\nkowalski_api_1\tUp 1 minute\nskyportal_web_1\tUp 1 minute\n",
            )],
        )
        .on("docker exec -i skyportal_web_1 ps -ef", [CommandOutput::ok("root 1 python app.py\n")])
}

#[test]
fn failing_suite_yields_failure_but_both_suites_run() {
    let dir = tempfile::tempdir().unwrap();
    let runner = running_deployment()
        .on("docker exec -i kowalski_api_1 /bin/bash -c", [CommandOutput::failed(1, "2 failed")]);
    let probe = StaticProbe(200);

    let outcome = testing::run_tests(&launcher(dir.path(), &runner, &probe), &TestArgs::default()).unwrap();
    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(runner.count("docker exec -i skyportal_web_1 /bin/bash -c"), 1);
}

#[test]
fn green_suites_yield_success() {
    let dir = tempfile::tempdir().unwrap();
    let runner = running_deployment();
    let probe = StaticProbe(200);

    let outcome = testing::run_tests(&launcher(dir.path(), &runner, &probe), &TestArgs::default()).unwrap();
    assert_eq!(outcome, Outcome::Success);
}

#[test]
fn unhealthy_web_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let runner = running_deployment();
    let probe = StaticProbe(502);

    let err = testing::run_tests(&launcher(dir.path(), &runner, &probe), &TestArgs { no_kowalski: true })
        .unwrap_err();
    assert!(err.to_string().contains("api/sysinfo"), "got: {err}");
    assert_eq!(runner.count("docker exec -i kowalski_api_1"), 0);
}

#[test]
fn prune_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let probe = StaticProbe(200);

    prune::prune(&launcher(dir.path(), &runner, &probe), &ConfirmArgs::default()).unwrap();
    assert!(runner.command_lines().is_empty());

    prune::prune(&launcher(dir.path(), &runner, &probe), &ConfirmArgs { yes: true }).unwrap();
    assert_eq!(runner.command_lines(), ["docker system prune -af", "docker volume prune -f"]);
}

#[test]
fn update_pulls_before_updating_submodules() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let probe = StaticProbe(200);
    let source = SourceArgs { repo: "upstream".to_owned(), branch: "release".to_owned() };

    update::update(&launcher(dir.path(), &runner, &probe), &source, false).unwrap();
    assert_eq!(runner.command_lines(), ["git pull upstream release", "git submodule update"]);
    assert!(runner.calls().iter().all(|call| call.cwd() == Some(dir.path())));

    let runner = ScriptedRunner::new();
    update::update(&launcher(dir.path(), &runner, &probe), &source, true).unwrap();
    assert_eq!(runner.command_lines(), ["git pull upstream release", "git submodule update --init --recursive"]);
}

#[test]
fn failed_pull_skips_the_submodule_update() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new().on("git pull", [CommandOutput::failed(1, "merge conflict")]);
    let probe = StaticProbe(200);

    assert!(update::update(&launcher(dir.path(), &runner, &probe), &SourceArgs::default(), true).is_err());
    assert_eq!(runner.count("git submodule"), 0);
}

#[test]
fn build_with_update_pulls_before_building() {
    let dir = scaffold();
    let runner = healthy_host();
    let probe = StaticProbe(200);
    let args = LaunchArgs { update: true, skip_submodules: true, no_kowalski: true, ..LaunchArgs::default() };

    build::build(&launcher(dir.path(), &runner, &probe), &args).unwrap();

    let lines = runner.command_lines();
    let order = [
        position(&lines, "docker compose version"),
        position(&lines, "git pull origin main"),
        position(&lines, "git submodule update --init --recursive"),
        position(&lines, "docker-compose.yaml build"),
    ];
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "order {order:?} in {lines:#?}");
}

#[test]
fn lint_findings_yield_failure() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new().on("pre-commit run", [CommandOutput::failed(1, "trailing whitespace")]);
    let probe = StaticProbe(200);

    let outcome = develop::lint(&launcher(dir.path(), &runner, &probe)).unwrap();
    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(runner.command_lines(), ["pre-commit run --all-files"]);
}

#[test]
fn clean_lint_yields_success() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let probe = StaticProbe(200);

    assert_eq!(develop::lint(&launcher(dir.path(), &runner, &probe)).unwrap(), Outcome::Success);
}

#[test]
fn develop_installs_pre_commit_then_its_hooks() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new();
    let probe = StaticProbe(200);

    develop::develop(&launcher(dir.path(), &runner, &probe)).unwrap();
    assert_eq!(runner.command_lines(), ["pip install pre-commit", "pre-commit install"]);
    assert!(runner.calls().iter().all(|call| call.cwd() == Some(dir.path())));
}

#[test]
fn failed_pip_install_stops_develop() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new().on("pip install", [CommandOutput::failed(1, "no network")]);
    let probe = StaticProbe(200);

    assert!(develop::develop(&launcher(dir.path(), &runner, &probe)).is_err());
    assert_eq!(runner.count("pre-commit"), 0);
}

#[test]
fn doc_cleans_only_when_confirmed() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("doc");
    let probe = StaticProbe(200);

    let runner = ScriptedRunner::new();
    doc::doc(&launcher(dir.path(), &runner, &probe), &ConfirmArgs::default()).unwrap();
    assert_eq!(runner.command_lines(), ["make html"]);

    let runner = ScriptedRunner::new();
    doc::doc(&launcher(dir.path(), &runner, &probe), &ConfirmArgs { yes: true }).unwrap();
    assert_eq!(runner.command_lines(), ["make clean", "make html"]);
    assert!(runner.calls().iter().all(|call| call.cwd() == Some(docs.as_path())));
}
