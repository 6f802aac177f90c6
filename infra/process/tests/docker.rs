use fritz_process::{CommandOutput, Docker, DockerCompose, Git, ProcessError, ScriptedRunner};
use std::fs;

#[test]
fn ensure_network_tolerates_existing_network() {
    let runner = ScriptedRunner::new().on(
        "docker network create",
        [CommandOutput::failed(1, "Error response from daemon: network with name fritz_net already exists")],
    );

    Docker::new(&runner).ensure_network("fritz_net").expect("existing network is fine");
    assert_eq!(runner.command_lines(), ["docker network create fritz_net"]);
}

#[test]
fn ensure_network_reports_other_failures() {
    let runner = ScriptedRunner::new()
        .on("docker network create", [CommandOutput::failed(1, "Cannot connect to the Docker daemon")]);

    let err = Docker::new(&runner).ensure_network("fritz_net").unwrap_err();
    assert!(matches!(err, ProcessError::Failed { code: Some(1), .. }));
    assert!(err.to_string().contains("Cannot connect"), "got: {err}");
}

#[test]
fn containers_are_listed_with_the_tab_format() {
    let runner = ScriptedRunner::new()
        .on("docker ps", [CommandOutput::ok("skyportal_web_1\tUp 5 seconds\n")]);

    let containers = Docker::new(&runner).containers().unwrap();
    assert_eq!(containers.len(), 1);
    assert!(containers[0].is_up());
    assert_eq!(runner.command_lines(), [r#"docker ps -a --format "{{.Names}}\t{{.Status}}""#]);
}

#[test]
fn exec_failure_carries_the_container_name() {
    let runner = ScriptedRunner::new().on("docker exec", [CommandOutput::failed(2, "")]);

    let err = Docker::new(&runner).exec("kowalski_api_1", &["pytest"]).unwrap_err();
    assert_eq!(err.exit_code(), Some(2));
    assert!(err.to_string().contains("in container kowalski_api_1"), "got: {err}");
}

#[test]
fn compose_layers_override_files_and_runs_in_project_dir() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("docker-compose.yaml"), "services: {}\n").unwrap();
    fs::write(tmp.path().join("docker-compose.traefik.yaml"), "services: {}\n").unwrap();
    let runner = ScriptedRunner::new();

    DockerCompose::new(&runner, "docker-compose.yaml")
        .with_override("docker-compose.traefik.yaml")
        .in_dir(tmp.path())
        .up()
        .unwrap();

    let calls = runner.calls();
    assert_eq!(
        calls[0].command_line(),
        "docker compose -f docker-compose.yaml -f docker-compose.traefik.yaml up -d"
    );
    assert_eq!(calls[0].cwd(), Some(tmp.path()));
}

#[test]
fn scripted_replies_are_consumed_in_order_and_the_last_repeats() {
    let runner = ScriptedRunner::new().on(
        "docker ps",
        [CommandOutput::ok(""), CommandOutput::ok("skyportal_web_1\tUp 1 second\n")],
    );
    let docker = Docker::new(&runner);

    assert!(docker.containers().unwrap().is_empty());
    assert_eq!(docker.containers().unwrap().len(), 1);
    assert_eq!(docker.containers().unwrap().len(), 1);
    assert_eq!(runner.count("docker ps"), 3);
}

#[test]
fn git_submodules_and_pull() {
    let runner = ScriptedRunner::new();
    let git = Git::new(&runner, "/srv/fritz");

    git.update_submodules(true).unwrap();
    git.update_submodules(false).unwrap();
    git.pull("origin", "main").unwrap();

    assert_eq!(
        runner.command_lines(),
        [
            "git submodule update --init --recursive",
            "git submodule update",
            "git pull origin main",
        ]
    );
}
