use chrono::Utc;
use fritz_domain::config::LauncherSettings;
use fritz_kernel::Project;
use fritz_kernel::split::ConfigSplitter;
use fritz_kernel::unified::UnifiedConfig;
use serde_yaml::{Mapping, Value};
use std::fs;

const UNIFIED: &str = r"
skyportal:
  secret: x
  database:
    host: localhost
  server:
    host: localhost
  app:
    kowalski:
      protocol: http
      host: localhost
      port: 4000
      token: stale
kowalski:
  admin: u
  server:
    admin_username: admin
    jwt_secret_key: abc0000000000000000000000000000000
    jwt_algorithm: HS256
    jwt_exp_delta_seconds: null
    host: 0.0.0.0
    port: 8000
  skyportal:
    host: localhost
    token: null
extra:
  untouched: true
";

fn has_key(map: &Mapping, key: &str) -> bool {
    map.iter().any(|(k, v)| {
        k.as_str() == Some(key) || v.as_mapping().is_some_and(|nested| has_key(nested, key))
    })
}

fn project() -> (tempfile::TempDir, Project) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fritz.yaml"), UNIFIED).unwrap();
    let project = Project::new(dir.path(), LauncherSettings::default());
    (dir, project)
}

#[test]
fn sections_are_separated_and_overridden() {
    let mut config = UnifiedConfig::from_yaml_str(UNIFIED).unwrap();
    let project = Project::new("/srv/fritz", LauncherSettings::default());
    let outcome = ConfigSplitter::new(&project).split(&mut config, Utc::now()).unwrap();

    assert!(has_key(&outcome.skyportal, "secret"));
    assert!(!has_key(&outcome.skyportal, "admin"));
    assert!(!has_key(&outcome.skyportal, "admin_username"));

    let kowalski = outcome.kowalski["kowalski"].as_mapping().unwrap();
    assert_eq!(outcome.kowalski.len(), 1);
    assert!(has_key(kowalski, "admin"));
    assert!(!has_key(&outcome.kowalski, "secret"));

    assert_eq!(outcome.skyportal["database"]["host"].as_str(), Some("db"));
    assert_eq!(outcome.skyportal["app"]["kowalski"]["host"].as_str(), Some("kowalski_api_1"));
    assert_eq!(kowalski["server"]["port"].as_u64(), Some(4000));
    assert_eq!(kowalski["skyportal"]["host"].as_str(), Some("skyportal_web_1"));
}

#[test]
fn both_token_slots_receive_the_generated_token() {
    let mut config = UnifiedConfig::from_yaml_str(UNIFIED).unwrap();
    let project = Project::new("/srv/fritz", LauncherSettings::default());
    let outcome = ConfigSplitter::new(&project).split(&mut config, Utc::now()).unwrap();

    let app = &outcome.skyportal["app"];
    assert_ne!(outcome.kowalski_token, "stale");
    assert_eq!(app["kowalski"]["token"].as_str(), Some(outcome.kowalski_token.as_str()));
    assert_eq!(app["gloria"]["token"].as_str(), Some(outcome.kowalski_token.as_str()));
}

#[test]
fn propagate_writes_three_files() {
    let (dir, project) = project();
    let outcome = ConfigSplitter::new(&project).propagate().unwrap();

    let skyportal: Value =
        serde_yaml::from_str(&fs::read_to_string(dir.path().join("skyportal/config.yaml")).unwrap())
            .unwrap();
    let kowalski: Value =
        serde_yaml::from_str(&fs::read_to_string(dir.path().join("kowalski/config.yaml")).unwrap())
            .unwrap();
    let merged = UnifiedConfig::load(&dir.path().join("fritz.yaml")).unwrap();

    assert_eq!(skyportal, Value::Mapping(outcome.skyportal));
    assert_eq!(kowalski, Value::Mapping(outcome.kowalski));
    assert_eq!(
        merged.get_str(&["skyportal", "app", "kowalski", "token"]).unwrap(),
        outcome.kowalski_token
    );
    assert_eq!(merged.get(&["extra", "untouched"]), Some(&Value::Bool(true)));
}

#[test]
fn stored_skyportal_token_reaches_kowalski() {
    let (dir, project) = project();
    let token = "1b1c4d9e-7f3a-4c6b-9d2e-5a8f0c1e2b3d";
    ConfigSplitter::new(&project).store_skyportal_token(token).unwrap();

    let kowalski: Value =
        serde_yaml::from_str(&fs::read_to_string(dir.path().join("kowalski/config.yaml")).unwrap())
            .unwrap();
    assert_eq!(kowalski["kowalski"]["skyportal"]["token"].as_str(), Some(token));

    let merged = UnifiedConfig::load(&dir.path().join("fritz.yaml")).unwrap();
    assert_eq!(merged.get_str(&["kowalski", "skyportal", "token"]).unwrap(), token);
}

#[test]
fn missing_section_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fritz.yaml"), "skyportal: {}\n").unwrap();
    let project = Project::new(dir.path(), LauncherSettings::default());

    let err = ConfigSplitter::new(&project).propagate().unwrap_err();
    assert!(err.to_string().contains("(Kowalski config)"), "got: {err}");
    assert!(!dir.path().join("skyportal/config.yaml").exists());
}
