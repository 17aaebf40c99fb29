//! Integration tests for stampede-config

use stampede_config::*;
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = StampedeConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("STAMPEDE_HOST", Some("http://search.internal:9000")),
        ("STAMPEDE_USERS", Some("25")),
        ("STAMPEDE_SPAWN_RATE", Some("5")),
        ("STAMPEDE_RUN_TIME", Some("90")),
        ("STAMPEDE_HTTP_TIMEOUT", Some("15")),
        ("STAMPEDE_LOG_LEVEL", Some("debug")),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(config.target.host, "http://search.internal:9000");
        assert_eq!(config.load.users, 25);
        assert_eq!(config.load.spawn_rate, 5.0);
        assert_eq!(config.load.run_time, Some(Duration::from_secs(90)));
        assert_eq!(config.http.timeout, Duration::from_secs(15));
        assert_eq!(config.logging.level, Some(LogLevel::Debug));
    });
}

#[test]
fn test_invalid_env_value_is_an_error() {
    with_vars(vec![("STAMPEDE_USERS", Some("lots"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("USERS"));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("LOADGEN_USERS", Some("3"))], || {
        let config = ConfigLoader::with_prefix("LOADGEN").from_env().unwrap();
        assert_eq!(config.load.users, 3);
    });
}

#[test]
fn test_yaml_config_serialization() {
    let config = StampedeConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();

    let parsed: StampedeConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.http.timeout, config.http.timeout);
    assert_eq!(parsed.scenarios.search.terms, config.scenarios.search.terms);
}

#[test]
fn test_comprehensive_config() {
    let yaml = r#"
target:
  host: "http://products.internal:8080"

load:
  users: 100
  spawn_rate: 10
  run_time: 300
  seed: 42
  stop_timeout: 5

http:
  timeout: 45
  user_agent: "Test Agent"
  verify_ssl: false

scenarios:
  product:
    product_count: 200
    body_encoding: raw
  search:
    terms: ["laptop", "phone"]

logging:
  level: warn
  format: json

report:
  json_path: "reports/run.json"
  exit_code_on_error: 3
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    // Prefix nobody sets, so env tests running in parallel cannot interfere
    let config = ConfigLoader::with_prefix("STAMPEDE_FILE_TEST")
        .from_file(file.path())
        .unwrap();
    assert_eq!(config.target.host, "http://products.internal:8080");
    assert_eq!(config.load.users, 100);
    assert_eq!(config.load.run_time, Some(Duration::from_secs(300)));
    assert_eq!(config.load.seed, Some(42));
    assert_eq!(config.load.stop_timeout, Duration::from_secs(5));
    assert_eq!(config.http.timeout, Duration::from_secs(45));
    assert!(!config.http.verify_ssl);
    assert_eq!(config.scenarios.product.product_count, 200);
    assert_eq!(config.scenarios.product.body_encoding, BodyEncoding::Raw);
    assert_eq!(config.scenarios.search.terms, vec!["laptop", "phone"]);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.report.exit_code_on_error, 3);
}

#[test]
fn test_file_validation_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"load:\n  users: 0\n").unwrap();

    let err = ConfigLoader::with_prefix("STAMPEDE_FILE_TEST")
        .from_file(file.path())
        .unwrap_err();
    match err {
        ConfigError::DomainError { domain, .. } => assert_eq!(domain, "load"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file() {
    let result = ConfigLoader::new().load(Some("/definitely/not/here.yaml"));
    assert!(matches!(result, Err(ConfigError::FileReadError(_))));
}
