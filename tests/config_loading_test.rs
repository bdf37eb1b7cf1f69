use chanwatch::config::{Config, ConfigError, TraceLevel};
use chanwatch::core::ChannelEvent;

#[tokio::test]
async fn test_demo_config_loads() {
    let config = Config::from_yaml_file("demos/replay.yaml").await;

    match config {
        Ok(config) => {
            assert_eq!(config.listeners.len(), 3, "Should have three listeners");
            assert_eq!(config.channels.len(), 3, "Should have three channels");

            let audit = &config.listeners["audit"];
            assert_eq!(audit.trace.as_ref().unwrap().level, TraceLevel::Info);
            assert!(audit.metrics);
            assert!(audit.contain_panics);

            let raw = &config.listeners["raw"];
            assert!(!raw.metrics);
            assert!(!raw.contain_panics);

            let upstream = &config.channels["upstream"];
            assert_eq!(upstream.listener, "audit");
            assert_eq!(upstream.events.last(), Some(&ChannelEvent::Close));

            assert!(config.channels["idle"].events.is_empty());
        }
        Err(e) => {
            panic!("Failed to load demos/replay.yaml: {}", e);
        }
    }
}

#[tokio::test]
async fn test_missing_config_file() {
    let result = Config::from_yaml_file("demos/absent.yaml").await;
    assert!(matches!(result, Err(ConfigError::FileNotFound(path)) if path == "demos/absent.yaml"));
}

#[test]
fn test_malformed_event_is_parse_error() {
    let yaml = r#"
listeners:
  audit: {}
channels:
  main:
    listener: audit
    events:
      - { event: flush, status: 0 }
"#;
    let result = Config::from_yaml_str(yaml);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn test_close_as_last_event_is_valid() {
    let yaml = r#"
listeners:
  audit: {}
channels:
  main:
    listener: audit
    events:
      - { event: read, status: 3 }
      - { event: close }
"#;
    let config = Config::from_yaml_str(yaml).expect("Failed to parse config");
    assert_eq!(config.channels["main"].events.len(), 2);
}
