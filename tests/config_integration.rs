use healthchat::config::{AppConfig, DEFAULT_SYSTEM_INSTRUCTION};
use healthchat::llm::Provider;
use serial_test::serial;
use std::env;
use std::fs;

const VARS: &[&str] = &[
    "HEALTHCHAT_SERVER__PORT",
    "HEALTHCHAT_CHAT__TITLE",
    "CONFIG_FILE",
    "PORT",
    "LLM_BASE_URL",
    "LLM_MODEL",
    "LLM_API_KEY",
    "GROQ_API_KEY",
    "AZURE_DEPLOYMENT_NAME",
    "AZURE_API_VERSION",
];

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

fn load(extra: &[&str]) -> Result<AppConfig, config::ConfigError> {
    let mut args = vec!["healthchat"];
    args.extend_from_slice(extra);
    AppConfig::load_from_args(args)
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&[]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.llm.model, "llama3-70b-8192");
    assert_eq!(config.chat.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);

    let settings = config.llm_settings();
    assert_eq!(settings.provider, Provider::Groq);
    assert!(settings.api_key.is_none());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("HEALTHCHAT_SERVER__PORT", "9090");
        env::set_var("HEALTHCHAT_CHAT__TITLE", "Clinic Helper");
        env::set_var("GROQ_API_KEY", "gsk_test");
    }

    let config = load(&[]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.chat.title, "Clinic Helper");
    assert_eq!(config.llm_settings().api_key.as_deref(), Some("gsk_test"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("HEALTHCHAT_SERVER__PORT", "9090");
    }

    let config = load(&["--port", "4040", "--host", "127.0.0.1"]).expect("Failed to load config");
    assert_eq!(config.server.port, 4040);
    assert_eq!(config.server.host, "127.0.0.1");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("healthchat.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
chat:
  system_instruction: "You are a health assistant."
llm:
  base_url: "https://my-resource.openai.azure.com"
  azure_deployment_name: "gpt-4o"
"#,
    )
    .expect("Failed to write temp config");

    let path = file_path.to_string_lossy().to_string();
    let config = load(&["--config", &path]).expect("Failed to load config from file");

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.chat.system_instruction, "You are a health assistant.");
    assert_eq!(
        config.llm_settings().provider,
        Provider::AzureOpenAI {
            deployment_name: "gpt-4o".to_string(),
            api_version: "2024-08-01-preview".to_string(),
        }
    );
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();
    assert!(load(&["--config", "/nonexistent/healthchat.yaml"]).is_err());
}

#[test]
#[serial]
fn test_empty_model_rejected() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("bad.yaml");
    fs::write(&file_path, "llm:\n  model: \"  \"\n").expect("write");

    let path = file_path.to_string_lossy().to_string();
    let err = load(&["--config", &path]).unwrap_err();
    assert!(err.to_string().contains("llm.model"));
}
