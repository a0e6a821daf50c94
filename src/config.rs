use crate::llm::provider::DEFAULT_AZURE_API_VERSION;
use crate::llm::{LlmSettings, Provider};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

/// Instruction placed ahead of every prompt unless configured otherwise.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful healthcare assistant. You provide general health advice and help book appointments.";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub azure_deployment_name: Option<String>,
    #[serde(default)]
    pub azure_api_version: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub system_instruction: String,
    pub title: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("llm.base_url", "https://api.groq.com/openai")?
            .set_default("llm.model", "llama3-70b-8192")?
            .set_default("chat.system_instruction", DEFAULT_SYSTEM_INSTRUCTION)?
            .set_default("chat.title", "Healthcare Chatbot")?;

        // 2. Config file: explicit path must exist, ./config.* is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment variables (prefixed with HEALTHCHAT_), e.g. HEALTHCHAT_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("HEALTHCHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. Direct provider variables
        for (var, key) in [
            ("LLM_BASE_URL", "llm.base_url"),
            ("LLM_MODEL", "llm.model"),
            ("GROQ_API_KEY", "llm.api_key"),
            ("LLM_API_KEY", "llm.api_key"),
            ("AZURE_DEPLOYMENT_NAME", "llm.azure_deployment_name"),
            ("AZURE_API_VERSION", "llm.azure_api_version"),
        ] {
            if let Ok(val) = env::var(var)
                && !val.trim().is_empty()
            {
                builder = builder.set_override(key, val)?;
            }
        }

        // 5. CLI flags win
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.llm.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "llm.base_url cannot be empty".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "llm.model cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Connection settings for the completion client.
    pub fn llm_settings(&self) -> LlmSettings {
        let llm = &self.llm;

        // Auto-detect provider from base URL
        let mut provider = Provider::detect_from_url(&llm.base_url);
        if let Provider::AzureOpenAI { .. } = &provider
            && let Some(deployment) = &llm.azure_deployment_name
        {
            provider = Provider::AzureOpenAI {
                deployment_name: deployment.clone(),
                api_version: llm
                    .azure_api_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            };
        }

        LlmSettings {
            base_url: llm.base_url.clone(),
            api_key: llm.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: llm.model.clone(),
            provider,
        }
    }
}
