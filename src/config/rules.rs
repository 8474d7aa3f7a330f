use serde::Deserialize;
use std::fs;
use std::path::Path;
use log::info;
use thiserror::Error;

pub const MESSAGE_PLACEHOLDER: &str = "{message}";

pub const DEFAULT_TEMPLATE: &str =
    "Terima kasih atas pertanyaan Anda: '{message}'. Tim kami sedang memproses jawaban Anda.";

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Rules file IO error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Rules JSON parsing error for '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Rules file '{0}' defines no rules")]
    Empty(String),
    #[error("Rule #{0} has an empty keyword")]
    EmptyKeyword(usize),
    #[error("Default template is missing the {{message}} placeholder")]
    MissingPlaceholder,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: String,
    pub reply: String,
}

impl KeywordRule {
    pub fn new(keyword: &str, reply: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            reply: reply.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RulesConfig {
    pub rules: Vec<KeywordRule>,
    #[serde(default = "default_template")]
    pub default_template: String,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                KeywordRule::new("halo", "Halo! Apa kabar Anda?"),
                KeywordRule::new("apa", "Saya adalah Nexus Assistant, siap membantu Anda."),
                KeywordRule::new(
                    "bantuan",
                    "Saya bisa membantu menjawab pertanyaan tentang produk kami."
                )
            ],
            default_template: default_template(),
        }
    }
}

impl RulesConfig {
    fn validate(&self, path: &str) -> Result<(), RulesError> {
        if self.rules.is_empty() {
            return Err(RulesError::Empty(path.to_string()));
        }
        if let Some(idx) = self.rules.iter().position(|r| r.keyword.trim().is_empty()) {
            return Err(RulesError::EmptyKeyword(idx));
        }
        if !self.default_template.contains(MESSAGE_PLACEHOLDER) {
            return Err(RulesError::MissingPlaceholder);
        }
        Ok(())
    }
}

/// Matching is done against lowercased text, so keywords are lowercased here.
pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<RulesConfig, RulesError> {
    let display = path.as_ref().display().to_string();
    let file_content = fs::read_to_string(&path).map_err(|source| RulesError::Io {
        path: display.clone(),
        source,
    })?;
    let mut config: RulesConfig = serde_json::from_str(&file_content).map_err(|source| {
        RulesError::Json {
            path: display.clone(),
            source,
        }
    })?;
    config.validate(&display)?;
    for rule in &mut config.rules {
        rule.keyword = rule.keyword.to_lowercase();
    }
    info!("Loaded {} keyword rules from: {}", config.rules.len(), display);
    Ok(config)
}
