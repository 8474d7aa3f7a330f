use crate::config::rules::{ KeywordRule, RulesConfig, MESSAGE_PLACEHOLDER };

/// Canned-reply lookup over an ordered keyword table. The first keyword found
/// as a substring of the lowercased message wins.
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    rules: Vec<KeywordRule>,
    default_template: String,
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

impl KeywordResponder {
    pub fn new(config: RulesConfig) -> Self {
        Self {
            rules: config.rules,
            default_template: config.default_template,
        }
    }

    pub fn reply(&self, message: &str) -> String {
        let message_lower = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| message_lower.contains(rule.keyword.as_str()))
            .map(|rule| rule.reply.clone())
            .unwrap_or_else(|| self.default_template.replace(MESSAGE_PLACEHOLDER, message))
    }
}
