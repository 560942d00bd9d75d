use crate::config::CleaningConfig;

/// Normalizes a raw name before classification.
#[derive(Debug, Clone)]
pub struct NameCleaner {
    country_prefixes: Vec<String>,
}

impl NameCleaner {
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            country_prefixes: config.country_prefixes.clone(),
        }
    }

    /// Trim, drop leading year and country-code tokens, collapse whitespace.
    /// `clean(clean(x)) == clean(x)`.
    pub fn clean(&self, name: &str) -> String {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        tokens[self.leading_noise(&tokens)..].join(" ")
    }

    /// Every form the name passes through while prefixes are stripped, from
    /// the whitespace-collapsed input down to `clean(name)`.
    pub fn stages(&self, name: &str) -> Vec<String> {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        (0..=self.leading_noise(&tokens))
            .map(|start| tokens[start..].join(" "))
            .collect()
    }

    fn leading_noise(&self, tokens: &[&str]) -> usize {
        tokens
            .iter()
            .take_while(|t| is_year(t) || self.country_prefixes.iter().any(|c| c == *t))
            .count()
    }
}

impl Default for NameCleaner {
    fn default() -> Self {
        Self::new(&CleaningConfig::default())
    }
}

fn is_year(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit())
}
