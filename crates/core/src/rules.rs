//! Rule files: TOML documents that extend the detection configuration with
//! site-specific companies, noise patterns and abbreviations.

use crate::config::AppConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub known_companies: Vec<String>,
    #[serde(default)]
    pub exclude_words: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub company_indicators: Vec<String>,
    #[serde(default)]
    pub abbreviations: BTreeMap<String, String>,
}

fn enabled_by_default() -> bool {
    true
}

/// Every `*.toml` file in `dir`, ordered by priority then file name. A
/// missing directory yields no rules.
pub fn load_rules_from_dir(dir: &Path) -> anyhow::Result<Vec<RuleFile>> {
    let mut found = Vec::new();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file()
            || path.extension().and_then(|e| e.to_str()) != Some("toml")
        {
            continue;
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let mut rule: RuleFile =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        if rule.name.is_empty() {
            rule.name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
        }
        found.push((path, rule));
    }
    found.sort_by(|(pa, a), (pb, b)| a.priority.cmp(&b.priority).then_with(|| pa.cmp(pb)));
    Ok(found.into_iter().map(|(_, r)| r).collect())
}

/// Merge enabled rule files into `config`. Entries already present are not
/// duplicated; later abbreviations override earlier ones.
pub fn apply_rules(config: &mut AppConfig, rules: &[RuleFile]) {
    for rule in rules.iter().filter(|r| r.enabled) {
        debug!(rule = %rule.name, priority = rule.priority, "applying rule file");
        extend_unique(&mut config.lexicon.known_companies, &rule.known_companies);
        extend_unique(&mut config.lexicon.exclude_words, &rule.exclude_words);
        extend_unique(&mut config.patterns.exclude, &rule.exclude_patterns);
        extend_unique(&mut config.patterns.company_indicators, &rule.company_indicators);
        config
            .lexicon
            .abbreviations
            .extend(rule.abbreviations.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

/// Load `config.rules.path`, if set, and merge it into `config`.
pub fn apply_rule_dir(config: &mut AppConfig) -> anyhow::Result<usize> {
    let Some(dir) = config.rules.path.clone() else {
        return Ok(0);
    };
    let rules = load_rules_from_dir(Path::new(&dir))?;
    apply_rules(config, &rules);
    Ok(rules.iter().filter(|r| r.enabled).count())
}

fn extend_unique(target: &mut Vec<String>, extra: &[String]) {
    for item in extra {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
