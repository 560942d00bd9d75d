use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub patterns: PatternConfig,
    pub lexicon: LexiconConfig,
    pub columns: ColumnAliases,
    pub cleaning: CleaningConfig,
    pub nlp: NlpConfig,
    pub rules: RuleConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    All,
    Folders,
    Files,
}

impl FilterType {
    /// Whether a row with this item type survives the filter.
    pub fn admits(&self, item_type: &str) -> bool {
        let is_folder = item_type.trim().eq_ignore_ascii_case("folder");
        match self {
            FilterType::All => true,
            FilterType::Folders => is_folder,
            FilterType::Files => !is_folder,
        }
    }
}

impl FromStr for FilterType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FilterType::All),
            "folders" => Ok(FilterType::Folders),
            "files" => Ok(FilterType::Files),
            other => Err(ConfigError::InvalidSetting {
                key: "analysis.filter_type".into(),
                reason: format!("'{other}' is not one of all, folders, files"),
            }),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilterType::All => "all",
            FilterType::Folders => "folders",
            FilterType::Files => "files",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub batch_size: usize,
    pub filter_type: FilterType,
    pub confidence_threshold: f32,
    /// Glob patterns over the Path column; matching rows are skipped.
    pub exclude_paths: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_name_length: 2,
            max_name_length: 50,
            batch_size: 5000,
            filter_type: FilterType::All,
            confidence_threshold: 0.3,
            exclude_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub exclude: Vec<String>,
    pub company_indicators: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        let exclude = [
            r"NEM1[23]#.*",
            r"EL\d{4}EP[VA]\d\.csv$",
            r"BR\d+\.csv$",
            r"RC\d{4}VT[A-Z]\d+#.*",
            r".*\.(csv|xlsx|xls|docx|doc|pptx|ppt|pdf|zip|log|msg|ods|xlsb)$",
            r"_.*",
            r"\d{4}.*",
            r"[A-Z]{2,3}\d+.*",
            r".*[#@].*",
            r"(Archive|Migration|Opportunities|Projects|Managed Services|Template|Folder|Reports|Data|Files|Documents)$",
            r".*Timesheet.*",
            r".*Reconciliation.*",
            r".*Invoice.*",
            r".*Sample.*",
            r".*Report.*",
            r".*How to.*",
            r".*Meeting.*",
            r".*Implementation.*",
            r".*Acc\d+.*",
            r".*FY\d{2}.*",
            r".*\d{4}-\d{2}-\d{2}.*",
            r".*\d{8}.*",
        ];
        let company_indicators = [
            r"\b(inc|incorporated|llc|corp|corporation|company|co|ltd|limited|pty|plc)\b",
            r"\b(group|holdings|partners|associates|solutions|services|technologies|systems)\b",
            r"\b(consulting|enterprises|international|global|worldwide)\b",
            r"\b(bank|financial|properties|realty|capital|investments|fund|trust)\b",
            r"\b(insurance|healthcare|medical|pharmaceuticals|biotech)\b",
            r"\b(energy|oil|gas|utilities|mining|construction|manufacturing)\b",
            r"\b(retail|hospitality|restaurants|hotels|airlines|logistics|transport)\b",
            r"\b(communications|media|entertainment|software|tech|technology)\b",
            r"\b(university|college|school|hospital|clinic|care|legal|law)\b",
            r"\b(accounting|advisory|management|consulting|professional)\b",
        ];
        Self {
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            company_indicators: company_indicators.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub known_companies: Vec<String>,
    pub exclude_words: Vec<String>,
    /// Extra abbreviation expansions for the categorizer (key is matched
    /// case-insensitively).
    pub abbreviations: BTreeMap<String, String>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        let known = [
            "Accent Group",
            "AGL",
            "BXP",
            "Altogether",
            "Cleanpeak",
            "Cotton On",
            "Digital Realty",
            "EnerConnex",
            "GCG",
            "Jewish Care",
            "Berkshire Bank",
            "Boston Properties",
            "Bright and Duggan",
            "Microsoft Corporation",
        ];
        let exclude_words = [
            "Archive", "Migration", "Projects", "Documents", "Files", "Folders", "Templates",
            "Forms", "Reports", "Data", "Information", "Resources", "Tools", "Utilities",
            "Settings", "Configuration", "Administration", "Management", "Operations",
            "Support", "Help", "Training", "Education", "Research", "Development", "Testing",
            "Production", "Staging", "Backup", "Recovery", "Security", "Privacy", "Compliance",
            "Audit", "Finance", "Accounting", "Legal", "Human", "Marketing", "Sales",
            "Customer", "Service", "Quality", "Agreements", "Contracts", "Thermal", "Active",
            "Apportionment", "Accuracy", "April", "March",
        ];
        Self {
            known_companies: known.iter().map(|s| s.to_string()).collect(),
            exclude_words: exclude_words.iter().map(|s| s.to_string()).collect(),
            abbreviations: BTreeMap::new(),
        }
    }
}

/// Header aliases per canonical column, matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub name: Vec<String>,
    pub path: Vec<String>,
    pub modified_by: Vec<String>,
    pub item_type: Vec<String>,
    pub file_size: Vec<String>,
    pub modified: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            name: list(&["Name", "filename", "file_name", "item_name"]),
            path: list(&["Path", "file_path", "full_path", "location"]),
            modified_by: list(&["Modified By", "modified_by", "author", "created_by"]),
            item_type: list(&["Item Type", "item_type", "type", "file_type"]),
            file_size: list(&["File Size", "file_size", "size", "file_size_bytes"]),
            modified: list(&[
                "Modified",
                "date_modified",
                "last_modified",
                "modification_date",
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub country_prefixes: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            country_prefixes: ["AU", "US", "UK", "NZ"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpConfig {
    /// Backend name in the registry: "lexicon", "http" or "noop".
    pub provider: String,
    pub url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            provider: "lexicon".into(),
            url: None,
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuleConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub base_filename: String,
    pub formats: Vec<String>,
    pub top: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".into(),
            base_filename: "companies".into(),
            formats: vec!["json".into(), "csv".into(), "txt".into()],
            top: 50,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        if a.min_name_length == 0 {
            return Err(invalid("analysis.min_name_length", "must be at least 1"));
        }
        if a.max_name_length < a.min_name_length {
            return Err(invalid(
                "analysis.max_name_length",
                "must not be smaller than min_name_length",
            ));
        }
        if a.batch_size == 0 {
            return Err(invalid("analysis.batch_size", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&a.confidence_threshold) {
            return Err(invalid("analysis.confidence_threshold", "must be within 0.0..=1.0"));
        }
        if self.nlp.timeout_ms == 0 {
            return Err(invalid("nlp.timeout_ms", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        key: key.into(),
        reason: reason.into(),
    }
}

/// Built-in defaults, then `config/default` (or `path`), then `ORGSCAN__*`
/// environment variables.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings =
        config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("ORGSCAN")
            .separator("__")
            .try_parsing(true),
    );
    let cfg: AppConfig = settings.build()?.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.analysis.batch_size, 5000);
        assert!(cfg
            .lexicon
            .known_companies
            .iter()
            .any(|c| c == "Microsoft Corporation"));
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let mut cfg = AppConfig::default();
        cfg.analysis.min_name_length = 10;
        cfg.analysis.max_name_length = 5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSetting { ref key, .. }) if key == "analysis.max_name_length"
        ));

        let mut cfg = AppConfig::default();
        cfg.analysis.batch_size = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.analysis.confidence_threshold = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn filter_type_parses_and_admits() {
        assert_eq!("Folders".parse::<FilterType>().unwrap(), FilterType::Folders);
        assert!("dirs".parse::<FilterType>().is_err());
        assert!(FilterType::Folders.admits("Folder"));
        assert!(!FilterType::Folders.admits("Item"));
        assert!(FilterType::Files.admits("Item"));
        assert!(!FilterType::Files.admits("folder"));
        assert!(FilterType::All.admits(""));
    }

    #[test]
    fn load_merges_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("orgscan.toml");
        fs::write(
            &file,
            r#"
            [analysis]
            batch_size = 250
            filter_type = "folders"

            [nlp]
            provider = "noop"
            "#,
        )
        .unwrap();
        let cfg = load(Some(file.to_str().unwrap())).unwrap();
        assert_eq!(cfg.analysis.batch_size, 250);
        assert_eq!(cfg.analysis.filter_type, FilterType::Folders);
        assert_eq!(cfg.nlp.provider, "noop");
        assert_eq!(cfg.analysis.min_name_length, 2);
        assert!(!cfg.patterns.exclude.is_empty());
    }
}
