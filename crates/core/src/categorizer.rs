//! Taxonomy for extracted names: explains what a string most likely is,
//! independently of whether the classifier accepted it.

use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::exclusion::compile_pattern;
use crate::vocabulary::{
    ABBREVIATIONS, INDUSTRY_TERMS, KNOWN_COMPANY_TOKENS, LEGAL_INDICATORS,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Abbreviation,
    #[serde(rename = "Version Number")]
    VersionNumber,
    #[serde(rename = "Build Number")]
    BuildNumber,
    #[serde(rename = "Release Number")]
    ReleaseNumber,
    #[serde(rename = "Document Section")]
    DocumentSection,
    #[serde(rename = "Document Chapter")]
    DocumentChapter,
    #[serde(rename = "Page Number")]
    PageNumber,
    #[serde(rename = "Document Appendix")]
    DocumentAppendix,
    #[serde(rename = "File Extension")]
    FileExtension,
    #[serde(rename = "Image File")]
    ImageFile,
    #[serde(rename = "Video File")]
    VideoFile,
    #[serde(rename = "Audio File")]
    AudioFile,
    #[serde(rename = "Technical Term")]
    TechnicalTerm,
    #[serde(rename = "Software Component")]
    SoftwareComponent,
    #[serde(rename = "Environment/Testing")]
    EnvironmentTesting,
    #[serde(rename = "Business Process")]
    BusinessProcess,
    #[serde(rename = "Reporting/Analytics")]
    ReportingAnalytics,
    #[serde(rename = "Training/Education")]
    TrainingEducation,
    #[serde(rename = "Project Management")]
    ProjectManagement,
    #[serde(rename = "Meeting/Event")]
    MeetingEvent,
    #[serde(rename = "Location/Facility")]
    LocationFacility,
    #[serde(rename = "Geographic Reference")]
    GeographicReference,
    #[serde(rename = "Time Period")]
    TimePeriod,
    #[serde(rename = "Date Reference")]
    DateReference,
    #[serde(rename = "Code/Identifier")]
    CodeIdentifier,
    #[serde(rename = "Numeric Identifier")]
    NumericIdentifier,
    #[serde(rename = "Single Letter")]
    SingleLetter,
    #[serde(rename = "Two-Letter Code")]
    TwoLetterCode,
    Company,
    #[serde(rename = "Industry Term")]
    IndustryTerm,
    #[serde(rename = "Short Code")]
    ShortCode,
    #[serde(rename = "Code/Reference")]
    CodeReference,
    #[serde(rename = "Numeric Code")]
    NumericCode,
    Acronym,
    #[serde(rename = "Single Name")]
    SingleName,
    #[serde(rename = "Single Term")]
    SingleTerm,
    #[serde(rename = "Potential Company")]
    PotentialCompany,
    #[serde(rename = "Multi-word Term")]
    MultiWordTerm,
    Unclassified,
}

impl Category {
    pub fn label(self) -> &'static str {
        use Category::*;
        match self {
            Abbreviation => "Abbreviation",
            VersionNumber => "Version Number",
            BuildNumber => "Build Number",
            ReleaseNumber => "Release Number",
            DocumentSection => "Document Section",
            DocumentChapter => "Document Chapter",
            PageNumber => "Page Number",
            DocumentAppendix => "Document Appendix",
            FileExtension => "File Extension",
            ImageFile => "Image File",
            VideoFile => "Video File",
            AudioFile => "Audio File",
            TechnicalTerm => "Technical Term",
            SoftwareComponent => "Software Component",
            EnvironmentTesting => "Environment/Testing",
            BusinessProcess => "Business Process",
            ReportingAnalytics => "Reporting/Analytics",
            TrainingEducation => "Training/Education",
            ProjectManagement => "Project Management",
            MeetingEvent => "Meeting/Event",
            LocationFacility => "Location/Facility",
            GeographicReference => "Geographic Reference",
            TimePeriod => "Time Period",
            DateReference => "Date Reference",
            CodeIdentifier => "Code/Identifier",
            NumericIdentifier => "Numeric Identifier",
            SingleLetter => "Single Letter",
            TwoLetterCode => "Two-Letter Code",
            Company => "Company",
            IndustryTerm => "Industry Term",
            ShortCode => "Short Code",
            CodeReference => "Code/Reference",
            NumericCode => "Numeric Code",
            Acronym => "Acronym",
            SingleName => "Single Name",
            SingleTerm => "Single Term",
            PotentialCompany => "Potential Company",
            MultiWordTerm => "Multi-word Term",
            Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub category: Category,
    pub description: String,
}

impl CategoryAssignment {
    fn new(category: Category, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
        }
    }
}

/// Ordered shape rules, matched at the start of the lowercased name.
const PATTERN_RULES: &[(&str, Category, &str)] = &[
    (r"v?\d+\.\d+(\.\d+)?", Category::VersionNumber, "Software or document version identifier"),
    (r"version\s+\d+", Category::VersionNumber, "Software or document version identifier"),
    (r"build\s+\d+", Category::BuildNumber, "Software build identifier"),
    (r"release\s+\d+", Category::ReleaseNumber, "Software release identifier"),
    (r"section\s+\d+", Category::DocumentSection, "Document section reference"),
    (r"chapter\s+\d+", Category::DocumentChapter, "Document chapter reference"),
    (r"page\s+\d+", Category::PageNumber, "Document page reference"),
    (r"appendix\s+[a-z]", Category::DocumentAppendix, "Document appendix reference"),
    (
        r".*\.(pdf|doc|docx|xls|xlsx|ppt|pptx|txt|csv|xml|json)$",
        Category::FileExtension,
        "Document or data file type",
    ),
    (r".*\.(jpg|jpeg|png|gif|bmp|tiff|svg)$", Category::ImageFile, "Image file type"),
    (r".*\.(mp4|avi|mov|wmv|flv|webm)$", Category::VideoFile, "Video file type"),
    (r".*\.(mp3|wav|flac|aac|ogg)$", Category::AudioFile, "Audio file type"),
    (
        r".*\b(server|database|admin|system|config|settings|backup|archive|temp|cache|log|debug)\b.*",
        Category::TechnicalTerm,
        "Technical or system-related term",
    ),
    (
        r".*\b(api|sdk|framework|library|plugin|module|component|service|microservice)\b.*",
        Category::SoftwareComponent,
        "Software development component",
    ),
    (
        r".*\b(test|testing|qa|quality|validation|verification|staging|production|development)\b.*",
        Category::EnvironmentTesting,
        "Software development environment or testing term",
    ),
    (
        r".*\b(process|procedure|workflow|pipeline|automation|integration|migration)\b.*",
        Category::BusinessProcess,
        "Business or operational process",
    ),
    (
        r".*\b(report|dashboard|analytics|metrics|kpi|performance|monitoring)\b.*",
        Category::ReportingAnalytics,
        "Business reporting or analytics term",
    ),
    (
        r".*\b(training|workshop|seminar|course|certification|manual|guide)\b.*",
        Category::TrainingEducation,
        "Training or educational material",
    ),
    (
        r".*\b(project|task|milestone|deliverable|phase|sprint|iteration|scrum|agile)\b.*",
        Category::ProjectManagement,
        "Project or task management term",
    ),
    (
        r".*\b(meeting|conference|call|session|workshop|presentation|demo)\b.*",
        Category::MeetingEvent,
        "Meeting or event-related term",
    ),
    (
        r".*\b(office|building|floor|room|site|location|address|facility)\b.*",
        Category::LocationFacility,
        "Physical location or facility reference",
    ),
    (
        r".*\b(north|south|east|west|central|regional|local|global|international)\b.*",
        Category::GeographicReference,
        "Geographic or regional reference",
    ),
    (
        r".*\b(daily|weekly|monthly|quarterly|yearly|annual|q[1-4]|fy\d{2,4})\b.*",
        Category::TimePeriod,
        "Time period or schedule reference",
    ),
    (
        r".*\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|january|february|march|april|june|july|august|september|october|november|december)\b.*",
        Category::DateReference,
        "Date or calendar reference",
    ),
    (r"[a-z]{2,4}-?\d{2,6}$", Category::CodeIdentifier, "Code or identifier reference"),
    (r"[a-z]{1,3}\d{1,6}$", Category::CodeIdentifier, "Code or identifier reference"),
    (r"\d{4,10}$", Category::NumericIdentifier, "Numeric identifier or reference number"),
    (r"[a-z]$", Category::SingleLetter, "Single letter reference"),
    (r"[a-z]{2}$", Category::TwoLetterCode, "Two-letter code or abbreviation"),
];

const SPECIAL_CHARS: &[char] = &['&', '+', '-', '_', '/', '\\', '|', ':', ';', '=', '@', '#', '%'];

#[derive(Debug, Clone)]
pub struct NameCategorizer {
    abbreviations: HashMap<String, String>,
    rules: Vec<(Regex, Category, &'static str)>,
    company_tokens: HashSet<String>,
}

impl NameCategorizer {
    /// Built-in tables plus the configured abbreviations and known companies.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let mut abbreviations: HashMap<String, String> = ABBREVIATIONS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (abbrev, expansion) in &config.lexicon.abbreviations {
            abbreviations.insert(abbrev.trim().to_uppercase(), expansion.clone());
        }

        let rules = PATTERN_RULES
            .iter()
            .map(|(pattern, category, description)| {
                compile_pattern("category", pattern, true).map(|re| (re, *category, *description))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut company_tokens: HashSet<String> =
            KNOWN_COMPANY_TOKENS.iter().map(|s| s.to_string()).collect();
        company_tokens.extend(config.lexicon.known_companies.iter().map(|c| c.to_lowercase()));

        Ok(Self {
            abbreviations,
            rules,
            company_tokens,
        })
    }

    pub fn categorize(&self, name: &str) -> CategoryAssignment {
        let name = name.trim();
        if name.is_empty() {
            return CategoryAssignment::new(Category::Unclassified, "Empty or invalid name");
        }
        let upper = name.to_uppercase();
        let lower = name.to_lowercase();

        if let Some(expansion) = self.abbreviations.get(&upper) {
            return CategoryAssignment::new(Category::Abbreviation, expansion.clone());
        }

        if let Some((_, category, description)) =
            self.rules.iter().find(|(re, _, _)| re.is_match(&lower))
        {
            return CategoryAssignment::new(*category, *description);
        }

        if self.company_tokens.contains(&lower)
            || lower.split_whitespace().any(|w| self.company_tokens.contains(w))
        {
            return CategoryAssignment::new(
                Category::Company,
                format!("Known business entity: {name}"),
            );
        }

        if LEGAL_INDICATORS.iter().any(|i| lower.contains(i)) {
            return CategoryAssignment::new(
                Category::Company,
                format!("Business entity with corporate indicator: {name}"),
            );
        }

        for (industry, terms) in INDUSTRY_TERMS {
            if terms.iter().any(|t| lower.contains(t)) {
                return CategoryAssignment::new(
                    Category::IndustryTerm,
                    format!("{industry} industry term: {name}"),
                );
            }
        }

        shape_fallback(name)
    }

    pub fn categorize_all<'a, I>(&self, names: I) -> Vec<(String, CategoryAssignment)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|n| (n.to_string(), self.categorize(n)))
            .collect()
    }

    pub fn category_summary<'a, I>(&self, names: I) -> BTreeMap<Category, usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = BTreeMap::new();
        for name in names {
            *counts.entry(self.categorize(name).category).or_insert(0) += 1;
        }
        counts
    }
}

fn shape_fallback(name: &str) -> CategoryAssignment {
    if name.chars().count() <= 3 {
        return if is_upper(name) {
            CategoryAssignment::new(Category::Abbreviation, format!("Likely abbreviation: {name}"))
        } else {
            CategoryAssignment::new(Category::ShortCode, format!("Short code or reference: {name}"))
        };
    }
    if name.contains(SPECIAL_CHARS) {
        return CategoryAssignment::new(
            Category::CodeReference,
            format!("Code or reference with special characters: {name}"),
        );
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return CategoryAssignment::new(Category::NumericCode, format!("Numeric identifier: {name}"));
    }
    if is_upper(name) {
        return CategoryAssignment::new(
            Category::Acronym,
            format!("Likely acronym or abbreviation: {name}"),
        );
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.len() {
        0 => CategoryAssignment::new(Category::Unclassified, format!("Unclassified name: {name}")),
        1 if is_title(name) => {
            CategoryAssignment::new(Category::SingleName, format!("Single capitalized name: {name}"))
        }
        1 => CategoryAssignment::new(Category::SingleTerm, format!("Single term or identifier: {name}")),
        _ if words.iter().all(|w| w.chars().next().is_some_and(char::is_uppercase)) => {
            CategoryAssignment::new(
                Category::PotentialCompany,
                format!("Multiple capitalized words, likely business name: {name}"),
            )
        }
        _ => CategoryAssignment::new(
            Category::MultiWordTerm,
            format!("Multi-word term or phrase: {name}"),
        ),
    }
}

/// At least one cased character and no lowercase ones.
fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Every cased run starts with an uppercase letter followed by lowercase.
fn is_title(s: &str) -> bool {
    let mut seen_cased = false;
    let mut prev_cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else {
            prev_cased = false;
        }
    }
    seen_cased
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorizer() -> NameCategorizer {
        NameCategorizer::new(&AppConfig::default()).unwrap()
    }

    fn category(name: &str) -> Category {
        categorizer().categorize(name).category
    }

    #[test]
    fn abbreviations_expand() {
        let c = categorizer();
        let a = c.categorize("PROP & VAR");
        assert_eq!(a.category, Category::Abbreviation);
        assert_eq!(a.description, "Proposal and Variation");
        assert_eq!(c.categorize(" hr ").description, "Human Resources");
    }

    #[test]
    fn pattern_rules_in_order() {
        let c = categorizer();
        let v = c.categorize("v2.1.3");
        assert_eq!(v.category, Category::VersionNumber);
        assert_eq!(v.description, "Software or document version identifier");
        assert_eq!(category("Build 42"), Category::BuildNumber);
        assert_eq!(category("Appendix C"), Category::DocumentAppendix);
        assert_eq!(category("site plan.PDF"), Category::FileExtension);
        assert_eq!(category("logo.png"), Category::ImageFile);
        assert_eq!(category("Backup Server"), Category::TechnicalTerm);
        assert_eq!(category("Weekly Catchup"), Category::TimePeriod);
        assert_eq!(category("ABC-1234"), Category::CodeIdentifier);
        assert_eq!(category("12345"), Category::NumericIdentifier);
        assert_eq!(category("x"), Category::SingleLetter);
        assert_eq!(category("ZZ"), Category::TwoLetterCode);
    }

    #[test]
    fn companies_and_industries() {
        let c = categorizer();
        let a = c.categorize("Tesla Motors");
        assert_eq!(a.category, Category::Company);
        assert_eq!(a.description, "Known business entity: Tesla Motors");

        let a = c.categorize("Bright and Duggan");
        assert_eq!(a.category, Category::Company);

        let a = c.categorize("Northwind Pty Ltd");
        assert_eq!(a.description, "Business entity with corporate indicator: Northwind Pty Ltd");

        let a = c.categorize("Timber Yard");
        assert_eq!(a.category, Category::IndustryTerm);
        assert_eq!(a.description, "Construction industry term: Timber Yard");
    }

    #[test]
    fn shape_fallbacks() {
        assert_eq!(category("Zyx"), Category::ShortCode);
        assert_eq!(category("Ziz+Zaz"), Category::CodeReference);
        assert_eq!(category("ZYXWV"), Category::Acronym);
        assert_eq!(category("Zyxwv"), Category::SingleName);
        assert_eq!(category("zyxwv"), Category::SingleTerm);
        assert_eq!(category("Acme Industries"), Category::PotentialCompany);
        assert_eq!(category("Acme industries"), Category::MultiWordTerm);
    }

    #[test]
    fn total_over_blank_input() {
        let c = categorizer();
        for name in ["", "   ", "\t"] {
            let a = c.categorize(name);
            assert_eq!(a.category, Category::Unclassified);
            assert_eq!(a.description, "Empty or invalid name");
        }
    }

    #[test]
    fn configured_abbreviations_and_summary() {
        let mut cfg = AppConfig::default();
        cfg.lexicon
            .abbreviations
            .insert("lpa".into(), "Local Project Agreement".into());
        let c = NameCategorizer::new(&cfg).unwrap();
        assert_eq!(c.categorize("LPA").description, "Local Project Agreement");

        let summary = c.category_summary(["HR", "IT", "v1.0", ""]);
        assert_eq!(summary.get(&Category::Abbreviation), Some(&2));
        assert_eq!(summary.get(&Category::VersionNumber), Some(&1));
        assert_eq!(summary.get(&Category::Unclassified), Some(&1));

        let all = c.categorize_all(["HR"]);
        assert_eq!(all[0].0, "HR");
    }

    #[test]
    fn labels_match_serialized_names() {
        let json = serde_json::to_string(&Category::EnvironmentTesting).unwrap();
        assert_eq!(json, "\"Environment/Testing\"");
        assert_eq!(Category::MultiWordTerm.to_string(), "Multi-word Term");
    }
}
