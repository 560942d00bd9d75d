use crate::error::ConfigError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};

/// Compile a case-insensitive pattern. `anchored` pins it to the start of
/// the input.
pub(crate) fn compile_pattern(
    kind: &'static str,
    pattern: &str,
    anchored: bool,
) -> Result<Regex, ConfigError> {
    let source = if anchored {
        format!("^(?:{pattern})")
    } else {
        pattern.to_string()
    };
    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
            source: Box::new(e),
        })
}

/// Ordered list of non-candidate name patterns. The first match wins.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    patterns: Vec<(String, Regex)>,
}

impl ExclusionFilter {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| compile_pattern("exclusion", p, true).map(|re| (p.clone(), re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        let name = name.trim();
        name.is_empty() || self.patterns.iter().any(|(_, re)| re.is_match(name))
    }

    /// The pattern text responsible for excluding `name`, if any. Blank names
    /// are reported as `<empty>`.
    pub fn matching_pattern(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        if name.is_empty() {
            return Some("<empty>");
        }
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(name))
            .map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Glob filter over the Path column.
#[derive(Debug, Clone)]
pub struct PathFilter {
    set: Option<GlobSet>,
}

impl PathFilter {
    pub fn new(globs: &[String]) -> Result<Self, ConfigError> {
        if globs.is_empty() {
            return Ok(Self { set: None });
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in globs {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                kind: "path",
                pattern: pattern.clone(),
                source: Box::new(e),
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| ConfigError::InvalidPattern {
            kind: "path",
            pattern: globs.join(", "),
            source: Box::new(e),
        })?;
        Ok(Self { set: Some(set) })
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        match &self.set {
            Some(set) if !path.is_empty() => set.is_match(path),
            _ => false,
        }
    }
}
