//! Quality tier classification
//!
//! Maps source qualifier codes onto the three-tier quality scale. A sample
//! carrying several codes takes the worst tier among them; unrecognized codes
//! leave a sample `good`.

use crate::app::models::QualityTier;
use crate::config::QualityConfig;
use std::collections::HashSet;

/// Classifier holding the fair and poor qualifier code sets
#[derive(Debug, Clone)]
pub struct QualityClassifier {
    fair_codes: HashSet<String>,
    poor_codes: HashSet<String>,
}

impl QualityClassifier {
    /// Create a classifier from explicit code sets
    pub fn new<I, J, S>(fair_codes: I, poor_codes: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fair_codes: fair_codes.into_iter().map(Into::into).collect(),
            poor_codes: poor_codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a classifier from the `[quality]` config section
    pub fn from_config(config: &QualityConfig) -> Self {
        Self::new(config.fair_codes.iter().cloned(), config.poor_codes.iter().cloned())
    }

    /// Tier of a single qualifier code
    pub fn classify_code(&self, code: &str) -> QualityTier {
        let code = code.trim();
        if self.poor_codes.contains(code) {
            QualityTier::Poor
        } else if self.fair_codes.contains(code) {
            QualityTier::Fair
        } else {
            QualityTier::Good
        }
    }

    /// Tier of a sample from all of its qualifier codes
    pub fn classify<S: AsRef<str>>(&self, codes: &[S]) -> QualityTier {
        QualityTier::worst_of(codes.iter().map(|code| self.classify_code(code.as_ref())))
    }
}

impl Default for QualityClassifier {
    fn default() -> Self {
        Self::from_config(&QualityConfig::default())
    }
}
