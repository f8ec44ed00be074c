//! # Vaccination Schedule Rules
//!
//! A [`ScheduleRules`] value is an ordered list of vaccines, each with the dose
//! windows at which it is due. Deriving a child's schedule from it is a pure
//! function of the date of birth and gender: nothing here is persisted, so a
//! change to the rules is reflected the next time records are listed.
//!
//! The built-in rule set is only a default. Deployments replace it with a YAML
//! file of the same shape:
//!
//! ```yaml
//! vaccines:
//!   - name: BCG
//!     doses: ["0 days"]
//!   - name: HPV
//!     doses: ["9 years", "9-10 years"]
//!     genders: ["F"]
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::domain::models::schedule::{DoseWindow, ScheduledDose};
use crate::error::ConfigError;

/// Built-in rule table, as `(vaccine, comma-separated dose windows)`
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("BCG", "0 days"),
    ("Hepatitis B", "0 days, 6 weeks, 14 weeks"),
    ("DTaP", "6 weeks, 10 weeks, 14 weeks, 15-18 months, 4-6 years"),
    ("Hib", "6 weeks, 10 weeks, 14 weeks, 15-18 months"),
    ("PCV", "6 weeks, 10 weeks, 14 weeks, 15-18 months"),
    ("IPV", "6 weeks, 10 weeks, 14 weeks, 4-6 years"),
    ("Rotavirus", "6 weeks, 10 weeks, 14 weeks"),
    ("MMR", "12-15 months, 4-6 years"),
    ("Varicella", "12-15 months, 4-6 years"),
];

/// One vaccine and the windows at which its doses are due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineRule {
    pub name: String,
    pub doses: Vec<DoseWindow>,
    /// Restricts the vaccine to these genders (case-insensitive); `None` means everyone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<String>>,
}

impl VaccineRule {
    pub fn applies_to(&self, gender: &str) -> bool {
        match &self.genders {
            None => true,
            Some(genders) => genders.iter().any(|g| g.trim().eq_ignore_ascii_case(gender.trim())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRules {
    pub vaccines: Vec<VaccineRule>,
}

impl ScheduleRules {
    /// The default rule set shipped with the registry
    pub fn builtin() -> Self {
        let vaccines = BUILTIN_RULES
            .iter()
            .map(|(name, doses)| VaccineRule {
                name: name.to_string(),
                doses: doses
                    .split(',')
                    .filter_map(|dose| dose.parse().ok())
                    .collect(),
                genders: None,
            })
            .collect();

        Self { vaccines }
    }

    /// Parse and validate a YAML rule set
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let rules: ScheduleRules = serde_yaml::from_str(yaml)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load a YAML rule set from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::ScheduleFile {
            path: path.display().to_string(),
            source,
        })?;
        let rules = Self::from_yaml_str(&yaml)?;
        info!(
            "Loaded {} vaccine rules from {}",
            rules.vaccines.len(),
            path.display()
        );
        Ok(rules)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.vaccines.is_empty() {
            return Err(ConfigError::ScheduleRule {
                vaccine: "<none>".to_string(),
                reason: "rule set must contain at least one vaccine".to_string(),
            });
        }

        for rule in &self.vaccines {
            let invalid = |reason: &str| ConfigError::ScheduleRule {
                vaccine: rule.name.clone(),
                reason: reason.to_string(),
            };

            if rule.name.trim().is_empty() {
                return Err(invalid("vaccine name cannot be empty"));
            }
            if rule.doses.is_empty() {
                return Err(invalid("at least one dose is required"));
            }
            if let Some(genders) = &rule.genders {
                if genders.is_empty() || genders.iter().any(|g| g.trim().is_empty()) {
                    return Err(invalid("genders must be omitted or list non-empty values"));
                }
            }
        }

        Ok(())
    }

    /// Derive the schedule for a child born on `dob`.
    ///
    /// Doses are ordered by start date; doses due on the same day keep the
    /// order of the rule set.
    pub fn derive_schedule(&self, dob: NaiveDate, gender: &str) -> Vec<ScheduledDose> {
        let mut doses: Vec<ScheduledDose> = self
            .vaccines
            .iter()
            .filter(|rule| rule.applies_to(gender))
            .flat_map(|rule| {
                rule.doses.iter().filter_map(move |window| {
                    let Some(start) = window.start_date(dob) else {
                        debug!("Skipping {} ({}) for {}: date out of range", rule.name, window, dob);
                        return None;
                    };
                    Some(ScheduledDose {
                        vaccine: rule.name.clone(),
                        window: *window,
                        start,
                        end: window.end_date(dob),
                    })
                })
            })
            .collect();

        // stable: ties keep rule-set order
        doses.sort_by_key(|dose| dose.start);
        doses
    }

    /// Derive the schedule and render each dose as a display label
    pub fn schedule_labels(&self, dob: NaiveDate, gender: &str) -> Vec<String> {
        self.derive_schedule(dob, gender)
            .iter()
            .map(ScheduledDose::label)
            .collect()
    }
}

impl Default for ScheduleRules {
    fn default() -> Self {
        Self::builtin()
    }
}
