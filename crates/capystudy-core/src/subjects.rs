//! Study subjects and the study-time accumulator.
//!
//! Subjects only gain time through [`SubjectBook::add_minutes`], which the
//! desk calls when a focus session completes. The book never becomes empty
//! through deletion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

pub const DEFAULT_SUBJECT_COLOR: &str = "#fbbf24";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Cumulative minutes studied.
    #[serde(default)]
    pub total_time_studied: u64,
}

/// The persisted list of subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectBook {
    subjects: Vec<Subject>,
}

impl Default for SubjectBook {
    fn default() -> Self {
        Self::from_subjects(vec![
            seeded("1", "Mathematics", "#3b82f6", 120),
            seeded("2", "History", "#10b981", 45),
            seeded("3", "Science", "#8b5cf6", 180),
        ])
    }
}

fn seeded(id: &str, name: &str, color: &str, minutes: u64) -> Subject {
    Subject {
        id: id.into(),
        name: name.into(),
        color: color.into(),
        total_time_studied: minutes,
    }
}

impl SubjectBook {
    pub fn from_subjects(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn list(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.subjects.first().map(|s| s.id.as_str())
    }

    /// Sum of every subject's studied minutes.
    pub fn total_minutes(&self) -> u64 {
        self.subjects.iter().map(|s| s.total_time_studied).sum()
    }

    /// Create a subject with zero studied time.
    ///
    /// # Errors
    /// Blank names and colors that are not `#rgb`/`#rrggbb` are rejected.
    pub fn add(&mut self, name: &str, color: Option<&str>) -> Result<&Subject, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        let color = color.unwrap_or(DEFAULT_SUBJECT_COLOR).trim();
        if !is_hex_color(color) {
            return Err(ValidationError::InvalidValue {
                field: "color",
                message: format!("'{color}' is not a hex color like #3b82f6"),
            });
        }

        self.subjects.push(Subject {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: color.to_lowercase(),
            total_time_studied: 0,
        });
        let added = &self.subjects[self.subjects.len() - 1];
        tracing::debug!(id = %added.id, name = %added.name, "subject added");
        Ok(added)
    }

    /// Remove a subject. Returns false (and changes nothing) when the id is
    /// unknown or it is the last remaining subject.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.subjects.len() <= 1 {
            return false;
        }
        let before = self.subjects.len();
        self.subjects.retain(|s| s.id != id);
        self.subjects.len() != before
    }

    /// Credit `minutes` to a subject. Unknown ids and zero minutes are
    /// ignored; subjects are never created implicitly.
    pub fn add_minutes(&mut self, id: &str, minutes: u32) -> bool {
        if minutes == 0 {
            return false;
        }
        match self.subjects.iter_mut().find(|s| s.id == id) {
            Some(subject) => {
                subject.total_time_studied = subject
                    .total_time_studied
                    .saturating_add(u64::from(minutes));
                true
            }
            None => {
                tracing::debug!(id, "ignoring study time for unknown subject");
                false
            }
        }
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
