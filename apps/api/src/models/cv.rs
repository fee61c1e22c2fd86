use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::FontFamily;

/// Every editable field of a résumé, in the order the editor shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    Headline,
    Email,
    Phone,
    Location,
    Summary,
    Experience,
    Education,
    Skills,
    Message,
}

impl FieldId {
    pub const ALL: [FieldId; 10] = [
        FieldId::FullName,
        FieldId::Headline,
        FieldId::Email,
        FieldId::Phone,
        FieldId::Location,
        FieldId::Summary,
        FieldId::Experience,
        FieldId::Education,
        FieldId::Skills,
        FieldId::Message,
    ];

    /// Stable identifier used for HTML `id`/`name` attributes and URL segments.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::FullName => "full_name",
            FieldId::Headline => "headline",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::Location => "location",
            FieldId::Summary => "summary",
            FieldId::Experience => "experience",
            FieldId::Education => "education",
            FieldId::Skills => "skills",
            FieldId::Message => "message",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::FullName => "Full name",
            FieldId::Headline => "Headline",
            FieldId::Email => "Email",
            FieldId::Phone => "Phone",
            FieldId::Location => "Location",
            FieldId::Summary => "Summary",
            FieldId::Experience => "Experience",
            FieldId::Education => "Education",
            FieldId::Skills => "Skills",
            FieldId::Message => "Message",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FieldId::FullName => "Ada Lovelace",
            FieldId::Headline => "Analytical engine programmer",
            FieldId::Email => "ada@example.com",
            FieldId::Phone => "+44 20 7946 0000",
            FieldId::Location => "London, UK",
            FieldId::Summary => "A short paragraph about you",
            FieldId::Experience => "One role per paragraph; separate paragraphs with a blank line",
            FieldId::Education => "Degrees, schools, years",
            FieldId::Skills => "Comma-separated skills",
            FieldId::Message => "Type a message",
        }
    }

    /// Long-form fields are edited in a text area rather than a single-line input.
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            FieldId::Summary
                | FieldId::Experience
                | FieldId::Education
                | FieldId::Skills
                | FieldId::Message
        )
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown field '{s}'"))
    }
}

/// A résumé being edited. Field values are free text; nothing is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvDocument {
    pub id: Uuid,
    pub theme: FontFamily,
    pub full_name: String,
    pub headline: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

impl CvDocument {
    pub fn new(theme: FontFamily) -> Self {
        Self {
            id: Uuid::new_v4(),
            theme,
            full_name: String::new(),
            headline: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            summary: String::new(),
            experience: String::new(),
            education: String::new(),
            skills: String::new(),
            message: String::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn field(&self, field: FieldId) -> &str {
        match field {
            FieldId::FullName => &self.full_name,
            FieldId::Headline => &self.headline,
            FieldId::Email => &self.email,
            FieldId::Phone => &self.phone,
            FieldId::Location => &self.location,
            FieldId::Summary => &self.summary,
            FieldId::Experience => &self.experience,
            FieldId::Education => &self.education,
            FieldId::Skills => &self.skills,
            FieldId::Message => &self.message,
        }
    }

    fn field_mut(&mut self, field: FieldId) -> &mut String {
        match field {
            FieldId::FullName => &mut self.full_name,
            FieldId::Headline => &mut self.headline,
            FieldId::Email => &mut self.email,
            FieldId::Phone => &mut self.phone,
            FieldId::Location => &mut self.location,
            FieldId::Summary => &mut self.summary,
            FieldId::Experience => &mut self.experience,
            FieldId::Education => &mut self.education,
            FieldId::Skills => &mut self.skills,
            FieldId::Message => &mut self.message,
        }
    }

    pub fn set_field(&mut self, field: FieldId, value: String) {
        *self.field_mut(field) = value;
        self.updated_at = Utc::now();
    }

    /// Replaces every occurrence of `find` in the field. Returns how many were replaced.
    /// An empty `find` matches nothing.
    pub fn replace_in_field(&mut self, field: FieldId, find: &str, replacement: &str) -> usize {
        if find.is_empty() {
            return 0;
        }
        let current = self.field(field);
        let count = current.matches(find).count();
        if count > 0 {
            let updated = current.replace(find, replacement);
            self.set_field(field, updated);
        }
        count
    }
}
