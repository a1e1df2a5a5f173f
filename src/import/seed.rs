//! Seed file model and normalization rules.
//!
//! The seed is a static JSON document shaped as
//! `{ main: {...profile}, resume: { skills, work, education, certificates } }`,
//! used only for one-time migration into the live store.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ImportError;

// ============================================================================
// Seed Model
// ============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedFile {
    #[serde(default)]
    pub main: Option<Value>,
    #[serde(default)]
    pub resume: Option<ResumeSeed>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResumeSeed {
    #[serde(default)]
    pub skills: Vec<Value>,
    #[serde(default)]
    pub work: Vec<Value>,
    #[serde(default)]
    pub education: Vec<Value>,
    #[serde(default)]
    pub certificates: Vec<Value>,
}

impl SeedFile {
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The profile singleton object. Unlike the other sections it is a
    /// single object under `main`, not an array.
    pub fn profile(&self) -> Result<&Value, ImportError> {
        match &self.main {
            Some(profile) if profile.is_object() => Ok(profile),
            _ => Err(ImportError::MissingSection("profile")),
        }
    }

    pub fn skills(&self) -> Result<&[Value], ImportError> {
        self.section("skills", |r| &r.skills)
    }

    pub fn work(&self) -> Result<&[Value], ImportError> {
        self.section("work experience", |r| &r.work)
    }

    pub fn education(&self) -> Result<&[Value], ImportError> {
        self.section("education", |r| &r.education)
    }

    pub fn certificates(&self) -> Result<&[Value], ImportError> {
        self.section("certificates", |r| &r.certificates)
    }

    fn section(
        &self,
        name: &'static str,
        get: impl Fn(&ResumeSeed) -> &Vec<Value>,
    ) -> Result<&[Value], ImportError> {
        match self.resume.as_ref().map(get) {
            Some(items) if !items.is_empty() => Ok(items),
            _ => Err(ImportError::MissingSection(name)),
        }
    }
}

// ============================================================================
// Skill Categories
// ============================================================================

const FRONTEND_SKILLS: &[&str] = &[
    "JavaScript", "React", "HTML5", "CSS", "TypeScript", "Angular", "GraphQL", "Svelte",
];
const BACKEND_SKILLS: &[&str] = &[
    "Node.js", "Python", "PHP/Hack", "SQL/MySQL", "MongoDB", "Firebase",
];
const DEVOPS_SKILLS: &[&str] = &[
    "Git", "Mercurial", "CI/CD", "Docker", "Vercel", "AWS", "GCP",
];

/// Category for a skill name, from the fixed membership lists. Unmatched
/// names land in "Other Skills".
pub fn skill_category(name: &str) -> &'static str {
    if FRONTEND_SKILLS.contains(&name) {
        "Frontend"
    } else if BACKEND_SKILLS.contains(&name) {
        "Backend"
    } else if DEVOPS_SKILLS.contains(&name) {
        "Tools & DevOps"
    } else {
        "Other Skills"
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Strip a leading `./` relative-path marker from a certificate's `image`
/// field before storage.
pub fn strip_relative_prefix(certificate: &mut Value) {
    if let Some(Value::String(image)) = certificate.get_mut("image") {
        if let Some(stripped) = image.strip_prefix("./") {
            *image = stripped.to_string();
        }
    }
}

/// Legacy profiles encode `occupation` as a bracketed comma-separated string
/// (`"[Engineer, Designer]"`). Parse it into an array of trimmed strings;
/// when nothing parseable is inside, log and keep the original verbatim.
pub fn normalize_occupation(profile: &mut Value) {
    let Some(Value::String(raw)) = profile.get("occupation") else {
        return;
    };
    let trimmed = raw.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return;
    }

    let inner = &trimmed[1..trimmed.len() - 1];
    let parts: Vec<Value> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
        .collect();

    if parts.is_empty() {
        tracing::warn!(occupation = %raw, "could not parse occupation string, keeping as-is");
        return;
    }
    profile["occupation"] = Value::Array(parts);
}

// ============================================================================
// Tests
// ============================================================================
