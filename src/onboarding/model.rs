//! Roles, per-role onboarding documents, drafts and user records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three kinds of account on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Company,
    Agency,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Candidate, Role::Company, Role::Agency];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Company => "company",
            Self::Agency => "agency",
        }
    }

    /// `/dashboard/{role}`
    pub fn dashboard_path(&self) -> String {
        format!("/dashboard/{}", self.as_str())
    }

    /// `/onboarding/{role}`
    pub fn onboarding_path(&self) -> String {
        format!("/onboarding/{}", self.as_str())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(Self::Candidate),
            "company" => Ok(Self::Company),
            "agency" => Ok(Self::Agency),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

// ── Candidate ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidatePersonal {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: String,
    pub headline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateBiography {
    pub about: String,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidatePreferences {
    pub skills: Vec<String>,
    pub job_types: Vec<String>,
    pub availability: String,
    pub desired_salary: Option<f64>,
}

/// Everything a candidate fills in during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFormData {
    pub personal: CandidatePersonal,
    pub biography: CandidateBiography,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub preferences: CandidatePreferences,
}

// ── Company ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub website: String,
    pub industry: String,
    pub size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyDetails {
    pub description: String,
    pub founded_year: Option<i64>,
    pub headquarters: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyCulture {
    pub values: Vec<String>,
    pub benefits: Vec<String>,
    pub work_style: String,
}

/// A colleague invited during company or agency onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiringNeeds {
    pub open_roles: Vec<String>,
    pub hiring_volume: Option<i64>,
    pub remote_friendly: bool,
}

/// Everything a company fills in during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFormData {
    pub profile: CompanyProfile,
    pub details: CompanyDetails,
    pub culture: CompanyCulture,
    pub team: Vec<TeamMember>,
    pub hiring: HiringNeeds,
}

// ── Agency ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyProfile {
    pub name: String,
    pub website: String,
    pub location: String,
    pub founded_year: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyServices {
    pub description: String,
    pub offerings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencySpecializations {
    pub industries: Vec<String>,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyTerms {
    pub fee_percentage: Option<f64>,
    pub guarantee_days: Option<i64>,
    pub sourcing_channels: Vec<String>,
}

/// Everything an agency fills in during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyFormData {
    pub profile: AgencyProfile,
    pub services: AgencyServices,
    pub specializations: AgencySpecializations,
    pub team: Vec<TeamMember>,
    pub terms: AgencyTerms,
}

// ── Role-tagged document ────────────────────────────────────────────

/// The onboarding document for one user, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleFormData {
    Candidate(CandidateFormData),
    Company(CompanyFormData),
    Agency(AgencyFormData),
}

impl RoleFormData {
    /// An empty document for `role`.
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Candidate => Self::Candidate(CandidateFormData::default()),
            Role::Company => Self::Company(CompanyFormData::default()),
            Role::Agency => Self::Agency(AgencyFormData::default()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Candidate(_) => Role::Candidate,
            Self::Company(_) => Role::Company,
            Self::Agency(_) => Role::Agency,
        }
    }

    /// The document as a JSON object, without the role tag.
    pub fn to_fields(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Candidate(data) => serde_json::to_value(data),
            Self::Company(data) => serde_json::to_value(data),
            Self::Agency(data) => serde_json::to_value(data),
        }
    }

    /// Rebuild a document of `role` from an untagged JSON object.
    pub fn from_fields(role: Role, fields: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match role {
            Role::Candidate => Self::Candidate(serde_json::from_value(fields)?),
            Role::Company => Self::Company(serde_json::from_value(fields)?),
            Role::Agency => Self::Agency(serde_json::from_value(fields)?),
        })
    }
}

/// Durable, resumable snapshot of a user's wizard progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingDraft {
    pub user_id: Uuid,
    pub current_step: usize,
    pub form_data: RoleFormData,
    pub last_updated: DateTime<Utc>,
}

/// A platform user as seen by the onboarding and routing layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Option<Role>,
    pub onboarded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Uuid, email: &str, role: Option<Role>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: email.to_string(),
            role,
            onboarded: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A persisted per-step section of a user's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSection {
    pub section: String,
    pub role: Role,
    pub data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
