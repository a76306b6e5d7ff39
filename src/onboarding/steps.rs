//! Static step registry: the ordered wizard pages for each role.

use serde_json::Value;

use super::model::Role;
use super::validation::{Check, FieldErrors, FieldRule, Rule, validate};

const MIN_YEAR_EDUCATION: f64 = 1950.0;

const JOB_TYPES: &[&str] = &["full_time", "part_time", "contract", "internship", "remote"];
const AVAILABILITY: &[&str] = &["immediately", "two_weeks", "one_month", "three_months"];
const COMPANY_SIZES: &[&str] = &["1-10", "11-50", "51-200", "201-500", "501-1000", "1000+"];
const WORK_STYLES: &[&str] = &["remote", "hybrid", "onsite"];
const AGENCY_OFFERINGS: &[&str] = &[
    "permanent_placement",
    "contract_staffing",
    "executive_search",
    "rpo",
    "temporary_staffing",
];

/// One page of the wizard.
///
/// `key` doubles as the top-level field of the role's form document that
/// this step edits, and as the name its section is persisted under.
#[derive(Debug)]
pub struct StepDefinition {
    pub key: &'static str,
    pub title: &'static str,
    pub checks: &'static [Check],
}

impl StepDefinition {
    /// Run this step's rules against the whole form document.
    pub fn validate(&self, form: &Value) -> FieldErrors {
        validate(self.checks, form)
    }

    /// The slice of the form this step persists.
    pub fn section(&self, form: &Value) -> Value {
        form.get(self.key).cloned().unwrap_or(Value::Null)
    }
}

const fn field(path: &'static str, label: &'static str, rules: &'static [Rule]) -> Check {
    Check::Field(FieldRule { path, label, rules })
}

const TEAM_MEMBER_FIELDS: &[FieldRule] = &[
    FieldRule {
        path: "name",
        label: "Name",
        rules: &[Rule::MinLength(2)],
    },
    FieldRule {
        path: "email",
        label: "Email",
        rules: &[Rule::Required, Rule::Email],
    },
    FieldRule {
        path: "role",
        label: "Role",
        rules: &[Rule::MinLength(2)],
    },
];

// ── Candidate ───────────────────────────────────────────────────────

static CANDIDATE_STEPS: [StepDefinition; 5] = [
    StepDefinition {
        key: "personal",
        title: "Personal information",
        checks: &[
            field("personal.full_name", "Full name", &[Rule::MinLength(2)]),
            field("personal.email", "Email", &[Rule::Required, Rule::Email]),
            field("personal.location", "Location", &[Rule::MinLength(2)]),
            field("personal.headline", "Headline", &[Rule::MinLength(5)]),
        ],
    },
    StepDefinition {
        key: "biography",
        title: "About you",
        checks: &[
            field("biography.about", "About", &[Rule::MinLength(100)]),
            field("biography.linkedin_url", "LinkedIn URL", &[Rule::Url]),
            field("biography.portfolio_url", "Portfolio URL", &[Rule::Url]),
        ],
    },
    StepDefinition {
        key: "education",
        title: "Education",
        checks: &[Check::Records {
            path: "education",
            label: "Education",
            min_items: 1,
            fields: &[
                FieldRule {
                    path: "institution",
                    label: "Institution",
                    rules: &[Rule::MinLength(2)],
                },
                FieldRule {
                    path: "degree",
                    label: "Degree",
                    rules: &[Rule::MinLength(2)],
                },
                FieldRule {
                    path: "field_of_study",
                    label: "Field of study",
                    rules: &[Rule::MinLength(2)],
                },
                FieldRule {
                    path: "start_year",
                    label: "Start year",
                    rules: &[Rule::Required, Rule::AtLeast(MIN_YEAR_EDUCATION)],
                },
                FieldRule {
                    path: "end_year",
                    label: "End year",
                    rules: &[Rule::AtLeast(MIN_YEAR_EDUCATION)],
                },
            ],
        }],
    },
    StepDefinition {
        key: "experience",
        title: "Experience",
        checks: &[Check::Records {
            path: "experience",
            label: "Experience",
            min_items: 0,
            fields: &[
                FieldRule {
                    path: "company",
                    label: "Company",
                    rules: &[Rule::MinLength(2)],
                },
                FieldRule {
                    path: "title",
                    label: "Job title",
                    rules: &[Rule::MinLength(2)],
                },
                FieldRule {
                    path: "start_year",
                    label: "Start year",
                    rules: &[Rule::Required, Rule::AtLeast(MIN_YEAR_EDUCATION)],
                },
            ],
        }],
    },
    StepDefinition {
        key: "preferences",
        title: "Skills & preferences",
        checks: &[
            Check::Items {
                path: "preferences.skills",
                label: "Skills",
                min_items: 1,
                rules: &[Rule::MinLength(1)],
            },
            Check::Items {
                path: "preferences.job_types",
                label: "Job types",
                min_items: 1,
                rules: &[Rule::OneOf(JOB_TYPES)],
            },
            field(
                "preferences.availability",
                "Availability",
                &[Rule::Required, Rule::OneOf(AVAILABILITY)],
            ),
            field("preferences.desired_salary", "Desired salary", &[Rule::AtLeast(0.0)]),
        ],
    },
];

// ── Company ─────────────────────────────────────────────────────────

static COMPANY_STEPS: [StepDefinition; 5] = [
    StepDefinition {
        key: "profile",
        title: "Company profile",
        checks: &[
            field("profile.name", "Company name", &[Rule::MinLength(2)]),
            field("profile.website", "Website", &[Rule::Required, Rule::Url]),
            field("profile.industry", "Industry", &[Rule::MinLength(2)]),
            field("profile.size", "Company size", &[Rule::Required, Rule::OneOf(COMPANY_SIZES)]),
        ],
    },
    StepDefinition {
        key: "details",
        title: "Company details",
        checks: &[
            field("details.description", "Description", &[Rule::MinLength(100)]),
            field("details.founded_year", "Founded year", &[Rule::Required, Rule::AtLeast(1800.0)]),
            field("details.headquarters", "Headquarters", &[Rule::MinLength(2)]),
        ],
    },
    StepDefinition {
        key: "culture",
        title: "Culture & benefits",
        checks: &[
            Check::Items {
                path: "culture.values",
                label: "Company values",
                min_items: 1,
                rules: &[Rule::MinLength(1)],
            },
            Check::Items {
                path: "culture.benefits",
                label: "Benefits",
                min_items: 1,
                rules: &[Rule::MinLength(1)],
            },
            field("culture.work_style", "Work style", &[Rule::Required, Rule::OneOf(WORK_STYLES)]),
        ],
    },
    StepDefinition {
        key: "team",
        title: "Hiring team",
        checks: &[Check::Records {
            path: "team",
            label: "Team members",
            min_items: 1,
            fields: TEAM_MEMBER_FIELDS,
        }],
    },
    StepDefinition {
        key: "hiring",
        title: "Hiring needs",
        checks: &[
            Check::Items {
                path: "hiring.open_roles",
                label: "Open roles",
                min_items: 1,
                rules: &[Rule::MinLength(2)],
            },
            field("hiring.hiring_volume", "Hiring volume", &[Rule::Required, Rule::AtLeast(1.0)]),
        ],
    },
];

// ── Agency ──────────────────────────────────────────────────────────

static AGENCY_STEPS: [StepDefinition; 5] = [
    StepDefinition {
        key: "profile",
        title: "Agency profile",
        checks: &[
            field("profile.name", "Agency name", &[Rule::MinLength(2)]),
            field("profile.website", "Website", &[Rule::Required, Rule::Url]),
            field("profile.location", "Location", &[Rule::MinLength(2)]),
            field("profile.founded_year", "Founded year", &[Rule::Required, Rule::AtLeast(1900.0)]),
        ],
    },
    StepDefinition {
        key: "services",
        title: "Services",
        checks: &[
            field("services.description", "Description", &[Rule::MinLength(100)]),
            Check::Items {
                path: "services.offerings",
                label: "Services offered",
                min_items: 1,
                rules: &[Rule::OneOf(AGENCY_OFFERINGS)],
            },
        ],
    },
    StepDefinition {
        key: "specializations",
        title: "Specializations",
        checks: &[
            Check::Items {
                path: "specializations.industries",
                label: "Industries",
                min_items: 1,
                rules: &[Rule::MinLength(2)],
            },
            Check::Items {
                path: "specializations.regions",
                label: "Regions",
                min_items: 1,
                rules: &[Rule::MinLength(2)],
            },
        ],
    },
    StepDefinition {
        key: "team",
        title: "Team setup",
        checks: &[Check::Records {
            path: "team",
            label: "Team members",
            min_items: 1,
            fields: TEAM_MEMBER_FIELDS,
        }],
    },
    StepDefinition {
        key: "terms",
        title: "Terms",
        checks: &[
            field(
                "terms.fee_percentage",
                "Fee percentage",
                &[Rule::Required, Rule::AtLeast(0.0), Rule::AtMost(100.0)],
            ),
            field("terms.guarantee_days", "Guarantee period", &[Rule::Required, Rule::AtLeast(0.0)]),
            Check::Items {
                path: "terms.sourcing_channels",
                label: "Sourcing channels",
                min_items: 1,
                rules: &[Rule::MinLength(2)],
            },
        ],
    },
];

/// The ordered steps for `role`. Never empty.
pub fn steps_for(role: Role) -> &'static [StepDefinition] {
    match role {
        Role::Candidate => &CANDIDATE_STEPS,
        Role::Company => &COMPANY_STEPS,
        Role::Agency => &AGENCY_STEPS,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures;
    use super::*;
    use crate::onboarding::model::RoleFormData;

    fn fields(form: RoleFormData) -> Value {
        form.to_fields().unwrap()
    }

    #[test]
    fn every_role_has_five_steps() {
        for role in Role::ALL {
            assert_eq!(steps_for(role).len(), 5, "{role}");
        }
    }

    #[test]
    fn step_keys_name_top_level_fields() {
        for role in Role::ALL {
            let empty = fields(RoleFormData::empty(role));
            for step in steps_for(role) {
                assert!(empty.get(step.key).is_some(), "{role}: {}", step.key);
            }
        }
    }

    #[test]
    fn valid_fixtures_pass_every_step() {
        let forms = [
            RoleFormData::Candidate(fixtures::candidate()),
            RoleFormData::Company(fixtures::company()),
            RoleFormData::Agency(fixtures::agency()),
        ];
        for form in forms {
            let role = form.role();
            let doc = fields(form);
            for step in steps_for(role) {
                let errors = step.validate(&doc);
                assert!(errors.is_empty(), "{role}/{}: {errors:?}", step.key);
            }
        }
    }

    #[test]
    fn empty_documents_fail_every_step_except_experience() {
        for role in Role::ALL {
            let doc = fields(RoleFormData::empty(role));
            for step in steps_for(role) {
                let errors = step.validate(&doc);
                if step.key == "experience" {
                    assert!(errors.is_empty());
                } else {
                    assert!(!errors.is_empty(), "{role}/{} should fail when empty", step.key);
                }
            }
        }
    }

    #[test]
    fn short_biography_is_rejected() {
        let mut candidate = fixtures::candidate();
        candidate.biography.about = "x".repeat(50);
        let doc = fields(RoleFormData::Candidate(candidate));
        let errors = steps_for(Role::Candidate)[1].validate(&doc);
        assert_eq!(
            errors.get("biography.about"),
            Some("About must be at least 100 characters")
        );
    }

    #[test]
    fn agency_team_requires_a_member() {
        let mut agency = fixtures::agency();
        agency.team.clear();
        let doc = fields(RoleFormData::Agency(agency));
        let team_step = &steps_for(Role::Agency)[3];
        assert_eq!(team_step.key, "team");
        let errors = team_step.validate(&doc);
        assert_eq!(errors.get("team"), Some("Team members must have at least one entry"));
    }

    #[test]
    fn validation_is_step_local() {
        // A broken biography does not affect the education step.
        let mut candidate = fixtures::candidate();
        candidate.biography.about.clear();
        let doc = fields(RoleFormData::Candidate(candidate));
        assert!(steps_for(Role::Candidate)[2].validate(&doc).is_empty());
    }

    #[test]
    fn section_extracts_top_level_slice() {
        let doc = fields(RoleFormData::Company(fixtures::company()));
        let section = steps_for(Role::Company)[0].section(&doc);
        assert_eq!(section["name"], "Acme");
        assert!(section.get("description").is_none());
    }
}
