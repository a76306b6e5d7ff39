//! Declarative field rules evaluated against a step's slice of the form.
//!
//! Each wizard step owns a static list of [`Check`]s. Checks address fields
//! by dotted path from the document root (`biography.about`) and list checks
//! expand to indexed paths (`education.0.degree`). The result is a
//! [`FieldErrors`] map keyed by those paths.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+(?::\d{1,5})?(?:[/?#]\S*)?$")
        .expect("URL pattern compiles")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Value must be present (not null, not blank).
    Required,
    /// String must have at least this many characters, ignoring surrounding whitespace.
    MinLength(usize),
    /// Array must have at least one element.
    NonEmpty,
    /// Number must be >= the bound.
    AtLeast(f64),
    /// Number must be <= the bound.
    AtMost(f64),
    /// String must be one of the listed values.
    OneOf(&'static [&'static str]),
    /// String must be an http(s) URL with a host.
    Url,
    /// String must look like an email address.
    Email,
}

/// Rules for one addressable field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub label: &'static str,
    pub rules: &'static [Rule],
}

/// A step-level check.
#[derive(Debug, Clone, Copy)]
pub enum Check {
    /// Rules on a single field.
    Field(FieldRule),
    /// A list of records: minimum length, then field rules per entry.
    /// Entry paths are relative to the entry.
    Records {
        path: &'static str,
        label: &'static str,
        min_items: usize,
        fields: &'static [FieldRule],
    },
    /// A list of scalars: minimum length, then rules per element.
    Items {
        path: &'static str,
        label: &'static str,
        min_items: usize,
        rules: &'static [Rule],
    },
}

/// Dotted field path → human-readable message, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Record an error unless the path already has one (first failure wins).
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }
}

/// Evaluate `checks` against the full form document.
pub fn validate(checks: &[Check], form: &Value) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for check in checks {
        match check {
            Check::Field(field) => {
                check_field(&mut errors, field.path, field.label, field.rules, lookup(form, field.path));
            }
            Check::Records {
                path,
                label,
                min_items,
                fields,
            } => {
                let entries = lookup(form, path).and_then(Value::as_array);
                let count = entries.map(Vec::len).unwrap_or(0);
                if count < *min_items {
                    errors.insert(*path, min_items_message(label, *min_items));
                }
                for (index, entry) in entries.into_iter().flatten().enumerate() {
                    for field in fields.iter() {
                        let full_path = format!("{path}.{index}.{}", field.path);
                        check_field(&mut errors, &full_path, field.label, field.rules, lookup(entry, field.path));
                    }
                }
            }
            Check::Items {
                path,
                label,
                min_items,
                rules,
            } => {
                let items = lookup(form, path).and_then(Value::as_array);
                let count = items.map(Vec::len).unwrap_or(0);
                if count < *min_items {
                    errors.insert(*path, min_items_message(label, *min_items));
                }
                for (index, item) in items.into_iter().flatten().enumerate() {
                    check_field(&mut errors, &format!("{path}.{index}"), label, rules, Some(item));
                }
            }
        }
    }
    errors
}

fn min_items_message(label: &str, min_items: usize) -> String {
    if min_items == 1 {
        format!("{label} must have at least one entry")
    } else {
        format!("{label} must have at least {min_items} entries")
    }
}

/// Follow a dotted path through objects and arrays.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_field(
    errors: &mut FieldErrors,
    path: &str,
    label: &str,
    rules: &[Rule],
    value: Option<&Value>,
) {
    if is_blank(value) {
        // Optional fields only constrain values that were actually given.
        let mandatory = rules
            .iter()
            .any(|r| matches!(r, Rule::Required | Rule::MinLength(_) | Rule::NonEmpty));
        if mandatory {
            errors.insert(path, format!("{label} is required"));
        }
        return;
    }

    for rule in rules {
        if let Some(message) = apply(rule, label, value) {
            errors.insert(path, message);
            return;
        }
    }
}

fn apply(rule: &Rule, label: &str, value: Option<&Value>) -> Option<String> {
    match rule {
        Rule::Required => None,
        Rule::MinLength(min) => {
            let len = value
                .and_then(Value::as_str)
                .map(|s| s.trim().chars().count())
                .unwrap_or(0);
            (len < *min).then(|| format!("{label} must be at least {min} characters"))
        }
        Rule::NonEmpty => {
            let empty = value.and_then(Value::as_array).is_none_or(|a| a.is_empty());
            empty.then(|| format!("{label} must have at least one entry"))
        }
        Rule::AtLeast(min) => match value.and_then(Value::as_f64) {
            Some(n) if n >= *min => None,
            Some(_) => Some(format!("{label} must be at least {min}")),
            None => Some(format!("{label} must be a number")),
        },
        Rule::AtMost(max) => match value.and_then(Value::as_f64) {
            Some(n) if n <= *max => None,
            Some(_) => Some(format!("{label} must be at most {max}")),
            None => Some(format!("{label} must be a number")),
        },
        Rule::OneOf(allowed) => {
            let ok = value
                .and_then(Value::as_str)
                .is_some_and(|s| allowed.contains(&s));
            (!ok).then(|| format!("{label} must be one of: {}", allowed.join(", ")))
        }
        Rule::Url => {
            let ok = value
                .and_then(Value::as_str)
                .is_some_and(|s| URL_RE.is_match(s.trim()));
            (!ok).then(|| format!("{label} must be a valid URL"))
        }
        Rule::Email => {
            let ok = value
                .and_then(Value::as_str)
                .is_some_and(|s| EMAIL_RE.is_match(s.trim()));
            (!ok).then(|| format!("{label} must be a valid email address"))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const NAME: Check = Check::Field(FieldRule {
        path: "profile.name",
        label: "Name",
        rules: &[Rule::MinLength(2)],
    });

    const SITE: Check = Check::Field(FieldRule {
        path: "profile.website",
        label: "Website",
        rules: &[Rule::Url],
    });

    #[test]
    fn min_length_counts_trimmed_characters() {
        let errors = validate(&[NAME], &json!({"profile": {"name": " a "}}));
        assert_eq!(errors.get("profile.name"), Some("Name must be at least 2 characters"));

        let errors = validate(&[NAME], &json!({"profile": {"name": "Zoë"}}));
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_mandatory_field_is_required() {
        let errors = validate(&[NAME], &json!({}));
        assert_eq!(errors.get("profile.name"), Some("Name is required"));
    }

    #[test]
    fn optional_field_skipped_when_blank() {
        assert!(validate(&[SITE], &json!({"profile": {}})).is_empty());
        assert!(validate(&[SITE], &json!({"profile": {"website": ""}})).is_empty());
        assert!(validate(&[SITE], &json!({"profile": {"website": null}})).is_empty());
    }

    #[test]
    fn url_rule() {
        for good in ["https://acme.io", "http://www.acme.co.uk/jobs?x=1", "https://a-b.dev:8443/"] {
            assert!(validate(&[SITE], &json!({"profile": {"website": good}})).is_empty(), "{good}");
        }
        for bad in ["acme.io", "ftp://acme.io", "https://", "https://localhost", "https://ac me.io"] {
            let errors = validate(&[SITE], &json!({"profile": {"website": bad}}));
            assert_eq!(errors.get("profile.website"), Some("Website must be a valid URL"), "{bad}");
        }
    }

    #[test]
    fn email_rule() {
        let check = Check::Field(FieldRule {
            path: "email",
            label: "Email",
            rules: &[Rule::Required, Rule::Email],
        });
        assert!(validate(&[check], &json!({"email": "sam@acme.io"})).is_empty());
        let errors = validate(&[check], &json!({"email": "sam@acme"}));
        assert_eq!(errors.get("email"), Some("Email must be a valid email address"));
    }

    #[test]
    fn numeric_bounds() {
        let check = Check::Field(FieldRule {
            path: "fee",
            label: "Fee",
            rules: &[Rule::Required, Rule::AtLeast(0.0), Rule::AtMost(100.0)],
        });
        assert!(validate(&[check], &json!({"fee": 20})).is_empty());
        assert_eq!(
            validate(&[check], &json!({"fee": -1})).get("fee"),
            Some("Fee must be at least 0")
        );
        assert_eq!(
            validate(&[check], &json!({"fee": 101.5})).get("fee"),
            Some("Fee must be at most 100")
        );
        assert_eq!(
            validate(&[check], &json!({"fee": "twenty"})).get("fee"),
            Some("Fee must be a number")
        );
        assert_eq!(validate(&[check], &json!({})).get("fee"), Some("Fee is required"));
    }

    #[test]
    fn one_of_rule() {
        let check = Check::Field(FieldRule {
            path: "style",
            label: "Work style",
            rules: &[Rule::Required, Rule::OneOf(&["remote", "hybrid"])],
        });
        assert!(validate(&[check], &json!({"style": "hybrid"})).is_empty());
        assert_eq!(
            validate(&[check], &json!({"style": "office"})).get("style"),
            Some("Work style must be one of: remote, hybrid")
        );
    }

    #[test]
    fn records_check_min_items_and_entries() {
        let check = Check::Records {
            path: "team",
            label: "Team members",
            min_items: 1,
            fields: &[FieldRule {
                path: "email",
                label: "Email",
                rules: &[Rule::Required, Rule::Email],
            }],
        };

        let errors = validate(&[check], &json!({"team": []}));
        assert_eq!(errors.get("team"), Some("Team members must have at least one entry"));

        let errors = validate(&[check], &json!({}));
        assert!(errors.contains("team"));

        let errors = validate(
            &[check],
            &json!({"team": [{"email": "a@b.co"}, {"email": "nope"}, {}]}),
        );
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("team.1.email"));
        assert_eq!(errors.get("team.2.email"), Some("Email is required"));
    }

    #[test]
    fn items_check_validates_each_element() {
        let check = Check::Items {
            path: "job_types",
            label: "Job type",
            min_items: 1,
            rules: &[Rule::OneOf(&["full_time", "contract"])],
        };
        assert!(validate(&[check], &json!({"job_types": ["contract"]})).is_empty());
        let errors = validate(&[check], &json!({"job_types": ["contract", "gig"]}));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("job_types.1"));
    }

    #[test]
    fn first_failing_rule_wins() {
        let check = Check::Field(FieldRule {
            path: "site",
            label: "Site",
            rules: &[Rule::MinLength(20), Rule::Url],
        });
        let errors = validate(&[check], &json!({"site": "bad"}));
        assert_eq!(errors.get("site"), Some("Site must be at least 20 characters"));
    }

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let doc = json!({"a": {"b": [{"c": 1}]}});
        assert_eq!(lookup(&doc, "a.b.0.c"), Some(&json!(1)));
        assert_eq!(lookup(&doc, "a.b.1.c"), None);
        assert_eq!(lookup(&doc, "a.x"), None);
    }

    #[test]
    fn errors_serialize_as_flat_map() {
        let mut errors = FieldErrors::new();
        errors.insert("b", "second");
        errors.insert("a", "first");
        errors.insert("a", "ignored");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"a": "first", "b": "second"})
        );
    }
}
