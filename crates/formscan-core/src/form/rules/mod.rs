//! Field rules for application forms.
//!
//! A rule set is compiled once from [`PatternConfig`]; a pattern that fails to
//! parse or has the wrong number of capture groups is a configuration error,
//! never a per-document error.

pub mod patterns;

use regex::{Captures, Regex, RegexBuilder};

use crate::error::{FormscanError, Result};
use crate::models::config::PatternConfig;
use crate::models::record::{Address, EmergencyContact, Qualification};

/// Compile a pattern in the mode every field rule uses.
fn compile(label: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .dot_matches_new_line(true)
        .multi_line(true)
        .build()
        .map_err(|e| FormscanError::Config(format!("pattern for '{}': {}", label, e)))
}

/// Trimmed capture group, `None` when absent or blank.
fn capture_value(caps: &Captures<'_>, group: usize) -> Option<String> {
    caps.get(group)
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A single-valued rule with exactly one capture group.
#[derive(Debug, Clone)]
pub struct LeafRule {
    label: String,
    pattern: Regex,
}

impl LeafRule {
    /// Compile a leaf rule, rejecting patterns without exactly one group.
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self> {
        let label = label.into();
        let regex = compile(&label, pattern)?;

        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(FormscanError::Config(format!(
                "pattern for '{}' must have exactly one capture group, found {}",
                label, groups
            )));
        }

        Ok(Self {
            label,
            pattern: regex,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// First match in `text`, trimmed; `None` if unmatched or empty.
    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| capture_value(&caps, 1))
    }
}

/// A nested group of `N` leaf rules.
///
/// Every sub-rule searches the whole text independently, so one missing
/// sub-field never affects its siblings.
#[derive(Debug, Clone)]
pub struct GroupRule<const N: usize> {
    label: String,
    fields: [LeafRule; N],
}

impl<const N: usize> GroupRule<N> {
    /// Compile a group from `(sub-label, pattern)` pairs.
    pub fn new(label: impl Into<String>, fields: [(&str, &str); N]) -> Result<Self> {
        let label = label.into();
        let mut compiled = Vec::with_capacity(N);
        for (field, pattern) in fields {
            compiled.push(LeafRule::new(format!("{}.{}", label, field), pattern)?);
        }
        let fields: [LeafRule; N] = compiled
            .try_into()
            .map_err(|_| FormscanError::Config(format!("group '{}' arity mismatch", label)))?;

        Ok(Self { label, fields })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fields(&self) -> &[LeafRule] {
        &self.fields
    }

    /// Apply every sub-rule, in declaration order.
    pub fn apply(&self, text: &str) -> [Option<String>; N] {
        std::array::from_fn(|i| self.fields[i].apply(text))
    }
}

/// A rule producing a list of rows, one per non-overlapping match.
#[derive(Debug, Clone)]
pub struct RepeatRule {
    label: String,
    pattern: Regex,
    columns: Vec<String>,
    limit: Option<usize>,
}

impl RepeatRule {
    /// Compile a repeat rule whose pattern has one group per column.
    pub fn new(
        label: impl Into<String>,
        pattern: &str,
        columns: &[&str],
        limit: Option<usize>,
    ) -> Result<Self> {
        let label = label.into();
        let regex = compile(&label, pattern)?;

        let groups = regex.captures_len() - 1;
        if groups != columns.len() {
            return Err(FormscanError::Config(format!(
                "pattern for '{}' must have {} capture groups, found {}",
                label,
                columns.len(),
                groups
            )));
        }

        Ok(Self {
            label,
            pattern: regex,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            limit,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Every matching row in document order, up to the configured limit.
    pub fn apply(&self, text: &str) -> Vec<Vec<Option<String>>> {
        let limit = self.limit.unwrap_or(usize::MAX);
        self.pattern
            .captures_iter(text)
            .take(limit)
            .map(|caps| {
                (1..=self.columns.len())
                    .map(|group| capture_value(&caps, group))
                    .collect()
            })
            .collect()
    }
}

/// Borrowed view of one rule in a [`FormRules`] set.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule<'a> {
    /// One scalar value.
    Leaf(&'a LeafRule),
    /// A nested record of scalar values.
    Group {
        label: &'a str,
        fields: &'a [LeafRule],
    },
    /// A list of rows.
    Repeat(&'a RepeatRule),
}

impl<'a> FieldRule<'a> {
    /// Label of the rule, borrowed from the rule set.
    pub fn label(&self) -> &'a str {
        match *self {
            FieldRule::Leaf(rule) => rule.label(),
            FieldRule::Group { label, .. } => label,
            FieldRule::Repeat(rule) => rule.label(),
        }
    }

    /// Short name of the rule kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldRule::Leaf(_) => "leaf",
            FieldRule::Group { .. } => "group",
            FieldRule::Repeat(_) => "repeat",
        }
    }
}

/// The compiled rule set for the application form.
///
/// Field order matches the record and is fixed.
#[derive(Debug, Clone)]
pub struct FormRules {
    pub name: LeafRule,
    pub permanent_address: GroupRule<5>,
    pub current_address: GroupRule<5>,
    pub date_of_birth: LeafRule,
    pub age: LeafRule,
    pub gender: LeafRule,
    pub mobile: LeafRule,
    pub email: LeafRule,
    pub emergency_contact: GroupRule<2>,
    pub available_for_relocation: LeafRule,
    pub education: RepeatRule,
}

impl FormRules {
    /// Compile every pattern in `config`.
    pub fn compile(config: &PatternConfig, max_qualifications: Option<usize>) -> Result<Self> {
        let address = |label: &str, patterns: [&str; 5]| -> Result<GroupRule<5>> {
            GroupRule::new(
                label,
                std::array::from_fn(|i| (Address::FIELDS[i], patterns[i])),
            )
        };

        let contact = &config.emergency_contact;

        Ok(Self {
            name: LeafRule::new("Name", &config.name)?,
            permanent_address: address(
                "Permanent Address",
                config.permanent_address.to_array(),
            )?,
            current_address: address("Current Address", config.current_address.to_array())?,
            date_of_birth: LeafRule::new("Date of Birth", &config.date_of_birth)?,
            age: LeafRule::new("Age", &config.age)?,
            gender: LeafRule::new("Gender", &config.gender)?,
            mobile: LeafRule::new("Mobile", &config.mobile)?,
            email: LeafRule::new("Email ID", &config.email)?,
            emergency_contact: GroupRule::new(
                "Emergency Contact",
                [
                    (EmergencyContact::FIELDS[0], contact.name.as_str()),
                    (EmergencyContact::FIELDS[1], contact.number.as_str()),
                ],
            )?,
            available_for_relocation: LeafRule::new(
                "Available for Relocation",
                &config.available_for_relocation,
            )?,
            education: RepeatRule::new(
                "Educational Qualification",
                &config.education,
                &Qualification::COLUMNS,
                max_qualifications,
            )?,
        })
    }

    /// The built-in rule set.
    pub fn builtin() -> &'static FormRules {
        &patterns::DEFAULT_RULES
    }

    /// Every rule in record order.
    pub fn iter(&self) -> impl Iterator<Item = FieldRule<'_>> {
        [
            FieldRule::Leaf(&self.name),
            FieldRule::Group {
                label: self.permanent_address.label(),
                fields: self.permanent_address.fields(),
            },
            FieldRule::Group {
                label: self.current_address.label(),
                fields: self.current_address.fields(),
            },
            FieldRule::Leaf(&self.date_of_birth),
            FieldRule::Leaf(&self.age),
            FieldRule::Leaf(&self.gender),
            FieldRule::Leaf(&self.mobile),
            FieldRule::Leaf(&self.email),
            FieldRule::Group {
                label: self.emergency_contact.label(),
                fields: self.emergency_contact.fields(),
            },
            FieldRule::Leaf(&self.available_for_relocation),
            FieldRule::Repeat(&self.education),
        ]
        .into_iter()
    }
}
