//! Canonical application form record.
//!
//! Serde names are part of the external JSON contract and must not change.
//! Every field is serialized on every record; unmatched values are `null`
//! and an unmatched qualification list is `[]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured data extracted from one application form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Applicant name as written in block letters.
    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "Permanent Address")]
    pub permanent_address: Address,

    #[serde(rename = "Current Address")]
    pub current_address: Address,

    /// Date of birth as printed, e.g. `12/05/1998`.
    #[serde(rename = "Date of Birth")]
    pub date_of_birth: Option<String>,

    #[serde(rename = "Age")]
    pub age: Option<String>,

    #[serde(rename = "Gender")]
    pub gender: Option<String>,

    /// Ten digit mobile number.
    #[serde(rename = "Mobile")]
    pub mobile: Option<String>,

    #[serde(rename = "Email ID")]
    pub email: Option<String>,

    #[serde(rename = "Emergency Contact")]
    pub emergency_contact: EmergencyContact,

    /// `Yes`/`No`/`Y`/`N` as written on the form.
    #[serde(rename = "Available for Relocation")]
    pub available_for_relocation: Option<String>,

    #[serde(rename = "Educational Qualification")]
    pub education: Vec<Qualification>,
}

/// A postal address block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "Street Address")]
    pub street: Option<String>,

    #[serde(rename = "City")]
    pub city: Option<String>,

    #[serde(rename = "State")]
    pub state: Option<String>,

    /// Digits only.
    #[serde(rename = "Zip Code")]
    pub zip_code: Option<String>,

    #[serde(rename = "Country")]
    pub country: Option<String>,
}

impl Address {
    /// Sub-field labels in rule order.
    pub const FIELDS: [&'static str; 5] = ["Street Address", "City", "State", "Zip Code", "Country"];

    /// Check if the address has any data.
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|v| v.is_none())
    }

    /// Format address as a single line, skipping missing parts.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if let Some(street) = &self.street {
            parts.push(street.clone());
        }
        match (&self.city, &self.zip_code) {
            (Some(city), Some(zip)) => parts.push(format!("{} {}", city, zip)),
            (Some(city), None) => parts.push(city.clone()),
            (None, Some(zip)) => parts.push(zip.clone()),
            (None, None) => {}
        }
        if let Some(state) = &self.state {
            parts.push(state.clone());
        }
        if let Some(country) = &self.country {
            parts.push(country.clone());
        }
        parts.join(", ")
    }

    fn values(&self) -> [&Option<String>; 5] {
        [&self.street, &self.city, &self.state, &self.zip_code, &self.country]
    }
}

impl From<[Option<String>; 5]> for Address {
    fn from([street, city, state, zip_code, country]: [Option<String>; 5]) -> Self {
        Self {
            street,
            city,
            state,
            zip_code,
            country,
        }
    }
}

/// Emergency contact person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(rename = "Name")]
    pub name: Option<String>,

    /// Ten digit phone number.
    #[serde(rename = "Number")]
    pub number: Option<String>,
}

impl EmergencyContact {
    /// Sub-field labels in rule order.
    pub const FIELDS: [&'static str; 2] = ["Name", "Number"];
}

impl From<[Option<String>; 2]> for EmergencyContact {
    fn from([name, number]: [Option<String>; 2]) -> Self {
        Self { name, number }
    }
}

/// One row of the educational qualification table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    #[serde(rename = "Sr No")]
    pub serial: Option<String>,

    #[serde(rename = "Name of the School/ University")]
    pub institution: Option<String>,

    #[serde(rename = "Qualification")]
    pub qualification: Option<String>,

    /// Digits with an optional decimal part.
    #[serde(rename = "% or CGPA")]
    pub score: Option<String>,

    #[serde(rename = "Pass out Year")]
    pub pass_out_year: Option<String>,
}

impl Qualification {
    /// Column labels in capture group order.
    pub const COLUMNS: [&'static str; 5] = [
        "Sr No",
        "Name of the School/ University",
        "Qualification",
        "% or CGPA",
        "Pass out Year",
    ];
}

impl From<Vec<Option<String>>> for Qualification {
    fn from(columns: Vec<Option<String>>) -> Self {
        let mut it = columns.into_iter();
        Self {
            serial: it.next().flatten(),
            institution: it.next().flatten(),
            qualification: it.next().flatten(),
            score: it.next().flatten(),
            pass_out_year: it.next().flatten(),
        }
    }
}

impl Record {
    /// Labels of every declared field that extraction left empty.
    ///
    /// Nested fields are reported as `Group.Field`.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();

        let mut scalar = |label: &str, value: &Option<String>| {
            if value.is_none() {
                missing.push(label.to_string());
            }
        };
        scalar("Name", &self.name);
        for (field, value) in Address::FIELDS.iter().zip(self.permanent_address.values()) {
            scalar(&format!("Permanent Address.{}", field), value);
        }
        for (field, value) in Address::FIELDS.iter().zip(self.current_address.values()) {
            scalar(&format!("Current Address.{}", field), value);
        }
        scalar("Date of Birth", &self.date_of_birth);
        scalar("Age", &self.age);
        scalar("Gender", &self.gender);
        scalar("Mobile", &self.mobile);
        scalar("Email ID", &self.email);
        scalar("Emergency Contact.Name", &self.emergency_contact.name);
        scalar("Emergency Contact.Number", &self.emergency_contact.number);
        scalar("Available for Relocation", &self.available_for_relocation);

        if self.education.is_empty() {
            missing.push("Educational Qualification".to_string());
        }

        missing
    }
}

/// Store-assigned record identifier (UUID v7, time ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A record as persisted, with its identifier.
///
/// Serializes as a single flat object: `{"_id": ..., "Name": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,

    #[serde(flatten)]
    pub record: Record,
}
