//! Rule application: recovered text in, record out.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::rules::FormRules;
use super::Extractor;
use crate::models::record::{Address, EmergencyContact, Qualification, Record};

/// Apply `rules` to `text`.
///
/// Pure and deterministic: identical inputs always produce identical records.
pub fn extract(text: &str, rules: &FormRules) -> Record {
    Record {
        name: rules.name.apply(text),
        permanent_address: Address::from(rules.permanent_address.apply(text)),
        current_address: Address::from(rules.current_address.apply(text)),
        date_of_birth: rules.date_of_birth.apply(text),
        age: rules.age.apply(text),
        gender: rules.gender.apply(text),
        mobile: rules.mobile.apply(text),
        email: rules.email.apply(text),
        emergency_contact: EmergencyContact::from(rules.emergency_contact.apply(text)),
        available_for_relocation: rules.available_for_relocation.apply(text),
        education: rules
            .education
            .apply(text)
            .into_iter()
            .map(Qualification::from)
            .collect(),
    }
}

impl Extractor for FormRules {
    fn extract_from_text(&self, text: &str) -> Record {
        extract(text, self)
    }
}

/// Result of one extraction, with diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Extracted record.
    pub record: Record,
    /// Fields the rules did not match.
    pub missing_fields: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    /// Run `extractor` over `text` and collect diagnostics.
    pub fn run<E: Extractor + ?Sized>(extractor: &E, text: &str) -> Self {
        let start = Instant::now();

        info!("Extracting form fields from {} characters of text", text.len());

        let record = extractor.extract_from_text(text);
        let missing_fields = record.missing_fields();

        debug!(
            "Extracted record with {} unmatched fields",
            missing_fields.len()
        );

        Self {
            record,
            missing_fields,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_FORM: &str = "\
APPLICATION FORM
1. Name (Block Letters- As specified on Passport or Pan Card): PRIYA SHARMA
2. Permanent Address: 3.1 Street Address: 45 MG Road
3.2 City: Nagpur 3.3 State: Maharashtra
3.4 Zip Code: 440001
3.5 Country: India
3. Current Address: 3.1 Street Address: 12 Oak Rd
3.2 City: Pune 3.3 State: MH
3.4 Zip Code: 411001
3.5 Country: India
4. Date of Birth: 12/05/1998 5. Age: 26
6. Gender: Female
7. Mobile: 9876543210
8. Email ID: priya.sharma@example.com
9. Name of Emergency Contact: RAVI SHARMA
10. Emergency Contact's Number: 9123456780
11. Available for Relocation: Yes
EDUCATIONAL QUALIFICATION
Sr No. 1 Name of the School/ University: Pune University Qualification: B.E. % or CGPA: 8.4 Pass out Year: 2020
Sr No. 2 Name of the School/ University: City College Qualification: HSC % or CGPA: 78 Pass out Year: 2016
";

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_extract_full_form() {
        let record = extract(FULL_FORM, FormRules::builtin());

        assert_eq!(record.name, s("PRIYA SHARMA"));
        assert_eq!(
            record.permanent_address,
            Address {
                street: s("45 MG Road"),
                city: s("Nagpur"),
                state: s("Maharashtra"),
                zip_code: s("440001"),
                country: s("India"),
            }
        );
        assert_eq!(record.current_address.street, s("12 Oak Rd"));
        assert_eq!(record.current_address.city, s("Pune"));
        assert_eq!(record.date_of_birth, s("12/05/1998"));
        assert_eq!(record.age, s("26"));
        assert_eq!(record.gender, s("Female"));
        assert_eq!(record.mobile, s("9876543210"));
        assert_eq!(record.email, s("priya.sharma@example.com"));
        assert_eq!(
            record.emergency_contact,
            EmergencyContact {
                name: s("RAVI SHARMA"),
                number: s("9123456780"),
            }
        );
        assert_eq!(record.available_for_relocation, s("Yes"));
        assert_eq!(
            record.education,
            vec![
                Qualification {
                    serial: s("1"),
                    institution: s("Pune University"),
                    qualification: s("B.E."),
                    score: s("8.4"),
                    pass_out_year: s("2020"),
                },
                Qualification {
                    serial: s("2"),
                    institution: s("City College"),
                    qualification: s("HSC"),
                    score: s("78"),
                    pass_out_year: s("2016"),
                },
            ]
        );
    }

    #[test]
    fn test_unlabelled_text_yields_empty_record() {
        for text in ["", "lorem ipsum dolor sit amet", "12345\n67890\n", "Name: nobody"] {
            assert_eq!(extract(text, FormRules::builtin()), Record::default());
        }
    }

    #[test]
    fn test_name_and_mobile_only() {
        let text = "Name (Block Letters...): JOHN SMITH\nMobile: 9876543210";
        let record = extract(text, FormRules::builtin());

        assert_eq!(
            record,
            Record {
                name: s("JOHN SMITH"),
                mobile: s("9876543210"),
                ..Record::default()
            }
        );
    }

    #[test]
    fn test_current_address_only() {
        let text = "3. Current Address: 3.1 Street Address: 12 Oak Rd\n3.2 City: Pune 3.3 State: MH\n3.4 Zip Code: 411001\n3.5 Country: India\n";
        let record = extract(text, FormRules::builtin());

        assert_eq!(
            record.current_address,
            Address {
                street: s("12 Oak Rd"),
                city: s("Pune"),
                state: s("MH"),
                zip_code: s("411001"),
                country: s("India"),
            }
        );
        assert!(record.permanent_address.is_empty());
    }

    #[test]
    fn test_missing_city_keeps_siblings() {
        let text = "3. Current Address: 3.1 Street Address: 12 Oak Rd\n3.3 State: MH\n3.4 Zip Code: 411001\n";
        let record = extract(text, FormRules::builtin());

        assert_eq!(record.current_address.street, s("12 Oak Rd"));
        assert_eq!(record.current_address.city, None);
        assert_eq!(record.current_address.state, s("MH"));
        assert_eq!(record.current_address.zip_code, s("411001"));
    }

    #[test]
    fn test_numeric_fields_reject_letters() {
        let text = "3. Current Address: 3.1 Street Address: x\n3.4 Zip Code: 41100A\nMobile: 98765O3210\nAge: twenty\n";
        let record = extract(text, FormRules::builtin());

        assert_eq!(record.current_address.zip_code, None);
        assert_eq!(record.mobile, None);
        assert_eq!(record.age, None);
    }

    #[test]
    fn test_numeric_fields_only_hold_digits() {
        let record = extract(FULL_FORM, FormRules::builtin());
        let digits = |v: &Option<String>| v.as_deref().unwrap().chars().all(|c| c.is_ascii_digit());

        assert!(digits(&record.mobile));
        assert!(digits(&record.permanent_address.zip_code));
        assert!(digits(&record.emergency_contact.number));
        for row in &record.education {
            let score = row.score.as_deref().unwrap();
            assert!(score.chars().all(|c| c.is_ascii_digit() || c == '.'));
        }
    }

    #[test]
    fn test_relocation_without_answer_is_null() {
        let text = "Available for Relocation:\nName of Emergency Contact: RAVI\n";
        let record = extract(text, FormRules::builtin());

        assert_eq!(record.available_for_relocation, None);
        assert_eq!(record.emergency_contact.name, s("RAVI"));
    }

    #[test]
    fn test_relocation_requires_whole_answer() {
        let record = extract("Available for Relocation: Nope\n", FormRules::builtin());
        assert_eq!(record.available_for_relocation, None);

        let record = extract("Available for Relocation: No\n", FormRules::builtin());
        assert_eq!(record.available_for_relocation, s("No"));

        let record = extract("Available for Relocation: y\n", FormRules::builtin());
        assert_eq!(record.available_for_relocation, s("y"));
    }

    #[test]
    fn test_label_variants() {
        let text = "\
MaxAge: 40
Emergency Contact\u{2019}s Number: 9123456780
3. Current Address: 3.1 Street Address: 12 Oak Rd
3.4 Zip Code: 411001 \t
";
        let record = extract(text, FormRules::builtin());

        assert_eq!(record.age, None);
        assert_eq!(record.emergency_contact.number, s("9123456780"));
        assert_eq!(record.current_address.zip_code, s("411001"));
    }

    #[test]
    fn test_extract_is_deterministic() {
        let first = serde_json::to_vec(&extract(FULL_FORM, FormRules::builtin())).unwrap();
        for _ in 0..5 {
            let again = serde_json::to_vec(&extract(FULL_FORM, FormRules::builtin())).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_single_qualification_limit() {
        let rules = FormRules::compile(&Default::default(), Some(1)).unwrap();
        let record = rules.extract_from_text(FULL_FORM);

        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].institution, s("Pune University"));
    }

    #[test]
    fn test_report_lists_missing_fields() {
        let report = ExtractionReport::run(FormRules::builtin(), "Gender: Male\n");

        assert_eq!(report.record.gender, s("Male"));
        assert!(!report.missing_fields.contains(&"Gender".to_string()));
        assert!(report.missing_fields.contains(&"Name".to_string()));
    }
}
