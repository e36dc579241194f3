//! Built-in label-anchored patterns for the application form.
//!
//! Every pattern is compiled with dot-matches-newline and multi-line anchors,
//! so `.*?` may cross line breaks and `$` matches at each line end.

use lazy_static::lazy_static;

use super::FormRules;
use crate::models::config::PatternConfig;

pub const NAME: &str = r"Name \(Block Letters[^)]*\):\s*(.*?)(?:\n|$)";

/// Heading that opens the permanent address block.
pub const PERMANENT_ADDRESS: &str = r"2\. Permanent Address:";

/// Heading that opens the current address block.
pub const CURRENT_ADDRESS: &str = r"3\. Current Address:";

pub const DATE_OF_BIRTH: &str = r"Date of Birth:\s*(\d{1,2}\s*/\s*\d{1,2}\s*/\s*\d{4})";
pub const AGE: &str = r"\bAge:\s*(\d+)";
pub const GENDER: &str = r"Gender:\s*(\w+)";
pub const MOBILE: &str = r"Mobile:\s*(\d{10})";
pub const EMAIL: &str = r"Email ID:\s*([\w.-]+@[\w.-]+)\b";

pub const EMERGENCY_NAME: &str = r"Name of Emergency Contact:\s*(.*?)(?:\n|$)";
pub const EMERGENCY_NUMBER: &str = r"Emergency Contact['’]s Number:\s*(\d{10})";

/// The answer is optional; a bare label yields `null`.
pub const RELOCATION: &str = r"Available for Relocation:\s*(?:(Yes|No|Y|N|y|n)\b)?";

/// One qualification row: serial, institution, qualification, score, year.
pub const EDUCATION: &str = concat!(
    r"Sr\.? ?No\.?\s*(\d+)\s*",
    r"Name of the School/ ?University:\s*(.*?)\s*",
    r"Qualification:\s*(.*?)\s*",
    r"% or CGPA:\s*(\d+(?:\.\d+)?)\s*",
    r"Pass out Year:\s*(\d{4})",
);

/// Address sub-field patterns anchored on a block heading.
///
/// Each pattern searches the whole text from the heading onward, so a field
/// missing from one block can pick up the same label in a later block.
pub fn address(heading: &str) -> [String; 5] {
    [
        format!(r"{heading}\s*3\.1 Street Address:\s*(.*?)(?:\n|$)"),
        format!(r"{heading}.*?3\.2 City:\s*(.*?)\s*3\.3"),
        format!(r"{heading}.*?3\.3 State:\s*(.*?)(?:\n|$)"),
        format!(r"{heading}.*?3\.4 Zip Code:\s*(\d+)[ \t]*(?:\n|$)"),
        format!(r"{heading}.*?3\.5 Country:\s*(.*?)(?:\n|$)"),
    ]
}

lazy_static! {
    /// Built-in rule set, compiled once per process.
    pub static ref DEFAULT_RULES: FormRules =
        FormRules::compile(&PatternConfig::default(), None).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_compile() {
        assert!(FormRules::compile(&PatternConfig::default(), None).is_ok());
    }

    #[test]
    fn test_address_patterns_are_anchored() {
        for pattern in address(CURRENT_ADDRESS) {
            assert!(pattern.starts_with(CURRENT_ADDRESS));
        }
    }
}
