//! Record formatting for terminal and file output.

use formscan_core::{Address, Record, StoredRecord};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per record
    Csv,
    /// Plain text summary
    Text,
}

const CSV_HEADER: [&str; 12] = [
    "Name",
    "Permanent Address",
    "Current Address",
    "Date of Birth",
    "Age",
    "Gender",
    "Mobile",
    "Email ID",
    "Emergency Contact Name",
    "Emergency Contact Number",
    "Available for Relocation",
    "Educational Qualification",
];

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn education_summary(record: &Record) -> String {
    record
        .education
        .iter()
        .map(|q| {
            let mut entry = cell(&q.qualification);
            let details: Vec<String> = [&q.institution, &q.score, &q.pass_out_year]
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            if !details.is_empty() {
                entry.push_str(&format!(" ({})", details.join(", ")));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn csv_row(record: &Record) -> Vec<String> {
    vec![
        cell(&record.name),
        record.permanent_address.format(),
        record.current_address.format(),
        cell(&record.date_of_birth),
        cell(&record.age),
        cell(&record.gender),
        cell(&record.mobile),
        cell(&record.email),
        cell(&record.emergency_contact.name),
        cell(&record.emergency_contact.number),
        cell(&record.available_for_relocation),
        education_summary(record),
    ]
}

/// CSV with an optional leading `_id` column.
pub fn records_csv<'a>(
    rows: impl IntoIterator<Item = (Option<String>, &'a Record)>,
    with_id: bool,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = Vec::with_capacity(CSV_HEADER.len() + 1);
    if with_id {
        header.push("_id");
    }
    header.extend(CSV_HEADER);
    wtr.write_record(&header)?;

    for (id, record) in rows {
        let mut row = Vec::with_capacity(header.len());
        if with_id {
            row.push(id.unwrap_or_default());
        }
        row.extend(csv_row(record));
        wtr.write_record(&row)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

pub fn stored_csv(records: &[StoredRecord]) -> anyhow::Result<String> {
    records_csv(
        records.iter().map(|s| (Some(s.id.to_string()), &s.record)),
        true,
    )
}

fn push_line(output: &mut String, label: &str, value: &Option<String>) {
    output.push_str(&format!("{:<26}{}\n", format!("{}:", label), value.as_deref().unwrap_or("-")));
}

fn push_address(output: &mut String, label: &str, address: &Address) {
    let formatted = if address.is_empty() {
        "-".to_string()
    } else {
        address.format()
    };
    output.push_str(&format!("{:<26}{}\n", format!("{}:", label), formatted));
}

/// Human-readable summary of one record.
pub fn record_text(record: &Record) -> String {
    let mut output = String::new();

    push_line(&mut output, "Name", &record.name);
    push_address(&mut output, "Permanent Address", &record.permanent_address);
    push_address(&mut output, "Current Address", &record.current_address);
    push_line(&mut output, "Date of Birth", &record.date_of_birth);
    push_line(&mut output, "Age", &record.age);
    push_line(&mut output, "Gender", &record.gender);
    push_line(&mut output, "Mobile", &record.mobile);
    push_line(&mut output, "Email ID", &record.email);
    push_line(&mut output, "Emergency Contact", &record.emergency_contact.name);
    push_line(&mut output, "Emergency Number", &record.emergency_contact.number);
    push_line(&mut output, "Available for Relocation", &record.available_for_relocation);

    if record.education.is_empty() {
        output.push_str("Educational Qualification: -\n");
    } else {
        output.push_str("Educational Qualification:\n");
        for q in &record.education {
            output.push_str(&format!(
                "  {}. {} - {} ({}, {})\n",
                q.serial.as_deref().unwrap_or("?"),
                q.qualification.as_deref().unwrap_or("-"),
                q.institution.as_deref().unwrap_or("-"),
                q.score.as_deref().unwrap_or("-"),
                q.pass_out_year.as_deref().unwrap_or("-"),
            ));
        }
    }

    output
}

pub fn stored_text(records: &[StoredRecord]) -> String {
    records
        .iter()
        .map(|s| format!("_id: {}\n{}", s.id, record_text(&s.record)))
        .collect::<Vec<_>>()
        .join("\n")
}
