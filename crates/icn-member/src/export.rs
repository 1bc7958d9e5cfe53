//! Export rendering
//!
//! Turns a company list into a CSV document or a structured report. The
//! columns come from the tier's [`ExportFieldSet`]; each set extends the
//! one below it.

use chrono::{DateTime, Utc};
use icn_directory::{Company, EntityId};
use icn_entitlements::{ExportFieldSet, Tier};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::model::ExportFormat;

/// One exported column
#[derive(Clone, Copy)]
pub struct ExportColumn {
    pub header: &'static str,
    value: fn(&Company) -> String,
}

impl ExportColumn {
    pub fn value(&self, company: &Company) -> String {
        (self.value)(company)
    }
}

const BASIC: &[ExportColumn] = &[
    ExportColumn { header: "Name", value: |c| c.name().to_string() },
    ExportColumn { header: "State", value: |c| c.state().code().to_string() },
    ExportColumn { header: "Sectors", value: |c| c.key_sectors().join("; ") },
];

const MEDIUM: &[ExportColumn] = &[
    ExportColumn { header: "Address", value: |c| c.address().to_string() },
    ExportColumn { header: "City", value: |c| c.billing_address().city.clone() },
    ExportColumn { header: "Postcode", value: |c| c.billing_address().postcode.clone() },
    ExportColumn { header: "Company Type", value: |c| c.company_type().to_string() },
    ExportColumn { header: "Verification", value: |c| c.verification_status().to_string() },
    ExportColumn { header: "Capabilities", value: |c| c.capabilities().join("; ") },
];

const FULL: &[ExportColumn] = &[
    ExportColumn { header: "ID", value: |c| c.id().to_string() },
    ExportColumn { header: "Phone", value: |c| c.profile().phone.clone().unwrap_or_default() },
    ExportColumn { header: "Email", value: |c| c.profile().email.clone().unwrap_or_default() },
    ExportColumn { header: "Website", value: |c| c.profile().website.clone().unwrap_or_default() },
    ExportColumn {
        header: "Employees",
        value: |c| c.profile().employees.map(|n| n.to_string()).unwrap_or_default(),
    },
    ExportColumn {
        header: "Rating",
        value: |c| c.rating().map(|r| format!("{:.1}", r)).unwrap_or_default(),
    },
    ExportColumn { header: "Certifications", value: |c| c.profile().certifications.join("; ") },
    ExportColumn { header: "Ownership", value: |c| c.ownership().join("; ") },
    ExportColumn {
        header: "Validation Date",
        value: |c| c.validation_date().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
    },
    ExportColumn { header: "Latitude", value: |c| format!("{:.5}", c.location().latitude) },
    ExportColumn { header: "Longitude", value: |c| format!("{:.5}", c.location().longitude) },
];

/// Columns included for a field set
pub fn columns_for(fields: ExportFieldSet) -> Vec<ExportColumn> {
    let groups: &[&[ExportColumn]] = match fields {
        ExportFieldSet::None => &[],
        ExportFieldSet::Basic => &[BASIC],
        ExportFieldSet::Medium => &[BASIC, MEDIUM],
        ExportFieldSet::Full => &[BASIC, MEDIUM, FULL],
    };
    groups.iter().flat_map(|group| group.iter().copied()).collect()
}

fn escape_csv(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Header row plus one row per company, `\n` separated
pub fn render_csv(companies: &[Company], fields: ExportFieldSet) -> String {
    let columns = columns_for(fields);
    let mut out = String::new();

    let header: Vec<Cow<'_, str>> = columns.iter().map(|c| escape_csv(c.header)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for company in companies {
        let row: Vec<String> = columns
            .iter()
            .map(|column| escape_csv(&column.value(company)).into_owned())
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Timestamped download name, e.g. `icn-companies-20250601-093000.csv`
pub fn export_filename(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!("icn-companies-{}.{}", at.format("%Y%m%d-%H%M%S"), format.extension())
}

/// Rendered CSV export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub filename: String,
    pub fields: ExportFieldSet,
    pub rows: usize,
    pub content: String,
}

/// Report document handed to a PDF renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub filename: String,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub tier: Tier,
    pub summary: ReportSummary,
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub companies: usize,
    pub verified: usize,
    pub by_state: BTreeMap<String, usize>,
}

/// One company section of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub company_id: EntityId,
    pub heading: String,
    /// Label/value pairs in column order, blanks omitted
    pub fields: Vec<(String, String)>,
}

/// Build the report for a set of companies
pub fn build_report(companies: &[Company], tier: Tier, generated_at: DateTime<Utc>) -> ReportDocument {
    let fields = ExportFieldSet::for_tier(tier);
    let columns = columns_for(fields);

    let mut by_state = BTreeMap::new();
    for company in companies {
        *by_state.entry(company.state().code().to_string()).or_insert(0) += 1;
    }

    let entries = companies
        .iter()
        .map(|company| ReportEntry {
            company_id: company.id().clone(),
            heading: company.name().to_string(),
            fields: columns
                .iter()
                .filter(|column| column.header != "Name")
                .map(|column| (column.header.to_string(), column.value(company)))
                .filter(|(_, value)| !value.is_empty())
                .collect(),
        })
        .collect();

    ReportDocument {
        filename: export_filename(ExportFormat::Pdf, generated_at),
        title: format!("ICN Navigator company report ({} companies)", companies.len()),
        generated_at,
        tier,
        summary: ReportSummary {
            companies: companies.len(),
            verified: companies.iter().filter(|c| c.is_verified()).count(),
            by_state,
        },
        entries,
    }
}

/// Export output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ExportArtifact {
    Csv(CsvExport),
    Pdf(ReportDocument),
}

impl ExportArtifact {
    pub fn format(&self) -> ExportFormat {
        match self {
            Self::Csv(_) => ExportFormat::Csv,
            Self::Pdf(_) => ExportFormat::Pdf,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::Csv(csv) => &csv.filename,
            Self::Pdf(report) => &report.filename,
        }
    }

    /// Companies included
    pub fn rows(&self) -> usize {
        match self {
            Self::Csv(csv) => csv.rows,
            Self::Pdf(report) => report.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use icn_directory::{BillingAddress, CompanyPatch, CompanyType};

    fn companies() -> Vec<Company> {
        let mut quoted = Company::manual(
            "Smith, Jones & \"Co\"",
            BillingAddress::from_parts(Some("2 Dock St"), Some("Hobart"), Some("TAS"), Some("7000")),
            CompanyType::Service,
        );
        quoted.apply_patch(CompanyPatch {
            key_sectors: Some(vec!["Maritime".into(), "Defence".into()]),
            email: Some("hello@sjc.com.au".into()),
            ..Default::default()
        });
        let plain = Company::manual("Plain Co", BillingAddress::default(), CompanyType::Supplier);
        vec![quoted, plain]
    }

    #[test]
    fn test_columns_grow_with_field_set() {
        let basic = columns_for(ExportFieldSet::Basic).len();
        let medium = columns_for(ExportFieldSet::Medium).len();
        let full = columns_for(ExportFieldSet::Full).len();
        assert!(columns_for(ExportFieldSet::None).is_empty());
        assert!(basic < medium && medium < full);

        let headers: Vec<&str> = columns_for(ExportFieldSet::Medium).iter().map(|c| c.header).collect();
        assert!(headers.contains(&"Capabilities"));
        assert!(!headers.contains(&"Email"));
    }

    #[test]
    fn test_render_csv_escapes() {
        let csv = render_csv(&companies(), ExportFieldSet::Basic);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,State,Sectors");
        assert_eq!(lines[1], "\"Smith, Jones & \"\"Co\"\"\",TAS,Maritime; Defence");
        assert_eq!(lines[2], "Plain Co,NSW,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_report_omits_blank_fields() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let report = build_report(&companies(), Tier::Premium, at);

        assert_eq!(report.filename, "icn-companies-20250601-093000.pdf");
        assert_eq!(report.summary.companies, 2);
        assert_eq!(report.summary.by_state["TAS"], 1);

        let first = &report.entries[0];
        assert_eq!(first.heading, "Smith, Jones & \"Co\"");
        assert!(first.fields.iter().any(|(label, value)| label == "Email" && value == "hello@sjc.com.au"));
        assert!(!first.fields.iter().any(|(label, _)| label == "Phone"));
    }
}
