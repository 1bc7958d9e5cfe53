//! Company commands

use anyhow::{anyhow, Context};
use colored::Colorize;
use icn_directory::{
    Company, CompanyQuery, CompanyType, DirectoryService, DirectoryUseCases, EntityId, GeoPoint, SortKey,
    SortOrder, StateCode, VerificationFilter,
};
use icn_entitlements::Tier;
use icn_member::{ExportArtifact, ExportFormat, ExportSelection, MemberService, MemberStore, UserId};
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;
use tracing::info;

use super::parse;
use crate::config::Config;
use crate::output::OutputFormat;
use crate::CompanyCommands;

#[derive(Tabled)]
struct CompanyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Type")]
    company_type: String,
    #[tabled(rename = "Verified")]
    verified: String,
    #[tabled(rename = "Sectors")]
    sectors: String,
}

impl From<&Company> for CompanyRow {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id().to_string(),
            name: c.name().to_string(),
            state: c.state().code().to_string(),
            company_type: c.company_type().to_string(),
            verified: if c.is_verified() { "yes" } else { "no" }.to_string(),
            sectors: c.key_sectors().join(", "),
        }
    }
}

fn rows(companies: &[Company]) -> Vec<CompanyRow> {
    companies.iter().map(CompanyRow::from).collect()
}

async fn load_directory(config: &Config, dataset: Option<&Path>) -> anyhow::Result<DirectoryService> {
    let path = dataset
        .map(Path::to_path_buf)
        .or_else(|| config.directory.dataset_path.clone())
        .ok_or_else(|| anyhow!("no dataset: pass --dataset or set directory.dataset_path in the config file"))?;

    let service = DirectoryService::in_memory(config.directory.clone());
    let report = service.load_path(&path).await?;
    info!(
        path = %path.display(),
        companies = report.companies,
        skipped = report.skipped(),
        "directory loaded"
    );
    Ok(service)
}

fn parse_origin(raw: &str) -> anyhow::Result<GeoPoint> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("expected LAT,LON, got {:?}", raw))?;
    Ok(GeoPoint::new(
        lat.trim().parse().with_context(|| format!("bad latitude {:?}", lat))?,
        lon.trim().parse().with_context(|| format!("bad longitude {:?}", lon))?,
    ))
}

pub async fn handle(
    action: CompanyCommands,
    config: &Config,
    dataset: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let directory = load_directory(config, dataset).await?;

    match action {
        CompanyCommands::List {
            search,
            sectors,
            state,
            company_type,
            verification,
            ownership,
            sort,
            order,
            near,
            page,
            limit,
        } => {
            let query = CompanyQuery {
                search,
                sectors,
                company_type: company_type.as_deref().map(parse::<CompanyType>).transpose()?,
                verification_status: verification.as_deref().map(parse::<VerificationFilter>).transpose()?,
                state: state.as_deref().map(parse::<StateCode>).transpose()?,
                ownership,
                sort_by: sort.as_deref().map(parse::<SortKey>).transpose()?,
                sort_order: parse::<SortOrder>(&order)?,
                origin: near.as_deref().map(parse_origin).transpose()?,
                page: Some(page),
                limit,
            };
            let result = directory.get_all(&query).await?;
            format.print_list(&result, rows(&result.data))?;
            if format == OutputFormat::Table {
                println!(
                    "page {} · {} of {} companies{}",
                    result.page,
                    result.data.len(),
                    result.total,
                    if result.has_more { " · more available" } else { "" }
                );
            }
        }
        CompanyCommands::Get { id } => {
            let detail = directory.get_by_id(&EntityId::from_string(id)).await?;
            format.print(&detail)?;
        }
        CompanyCommands::Search { text } => {
            let results = directory.search(&text).await?;
            format.print_list(&results, rows(&results.data))?;
            if format == OutputFormat::Table && results.total > results.data.len() {
                println!("showing {} of {} matches", results.data.len(), results.total);
            }
        }
        CompanyCommands::Stats => {
            let stats = directory.statistics().await?;
            if format == OutputFormat::Table {
                println!("{}", stats.to_string().bold());
            }
            format.print(&stats)?;
        }
        CompanyCommands::Filters => {
            format.print(&directory.filter_options().await?)?;
        }
        CompanyCommands::Export {
            tier,
            search,
            state,
            pdf,
            output,
        } => {
            let tier: Tier = tier.parse()?;
            let members = MemberService::new(Arc::new(MemberStore::new()), Arc::new(directory));
            let user = UserId::from("cli");
            members.subscribe(Some(&user), tier)?;

            let mut query = CompanyQuery::new();
            query.search = search;
            query.state = state.as_deref().map(parse::<StateCode>).transpose()?;
            let export_format = if pdf { ExportFormat::Pdf } else { ExportFormat::Csv };

            let artifact = members
                .export_companies(Some(&user), export_format, ExportSelection::Query(query))
                .await?;
            let rendered = match &artifact {
                ExportArtifact::Csv(csv) => csv.content.clone(),
                ExportArtifact::Pdf(report) => serde_json::to_string_pretty(report)?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered).with_context(|| format!("writing {}", path.display()))?;
                    eprintln!(
                        "{} {} companies to {}",
                        "exported".green().bold(),
                        artifact.rows(),
                        path.display()
                    );
                }
                None => print!("{}", rendered),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin() {
        let origin = parse_origin("-37.81, 144.96").unwrap();
        assert_eq!(origin.latitude, -37.81);
        assert_eq!(origin.longitude, 144.96);
        assert!(parse_origin("-37.81").is_err());
        assert!(parse_origin("north,south").is_err());
    }
}
