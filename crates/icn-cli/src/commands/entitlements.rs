//! Entitlement commands

use icn_entitlements::{has_feature, Entitlements, Feature, Tier};
use serde::Serialize;
use tabled::Tabled;

use crate::output::OutputFormat;
use crate::EntitlementCommands;

#[derive(Debug, Serialize)]
struct FeatureCheck {
    tier: Tier,
    feature: Feature,
    granted: bool,
    minimum_tier: Tier,
}

#[derive(Serialize, Tabled)]
struct MatrixRow {
    #[tabled(rename = "Feature")]
    feature: &'static str,
    #[tabled(rename = "Free")]
    free: &'static str,
    #[tabled(rename = "Plus")]
    plus: &'static str,
    #[tabled(rename = "Premium")]
    premium: &'static str,
}

fn mark(granted: bool) -> &'static str {
    if granted {
        "✓"
    } else {
        "-"
    }
}

fn matrix() -> Vec<MatrixRow> {
    Feature::ALL
        .into_iter()
        .map(|feature| MatrixRow {
            feature: feature.label(),
            free: mark(has_feature(Tier::Free, feature)),
            plus: mark(has_feature(Tier::Plus, feature)),
            premium: mark(has_feature(Tier::Premium, feature)),
        })
        .collect()
}

pub fn handle(action: EntitlementCommands, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        EntitlementCommands::Show { tier } => {
            let tier: Tier = tier.parse()?;
            format.print(&Entitlements::for_tier(tier))?;
        }
        EntitlementCommands::Check { tier, feature } => {
            let tier: Tier = tier.parse()?;
            let feature: Feature = feature.parse()?;
            let check = FeatureCheck {
                tier,
                feature,
                granted: has_feature(tier, feature),
                minimum_tier: feature.minimum_tier(),
            };
            format.print(&check)?;
        }
        EntitlementCommands::Matrix => {
            let rows = matrix();
            format.print_list(&rows, matrix())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_covers_every_feature() {
        let rows = matrix();
        assert_eq!(rows.len(), Feature::ALL.len());
        assert!(rows.iter().all(|r| r.premium == "✓"));

        let csv = rows.iter().find(|r| r.feature == Feature::ExportCsv.label()).unwrap();
        assert_eq!((csv.free, csv.plus), ("-", "✓"));
    }
}
