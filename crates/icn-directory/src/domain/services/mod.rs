//! Domain services module

use crate::domain::aggregates::CompanyType;

/// Derives a company's type from the capability-type tags seen for it
pub struct CompanyClassifier;

impl CompanyClassifier {
    const MANUFACTURER_LIKE: &'static [&'static str] =
        &["manufactur", "fabricat", "assembl", "producer", "machining"];
    const SUPPLIER_LIKE: &'static [&'static str] = &["supplier", "supply", "distribut", "wholesal", "stockist"];
    const SERVICE_LIKE: &'static [&'static str] =
        &["service", "install", "maintenance", "repair", "engineering", "project management", "logistics"];
    const RETAIL_LIKE: &'static [&'static str] = &["retail", "reseller", "dealer"];
    const CONSULTANT_LIKE: &'static [&'static str] = &["consult", "advis", "design"];

    /// Classify from the full accumulated set of capability types.
    ///
    /// Manufacturer together with supplier (or retail) wins as `Both`, then
    /// manufacturer, supplier, service, retail (reported as supplier) and
    /// consultant. An empty or unrecognized set is a supplier.
    pub fn classify<'a, I>(capability_types: I) -> CompanyType
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (mut manufacturer, mut supplier, mut service, mut retail, mut consultant) =
            (false, false, false, false, false);

        for tag in capability_types {
            let tag = tag.to_lowercase();
            manufacturer |= Self::matches(&tag, Self::MANUFACTURER_LIKE);
            supplier |= Self::matches(&tag, Self::SUPPLIER_LIKE);
            service |= Self::matches(&tag, Self::SERVICE_LIKE);
            retail |= Self::matches(&tag, Self::RETAIL_LIKE);
            consultant |= Self::matches(&tag, Self::CONSULTANT_LIKE);
        }

        if manufacturer && (supplier || retail) {
            CompanyType::Both
        } else if manufacturer {
            CompanyType::Manufacturer
        } else if supplier || retail {
            CompanyType::Supplier
        } else if service {
            CompanyType::Service
        } else if consultant {
            CompanyType::Consultant
        } else {
            CompanyType::Supplier
        }
    }

    fn matches(tag: &str, group: &[&str]) -> bool {
        group.iter().any(|needle| tag.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_and_supplier_is_both() {
        assert_eq!(CompanyClassifier::classify(["Manufacturer", "Supplier"]), CompanyType::Both);
        assert_eq!(
            CompanyClassifier::classify(["Manufacturer (Parts)", "Retailer"]),
            CompanyType::Both
        );
    }

    #[test]
    fn test_single_groups() {
        assert_eq!(CompanyClassifier::classify(["Manufacturer"]), CompanyType::Manufacturer);
        assert_eq!(CompanyClassifier::classify(["Item Supplier"]), CompanyType::Supplier);
        assert_eq!(CompanyClassifier::classify(["Service Provider"]), CompanyType::Service);
        assert_eq!(CompanyClassifier::classify(["Retailer"]), CompanyType::Supplier);
        assert_eq!(CompanyClassifier::classify(["Consultant"]), CompanyType::Consultant);
    }

    #[test]
    fn test_empty_defaults_to_supplier() {
        assert_eq!(CompanyClassifier::classify(Vec::<&str>::new()), CompanyType::Supplier);
        assert_eq!(CompanyClassifier::classify(["Something else"]), CompanyType::Supplier);
    }

    #[test]
    fn test_service_beats_consultant() {
        assert_eq!(CompanyClassifier::classify(["Consultant", "Installer"]), CompanyType::Service);
    }
}
