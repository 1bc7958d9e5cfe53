//! Query handlers
//!
//! Pure filter → sort → page pipeline over a snapshot of the collection.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::application::dto::*;
use crate::domain::aggregates::Company;
use crate::domain::value_objects::GeoPoint;

/// Sectors reported in `DirectoryStats::top_sectors`
const TOP_SECTORS: usize = 10;

/// Apply filters (a)–(f) in order: text, sectors, type, verification,
/// state, ownership.
pub fn filter_companies(companies: Vec<Company>, query: &CompanyQuery) -> Vec<Company> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    companies
        .into_iter()
        .filter(|c| needle.as_deref().map_or(true, |n| c.matches_text(n)))
        .filter(|c| query.sectors.is_empty() || c.key_sectors().iter().any(|s| query.sectors.contains(s)))
        .filter(|c| query.company_type.map_or(true, |t| c.company_type() == t))
        .filter(|c| match query.verification_status.unwrap_or_default() {
            VerificationFilter::All => true,
            VerificationFilter::Verified => c.is_verified(),
            VerificationFilter::Unverified => !c.is_verified(),
        })
        .filter(|c| query.state.map_or(true, |s| c.state() == s))
        .filter(|c| query.ownership.is_empty() || c.ownership().iter().any(|o| query.ownership.contains(o)))
        .collect()
}

/// Stable sort by `key`. `SortOrder::Desc` reverses the key's natural
/// direction while keeping ties in their original order. For the distance
/// sort, companies are measured from `origin`; without one the order is kept.
pub fn sort_companies(companies: &mut [Company], key: SortKey, order: SortOrder, origin: Option<GeoPoint>) {
    let directed = |ord: Ordering| match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    };

    match key {
        SortKey::Name => {
            companies.sort_by(|a, b| directed(a.name().to_lowercase().cmp(&b.name().to_lowercase())));
        }
        SortKey::Verified => {
            // verified first
            companies.sort_by(|a, b| directed(b.is_verified().cmp(&a.is_verified())));
        }
        SortKey::Distance => {
            let Some(origin) = origin else { return };
            let mut keyed: Vec<(f64, Company)> = companies
                .iter()
                .map(|c| (origin.distance_km(&c.location()), c.clone()))
                .collect();
            keyed.sort_by(|(da, _), (db, _)| directed(da.total_cmp(db)));
            for (slot, (_, company)) in companies.iter_mut().zip(keyed) {
                *slot = company;
            }
        }
        SortKey::Rating => {
            // highest first; unrated companies go last in either direction
            companies.sort_by(|a, b| match (a.rating(), b.rating()) {
                (Some(ra), Some(rb)) => directed(rb.total_cmp(&ra)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
    }
}

/// Slice out a 1-indexed page. Page 0 is read as page 1 and a zero limit as
/// `default_limit`.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>, limit: Option<usize>, default_limit: usize) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.filter(|l| *l > 0).unwrap_or(default_limit.max(1));
    let total = items.len();
    let start = (page - 1).saturating_mul(limit);

    let data: Vec<T> = items.into_iter().skip(start).take(limit).collect();
    let has_more = start.saturating_add(data.len()) < total;

    Page { data, total, page, limit, has_more }
}

/// Full pipeline: filter, optional sort, page
pub fn run_query(companies: Vec<Company>, query: &CompanyQuery, default_limit: usize) -> Page<Company> {
    let mut filtered = filter_companies(companies, query);
    if let Some(key) = query.sort_by {
        sort_companies(&mut filtered, key, query.sort_order, query.origin);
    }
    paginate(filtered, query.page, query.limit, default_limit)
}

/// Directory-wide counts
pub fn statistics(companies: &[Company]) -> DirectoryStats {
    let verified = companies.iter().filter(|c| c.is_verified()).count();

    let mut by_state = BTreeMap::new();
    let mut by_type = BTreeMap::new();
    let mut sectors: HashMap<&str, usize> = HashMap::new();
    for company in companies {
        *by_state.entry(company.state().code().to_string()).or_insert(0) += 1;
        *by_type.entry(company.company_type().as_str().to_string()).or_insert(0) += 1;
        for sector in company.key_sectors() {
            *sectors.entry(sector.as_str()).or_insert(0) += 1;
        }
    }

    let mut top_sectors: Vec<SectorCount> = sectors
        .into_iter()
        .map(|(sector, companies)| SectorCount { sector: sector.to_string(), companies })
        .collect();
    top_sectors.sort_by(|a, b| b.companies.cmp(&a.companies).then_with(|| a.sector.cmp(&b.sector)));
    top_sectors.truncate(TOP_SECTORS);

    DirectoryStats {
        total: companies.len(),
        verified,
        unverified: companies.len() - verified,
        by_state,
        by_type,
        top_sectors,
    }
}

/// Distinct sectors, states, types and ownership tags present
pub fn filter_options(companies: &[Company]) -> FilterOptions {
    let mut sectors = BTreeSet::new();
    let mut states = BTreeSet::new();
    let mut types = BTreeSet::new();
    let mut ownership = BTreeSet::new();
    for company in companies {
        sectors.extend(company.key_sectors().iter().cloned());
        states.insert(company.state());
        types.insert(company.company_type());
        ownership.extend(company.ownership().iter().cloned());
    }

    FilterOptions {
        sectors: sectors.into_iter().collect(),
        states: states.into_iter().collect(),
        company_types: types.into_iter().collect(),
        ownership: ownership.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{CompanyPatch, CompanyType, IcnCapability};
    use crate::domain::value_objects::{BillingAddress, EntityId, StateCode};
    use chrono::NaiveDate;

    fn company(id: &str, name: &str, state: StateCode, kind: &str, sector: &str, verified: bool) -> Company {
        let mut c = Company::imported(
            EntityId::from(id),
            Some(name),
            BillingAddress::from_parts(None, None, Some(state.code()), None),
            state.default_location(),
            verified.then(|| NaiveDate::from_ymd_opt(2024, 1, 1)).flatten(),
        );
        c.record_capability(IcnCapability {
            item_name: Some(format!("{name} widgets")),
            capability_type: Some(kind.to_string()),
            sector_name: Some(sector.to_string()),
            ..Default::default()
        });
        c
    }

    fn fixture() -> Vec<Company> {
        vec![
            company("1", "Delta Steel", StateCode::VIC, "Manufacturer", "Defence", true),
            company("2", "alpha Logistics", StateCode::NSW, "Supplier", "Rail", false),
            company("3", "Charlie Engineering", StateCode::QLD, "Service Provider", "Defence", true),
            company("4", "Bravo Parts", StateCode::VIC, "Supplier", "Energy", false),
            company("5", "Echo Advisory", StateCode::WA, "Consultant", "Mining", false),
        ]
    }

    fn ids(companies: &[Company]) -> Vec<&str> {
        companies.iter().map(|c| c.id().as_str()).collect()
    }

    #[test]
    fn test_text_filter() {
        let q = CompanyQuery::new().with_search("  STEEL ");
        assert_eq!(ids(&filter_companies(fixture(), &q)), ["1"]);

        let q = CompanyQuery::new().with_search("defence");
        assert_eq!(ids(&filter_companies(fixture(), &q)), ["1", "3"]);
    }

    #[test]
    fn test_sector_filter_is_or() {
        let q = CompanyQuery::new().with_sector("Rail").with_sector("Mining");
        assert_eq!(ids(&filter_companies(fixture(), &q)), ["2", "5"]);
    }

    #[test]
    fn test_type_state_and_verification_filters() {
        let mut q = CompanyQuery::new().with_state(StateCode::VIC);
        q.company_type = Some(CompanyType::Supplier);
        assert_eq!(ids(&filter_companies(fixture(), &q)), ["4"]);

        let q = CompanyQuery { verification_status: Some(VerificationFilter::Verified), ..Default::default() };
        assert_eq!(ids(&filter_companies(fixture(), &q)), ["1", "3"]);

        let q = CompanyQuery { verification_status: Some(VerificationFilter::All), ..Default::default() };
        let all = fixture();
        assert_eq!(
            ids(&filter_companies(all.clone(), &q)),
            ids(&filter_companies(all, &CompanyQuery::new()))
        );
    }

    #[test]
    fn test_ownership_filter() {
        let mut companies = fixture();
        companies[2].apply_patch(CompanyPatch {
            ownership: Some(vec!["Female-owned".into()]),
            ..Default::default()
        });
        let q = CompanyQuery { ownership: vec!["Female-owned".into(), "Indigenous-owned".into()], ..Default::default() };
        assert_eq!(ids(&filter_companies(companies, &q)), ["3"]);
    }

    #[test]
    fn test_sort_by_name_both_directions() {
        let mut companies = fixture();
        sort_companies(&mut companies, SortKey::Name, SortOrder::Asc, None);
        assert_eq!(ids(&companies), ["2", "4", "3", "1", "5"]);

        sort_companies(&mut companies, SortKey::Name, SortOrder::Desc, None);
        assert_eq!(ids(&companies), ["5", "1", "3", "4", "2"]);
    }

    #[test]
    fn test_sort_verified_first_is_stable() {
        let mut companies = fixture();
        sort_companies(&mut companies, SortKey::Verified, SortOrder::Asc, None);
        assert_eq!(ids(&companies), ["1", "3", "2", "4", "5"]);

        let mut companies = fixture();
        sort_companies(&mut companies, SortKey::Verified, SortOrder::Desc, None);
        assert_eq!(ids(&companies), ["2", "4", "5", "1", "3"]);
    }

    #[test]
    fn test_sort_by_distance() {
        let mut companies = fixture();
        let perth = StateCode::WA.default_location();
        sort_companies(&mut companies, SortKey::Distance, SortOrder::Asc, Some(perth));
        assert_eq!(companies[0].id().as_str(), "5");
        assert_eq!(companies[4].id().as_str(), "3");

        let before = ids(&fixture()).into_iter().map(String::from).collect::<Vec<_>>();
        let mut unchanged = fixture();
        sort_companies(&mut unchanged, SortKey::Distance, SortOrder::Asc, None);
        assert_eq!(ids(&unchanged), before);
    }

    #[test]
    fn test_sort_by_rating_unrated_last() {
        let mut companies = fixture();
        for (idx, rating) in [(0, 3.5), (1, 4.8), (3, 4.1)] {
            companies[idx].apply_patch(CompanyPatch { rating: Some(rating), ..Default::default() });
        }
        sort_companies(&mut companies, SortKey::Rating, SortOrder::Asc, None);
        assert_eq!(ids(&companies), ["2", "4", "1", "3", "5"]);

        sort_companies(&mut companies, SortKey::Rating, SortOrder::Desc, None);
        assert_eq!(ids(&companies), ["1", "4", "2", "3", "5"]);
    }

    #[test]
    fn test_pagination_slices_are_disjoint() {
        let first = paginate(fixture(), Some(1), Some(2), 20);
        let second = paginate(fixture(), Some(2), Some(2), 20);
        let last = paginate(fixture(), Some(3), Some(2), 20);

        assert_eq!(ids(&first.data), ["1", "2"]);
        assert_eq!(ids(&second.data), ["3", "4"]);
        assert_eq!(ids(&last.data), ["5"]);
        assert!(first.has_more && second.has_more && !last.has_more);
        assert_eq!(second.total, 5);
    }

    #[test]
    fn test_pagination_defaults() {
        let page = paginate(fixture(), None, Some(0), 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 3);
        assert_eq!(page.data.len(), 3);

        let beyond = paginate(fixture(), Some(9), Some(2), 20);
        assert!(beyond.data.is_empty());
        assert!(!beyond.has_more);
        assert_eq!(beyond.total, 5);
    }

    #[test]
    fn test_statistics_and_options() {
        let stats = statistics(&fixture());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.verified, 2);
        assert_eq!(stats.by_state.get("VIC"), Some(&2));
        assert_eq!(stats.top_sectors[0], SectorCount { sector: "Defence".into(), companies: 2 });

        let options = filter_options(&fixture());
        assert_eq!(options.sectors, ["Defence", "Energy", "Mining", "Rail"]);
        assert!(options.states.contains(&StateCode::QLD));
        assert!(options.ownership.is_empty());
    }
}
