//! Demo profile enrichment
//!
//! Generates plausible contact details, ratings and ownership tags for demo
//! datasets. Output is fully determined by the seed, so the same seed always
//! produces the same profiles.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::aggregates::{Company, CompanyProfile};
use crate::domain::value_objects::StateCode;

const CERTIFICATIONS: &[&str] = &["ISO 9001", "ISO 14001", "ISO 45001", "AS/NZS 4801", "DISP Membership"];

const OWNERSHIP_TAGS: &[&str] = &[
    "Female-owned",
    "First Nations-owned",
    "Social Enterprise",
    "Australian Disability Enterprise",
];

/// Seeded fixture generator for company profiles
pub struct DemoEnricher {
    rng: StdRng,
}

impl DemoEnricher {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Attach a generated profile to every company
    pub fn enrich(&mut self, companies: &mut [Company]) {
        for company in companies.iter_mut() {
            let profile = self.profile_for(company);
            company.set_profile(profile);
        }
    }

    fn profile_for(&mut self, company: &Company) -> CompanyProfile {
        let slug = slugify(company.name());
        let certification_count = self.rng.gen_range(0..=2);
        let certifications = CERTIFICATIONS
            .choose_multiple(&mut self.rng, certification_count)
            .map(|c| c.to_string())
            .collect();

        let ownership = if self.rng.gen_bool(0.25) {
            OWNERSHIP_TAGS
                .choose(&mut self.rng)
                .map(|tag| vec![tag.to_string()])
                .unwrap_or_default()
        } else {
            vec![]
        };

        let rating = (self.rng.gen_range(30..=50) as f32) / 10.0;

        CompanyProfile {
            phone: Some(self.phone_for(company.state())),
            email: Some(format!("info@{}.com.au", slug)),
            website: Some(format!("https://www.{}.com.au", slug)),
            certifications,
            employees: Some(self.rng.gen_range(5..=500)),
            rating: Some(rating),
            ownership,
        }
    }

    fn phone_for(&mut self, state: StateCode) -> String {
        let (country, area) = match state {
            StateCode::NSW | StateCode::ACT => ("+61", "2"),
            StateCode::VIC | StateCode::TAS => ("+61", "3"),
            StateCode::QLD => ("+61", "7"),
            StateCode::SA | StateCode::WA | StateCode::NT => ("+61", "8"),
            StateCode::NI => ("+64", "9"),
            StateCode::SI => ("+64", "3"),
        };
        format!(
            "{} {} {:04} {:04}",
            country,
            area,
            self.rng.gen_range(0..10_000),
            self.rng.gen_range(0..10_000)
        )
    }
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if slug.is_empty() {
        "company".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::CompanyType;
    use crate::domain::value_objects::BillingAddress;

    fn companies() -> Vec<Company> {
        ["Acme Pty Ltd", "Bolt & Co", "!!!"]
            .into_iter()
            .map(|name| Company::manual(name, BillingAddress::default(), CompanyType::Supplier))
            .collect()
    }

    #[test]
    fn test_same_seed_same_profiles() {
        let mut a = companies();
        let mut b = a.clone();
        DemoEnricher::new(7).enrich(&mut a);
        DemoEnricher::new(7).enrich(&mut b);

        let profiles_a: Vec<_> = a.iter().map(|c| c.profile().clone()).collect();
        let profiles_b: Vec<_> = b.iter().map(|c| c.profile().clone()).collect();
        assert_eq!(profiles_a, profiles_b);
    }

    #[test]
    fn test_profile_shape() {
        let mut list = companies();
        DemoEnricher::new(1).enrich(&mut list);

        let acme = list[0].profile();
        assert_eq!(acme.email.as_deref(), Some("info@acmeptyltd.com.au"));
        assert!(acme.phone.as_deref().unwrap().starts_with("+61 2 "));
        let rating = acme.rating.unwrap();
        assert!((3.0..=5.0).contains(&rating));
        assert!(acme.certifications.len() <= 2);

        assert_eq!(list[2].profile().website.as_deref(), Some("https://www.company.com.au"));
    }
}
