//! Gated member operations
//!
//! Every mutation follows the same protocol: resolve the caller, check the
//! feature against the caller's tier, check the tier's limit against current
//! usage, then mutate. Denials surface as [`MemberError`] and leave state
//! untouched.

use chrono::Utc;
use icn_directory::{Company, CompanyQuery, DirectoryUseCases, EntityId, Page};
use icn_entitlements::{has_feature, limit_for, Entitlements, ExportFieldSet, Feature, LimitType, Tier};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{MemberError, MemberResult};
use crate::export::{build_report, export_filename, render_csv, CsvExport, ExportArtifact};
use crate::model::*;
use crate::store::MemberStore;

/// Member application service
pub struct MemberService {
    store: Arc<MemberStore>,
    directory: Arc<dyn DirectoryUseCases>,
}

impl MemberService {
    pub fn new(store: Arc<MemberStore>, directory: Arc<dyn DirectoryUseCases>) -> Self {
        Self { store, directory }
    }

    pub fn store(&self) -> &MemberStore {
        &self.store
    }

    fn authenticated<'a>(&self, user: Option<&'a UserId>) -> MemberResult<&'a UserId> {
        user.ok_or(MemberError::NotAuthenticated)
    }

    /// Caller and tier, failing unless the tier grants `feature`
    fn require<'a>(&self, user: Option<&'a UserId>, feature: Feature) -> MemberResult<(&'a UserId, Tier)> {
        let user = self.authenticated(user)?;
        let tier = self.store.tier(user);
        if !has_feature(tier, feature) {
            debug!(user_id = %user, tier = ?tier, feature = %feature, "feature denied");
            return Err(MemberError::denied(feature, tier));
        }
        Ok((user, tier))
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn current_tier(&self, user: Option<&UserId>) -> MemberResult<Tier> {
        let user = self.authenticated(user)?;
        Ok(self.store.tier(user))
    }

    /// Move to `tier`, up or down. Existing bookmarks and searches are kept
    /// after a downgrade; only new ones are limited.
    pub fn subscribe(&self, user: Option<&UserId>, tier: Tier) -> MemberResult<Subscription> {
        let user = self.authenticated(user)?;
        let previous = self.store.tier(user);
        let subscription = self.store.set_tier(user, tier);
        info!(user_id = %user, from = ?previous, to = ?tier, "subscription changed");
        Ok(subscription)
    }

    /// Back to the free tier
    pub fn cancel(&self, user: Option<&UserId>) -> MemberResult<Subscription> {
        self.subscribe(user, Tier::Free)
    }

    pub fn entitlements(&self, user: Option<&UserId>) -> MemberResult<Entitlements> {
        let tier = self.current_tier(user)?;
        Ok(Entitlements::for_tier(tier))
    }

    /// Usage against each limit
    pub fn usage(&self, user: Option<&UserId>) -> MemberResult<UsageSummary> {
        let user = self.authenticated(user)?;
        let tier = self.store.tier(user);
        Ok(UsageSummary {
            tier,
            bookmarks: self.store.bookmark_count(user),
            bookmark_limit: limit_for(tier, LimitType::Bookmarks),
            saved_searches: self.store.saved_search_count(user),
            saved_search_limit: limit_for(tier, LimitType::SavedSearches),
            exports_this_month: self.store.exports_in(user, UsageMonth::of(Utc::now())),
            export_limit: limit_for(tier, LimitType::Exports),
            export_fields: ExportFieldSet::for_tier(tier),
        })
    }

    // =========================================================================
    // Bookmarks
    // =========================================================================

    /// Bookmark a company. Re-adding an existing bookmark succeeds without
    /// using quota.
    #[instrument(skip(self, user), fields(user_id = ?user.map(UserId::as_str)))]
    pub async fn add_bookmark(&self, user: Option<&UserId>, company_id: &EntityId) -> MemberResult<BookmarkReceipt> {
        let (user, tier) = self.require(user, Feature::Bookmarks)?;
        let found = self.directory.get_many(std::slice::from_ref(company_id)).await?;
        if found.is_empty() {
            return Err(MemberError::not_found("company", company_id));
        }

        let (added, bookmarks) = self
            .store
            .insert_bookmark(user, company_id, limit_for(tier, LimitType::Bookmarks))?;
        if added {
            info!(company_id = %company_id, bookmarks, "bookmark added");
        }
        Ok(BookmarkReceipt {
            success: true,
            company_id: company_id.clone(),
            bookmarks,
        })
    }

    pub fn remove_bookmark(&self, user: Option<&UserId>, company_id: &EntityId) -> MemberResult<BookmarkReceipt> {
        let user = self.authenticated(user)?;
        let bookmarks = self
            .store
            .remove_bookmark(user, company_id)
            .ok_or_else(|| MemberError::not_found("bookmark", company_id))?;
        Ok(BookmarkReceipt {
            success: true,
            company_id: company_id.clone(),
            bookmarks,
        })
    }

    /// Bookmarked companies in bookmark order. Companies deleted since they
    /// were bookmarked are skipped.
    pub async fn list_bookmarks(&self, user: Option<&UserId>) -> MemberResult<Vec<Company>> {
        let user = self.authenticated(user)?;
        let ids: Vec<EntityId> = self.store.bookmarks(user).into_iter().map(|b| b.company_id).collect();
        let companies = self.directory.get_many(&ids).await?;
        if companies.len() < ids.len() {
            warn!(user_id = %user, missing = ids.len() - companies.len(), "bookmarked companies no longer in directory");
        }
        Ok(companies)
    }

    pub fn is_bookmarked(&self, user: Option<&UserId>, company_id: &EntityId) -> MemberResult<bool> {
        let user = self.authenticated(user)?;
        Ok(self.store.is_bookmarked(user, company_id))
    }

    // =========================================================================
    // Saved searches
    // =========================================================================

    #[instrument(skip(self, user, query), fields(user_id = ?user.map(UserId::as_str)))]
    pub fn save_search(&self, user: Option<&UserId>, name: &str, query: CompanyQuery) -> MemberResult<SavedSearch> {
        let (user, tier) = self.require(user, Feature::SavedSearches)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(MemberError::Validation("saved search name is required".into()));
        }

        let search = SavedSearch::new(name, query);
        let count = self
            .store
            .insert_saved_search(user, search.clone(), limit_for(tier, LimitType::SavedSearches))?;
        info!(search_id = %search.id, count, "search saved");
        Ok(search)
    }

    pub fn list_saved_searches(&self, user: Option<&UserId>) -> MemberResult<Vec<SavedSearch>> {
        let user = self.authenticated(user)?;
        Ok(self.store.saved_searches(user))
    }

    pub fn delete_saved_search(&self, user: Option<&UserId>, id: &str) -> MemberResult<SavedSearch> {
        let user = self.authenticated(user)?;
        self.store
            .remove_saved_search(user, id)
            .ok_or_else(|| MemberError::not_found("saved search", id))
    }

    /// Execute a stored query against the current directory
    pub async fn run_saved_search(&self, user: Option<&UserId>, id: &str) -> MemberResult<Page<Company>> {
        let (user, _) = self.require(user, Feature::SavedSearches)?;
        let search = self
            .store
            .saved_search(user, id)
            .ok_or_else(|| MemberError::not_found("saved search", id))?;
        Ok(self.directory.get_all(&search.query).await?)
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export companies as CSV or as a report document. Each export counts
    /// against the tier's monthly ceiling.
    #[instrument(skip(self, user, selection), fields(user_id = ?user.map(UserId::as_str)))]
    pub async fn export_companies(
        &self,
        user: Option<&UserId>,
        format: ExportFormat,
        selection: ExportSelection,
    ) -> MemberResult<ExportArtifact> {
        let (user, tier) = self.require(user, format.feature())?;
        let quota = limit_for(tier, LimitType::Exports);
        let month = UsageMonth::of(Utc::now());
        quota.check(LimitType::Exports, self.store.exports_in(user, month))?;

        let companies = self.resolve_selection(user, selection).await?;
        let count = self.store.record_export(user, month, quota)?;

        let now = Utc::now();
        let artifact = match format {
            ExportFormat::Csv => {
                let fields = ExportFieldSet::for_tier(tier);
                ExportArtifact::Csv(CsvExport {
                    filename: export_filename(format, now),
                    fields,
                    rows: companies.len(),
                    content: render_csv(&companies, fields),
                })
            }
            ExportFormat::Pdf => ExportArtifact::Pdf(build_report(&companies, tier, now)),
        };

        info!(
            format = format.extension(),
            rows = artifact.rows(),
            exports_this_month = count,
            "export generated"
        );
        Ok(artifact)
    }

    /// CSV export reduced to a receipt
    pub async fn export_to_csv(&self, user: Option<&UserId>, selection: ExportSelection) -> MemberResult<ExportReceipt> {
        let artifact = self.export_companies(user, ExportFormat::Csv, selection).await?;
        self.receipt(user, &artifact)
    }

    /// Report export reduced to a receipt
    pub async fn export_to_pdf(&self, user: Option<&UserId>, selection: ExportSelection) -> MemberResult<ExportReceipt> {
        let artifact = self.export_companies(user, ExportFormat::Pdf, selection).await?;
        self.receipt(user, &artifact)
    }

    fn receipt(&self, user: Option<&UserId>, artifact: &ExportArtifact) -> MemberResult<ExportReceipt> {
        let user = self.authenticated(user)?;
        let tier = self.store.tier(user);
        let exports_this_month = self.store.exports_in(user, UsageMonth::of(Utc::now()));
        Ok(ExportReceipt {
            success: true,
            format: artifact.format(),
            filename: artifact.filename().to_string(),
            rows: artifact.rows(),
            exports_this_month,
            remaining: limit_for(tier, LimitType::Exports).remaining(exports_this_month),
        })
    }

    async fn resolve_selection(&self, user: &UserId, selection: ExportSelection) -> MemberResult<Vec<Company>> {
        let companies = match selection {
            ExportSelection::Companies(ids) => self.directory.get_many(&ids).await?,
            ExportSelection::Query(mut query) => {
                query.page = Some(1);
                query.limit = Some(usize::MAX);
                self.directory.get_all(&query).await?.data
            }
            ExportSelection::Bookmarks => {
                let ids: Vec<EntityId> = self.store.bookmarks(user).into_iter().map(|b| b.company_id).collect();
                self.directory.get_many(&ids).await?
            }
        };
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icn_directory::{DirectoryConfig, DirectoryService};
    use serde_json::json;

    async fn service() -> MemberService {
        let rows: Vec<_> = (0..8)
            .map(|i| {
                let state = if i % 2 == 0 { "QLD" } else { "SA" };
                json!({
                    "organizationId": format!("ORG-{i}"),
                    "organizationName": format!("Supplier {i}"),
                    "capabilityType": "Supplier",
                    "state": state
                })
            })
            .collect();
        let directory = DirectoryService::in_memory(DirectoryConfig::default());
        directory
            .load(&json!([{"itemId": "I-1", "itemName": "Cabling", "sectorName": "Energy", "organizations": rows}]))
            .await
            .unwrap();
        MemberService::new(Arc::new(MemberStore::new()), Arc::new(directory))
    }

    fn company(i: usize) -> EntityId {
        EntityId::from_string(format!("ORG-{i}"))
    }

    #[tokio::test]
    async fn test_anonymous_calls_are_rejected() {
        let members = service().await;

        assert_eq!(members.current_tier(None).unwrap_err(), MemberError::NotAuthenticated);
        assert_eq!(
            members.add_bookmark(None, &company(0)).await.unwrap_err(),
            MemberError::NotAuthenticated
        );
        assert_eq!(
            members.export_to_csv(None, ExportSelection::Bookmarks).await.unwrap_err(),
            MemberError::NotAuthenticated
        );
    }

    #[tokio::test]
    async fn test_free_bookmark_limit_is_five() {
        let members = service().await;
        let user = UserId::from("free-user");

        for i in 0..5 {
            let receipt = members.add_bookmark(Some(&user), &company(i)).await.unwrap();
            assert!(receipt.success);
            assert_eq!(receipt.bookmarks, i + 1);
        }

        let err = members.add_bookmark(Some(&user), &company(5)).await.unwrap_err();
        assert!(matches!(err, MemberError::LimitReached { limit: 5, .. }));
        assert!(err.to_string().contains('5'));

        // re-adding an existing bookmark is still fine at the ceiling
        assert!(members.add_bookmark(Some(&user), &company(0)).await.unwrap().success);

        members.subscribe(Some(&user), Tier::Plus).unwrap();
        assert_eq!(members.add_bookmark(Some(&user), &company(5)).await.unwrap().bookmarks, 6);
    }

    #[tokio::test]
    async fn test_bookmark_requires_existing_company() {
        let members = service().await;
        let user = UserId::from("u");

        let err = members.add_bookmark(Some(&user), &EntityId::from("nope")).await.unwrap_err();
        assert!(matches!(err, MemberError::NotFound { kind: "company", .. }));

        let err = members.remove_bookmark(Some(&user), &company(1)).unwrap_err();
        assert!(matches!(err, MemberError::NotFound { kind: "bookmark", .. }));
    }

    #[tokio::test]
    async fn test_list_bookmarks_in_order() {
        let members = service().await;
        let user = UserId::from("u");
        for i in [3, 1, 6] {
            members.add_bookmark(Some(&user), &company(i)).await.unwrap();
        }
        members.remove_bookmark(Some(&user), &company(1)).unwrap();

        let names: Vec<String> = members
            .list_bookmarks(Some(&user))
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, ["Supplier 3", "Supplier 6"]);
        assert!(members.is_bookmarked(Some(&user), &company(6)).unwrap());
        assert!(!members.is_bookmarked(Some(&user), &company(1)).unwrap());
    }

    #[tokio::test]
    async fn test_saved_searches_need_plus() {
        let members = service().await;
        let user = UserId::from("u");
        let query = CompanyQuery::new().with_search("supplier");

        let err = members.save_search(Some(&user), "All", query.clone()).unwrap_err();
        assert_eq!(
            err,
            MemberError::TierDenied {
                feature: Feature::SavedSearches,
                required: Tier::Plus,
                current: Tier::Free,
            }
        );
        assert!(err.to_string().contains("Plus"));

        members.subscribe(Some(&user), Tier::Plus).unwrap();
        for n in 0..10 {
            members.save_search(Some(&user), &format!("search {n}"), query.clone()).unwrap();
        }
        let err = members.save_search(Some(&user), "one more", query.clone()).unwrap_err();
        assert!(matches!(err, MemberError::LimitReached { limit: 10, .. }));

        let first = members.list_saved_searches(Some(&user)).unwrap().remove(0);
        let page = members.run_saved_search(Some(&user), &first.id).await.unwrap();
        assert_eq!(page.total, 8);

        members.delete_saved_search(Some(&user), &first.id).unwrap();
        assert!(matches!(
            members.delete_saved_search(Some(&user), &first.id),
            Err(MemberError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_csv_export_gated_until_plus() {
        let members = service().await;
        let user = UserId::from("u");
        let selection = ExportSelection::Companies(vec![company(0), company(1)]);

        let err = members.export_to_csv(Some(&user), selection.clone()).await.unwrap_err();
        assert!(matches!(err, MemberError::TierDenied { required: Tier::Plus, .. }));

        members.subscribe(Some(&user), Tier::Plus).unwrap();
        let receipt = members.export_to_csv(Some(&user), selection).await.unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.rows, 2);
        assert_eq!(receipt.exports_this_month, 1);
        assert_eq!(receipt.remaining, Some(99));
        assert!(receipt.filename.ends_with(".csv"));
    }

    #[tokio::test]
    async fn test_csv_columns_follow_tier() {
        let members = service().await;
        let user = UserId::from("u");
        members.subscribe(Some(&user), Tier::Plus).unwrap();

        let query = CompanyQuery::new().with_page(1, 2);
        let artifact = members
            .export_companies(Some(&user), ExportFormat::Csv, ExportSelection::Query(query))
            .await
            .unwrap();
        let ExportArtifact::Csv(csv) = artifact else {
            panic!("expected csv export");
        };
        assert_eq!(csv.fields, ExportFieldSet::Medium);
        assert_eq!(csv.rows, 8);
        let header = csv.content.lines().next().unwrap();
        assert!(header.contains("Capabilities"));
        assert!(!header.contains("Email"));
    }

    #[tokio::test]
    async fn test_pdf_export_is_premium() {
        let members = service().await;
        let user = UserId::from("u");
        members.subscribe(Some(&user), Tier::Plus).unwrap();

        let err = members.export_to_pdf(Some(&user), ExportSelection::Bookmarks).await.unwrap_err();
        assert!(matches!(err, MemberError::TierDenied { required: Tier::Premium, .. }));

        members.subscribe(Some(&user), Tier::Premium).unwrap();
        members.add_bookmark(Some(&user), &company(2)).await.unwrap();
        let artifact = members
            .export_companies(Some(&user), ExportFormat::Pdf, ExportSelection::Bookmarks)
            .await
            .unwrap();
        let ExportArtifact::Pdf(report) = artifact else {
            panic!("expected report");
        };
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].heading, "Supplier 2");
        assert_eq!(members.usage(Some(&user)).unwrap().exports_this_month, 1);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_free() {
        let members = service().await;
        let user = UserId::from("u");
        members.subscribe(Some(&user), Tier::Premium).unwrap();
        assert!(members.entitlements(Some(&user)).unwrap().is_entitled_to(Feature::ApiAccess));

        members.cancel(Some(&user)).unwrap();
        assert_eq!(members.current_tier(Some(&user)).unwrap(), Tier::Free);
        assert!(!members.entitlements(Some(&user)).unwrap().is_entitled_to(Feature::ExportCsv));
    }
}
