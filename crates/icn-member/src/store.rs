//! Per-user member state
//!
//! Subscriptions, bookmarks, saved searches and export counters, keyed by
//! user id. Every quota-bound insert checks and mutates under one write lock,
//! so concurrent callers cannot overshoot a ceiling.

use chrono::Utc;
use icn_directory::EntityId;
use icn_entitlements::{LimitType, Quota, QuotaExceeded, Tier};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::{Bookmark, ExportUsage, SavedSearch, Subscription, UsageMonth, UserId};

/// In-process member state. Lives as long as the owning context.
#[derive(Default)]
pub struct MemberStore {
    subscriptions: RwLock<HashMap<UserId, Subscription>>,
    bookmarks: RwLock<HashMap<UserId, Vec<Bookmark>>>,
    saved_searches: RwLock<HashMap<UserId, Vec<SavedSearch>>>,
    exports: RwLock<HashMap<UserId, ExportUsage>>,
}

impl MemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn subscription(&self, user: &UserId) -> Option<Subscription> {
        self.subscriptions.read().get(user).copied()
    }

    /// Current tier; users without a subscription are on the free tier
    pub fn tier(&self, user: &UserId) -> Tier {
        self.subscription(user).map(|s| s.tier).unwrap_or_default()
    }

    pub fn set_tier(&self, user: &UserId, tier: Tier) -> Subscription {
        let subscription = Subscription {
            tier,
            since: Utc::now(),
        };
        self.subscriptions.write().insert(user.clone(), subscription);
        subscription
    }

    // =========================================================================
    // Bookmarks
    // =========================================================================

    pub fn bookmarks(&self, user: &UserId) -> Vec<Bookmark> {
        self.bookmarks.read().get(user).cloned().unwrap_or_default()
    }

    pub fn bookmark_count(&self, user: &UserId) -> usize {
        self.bookmarks.read().get(user).map_or(0, Vec::len)
    }

    pub fn is_bookmarked(&self, user: &UserId, company_id: &EntityId) -> bool {
        self.bookmarks
            .read()
            .get(user)
            .is_some_and(|list| list.iter().any(|b| &b.company_id == company_id))
    }

    /// Add a bookmark unless already present. Returns whether it was added
    /// and the resulting count. An existing bookmark never counts against
    /// the quota.
    pub fn insert_bookmark(
        &self,
        user: &UserId,
        company_id: &EntityId,
        quota: Quota,
    ) -> Result<(bool, usize), QuotaExceeded> {
        let mut bookmarks = self.bookmarks.write();
        let list = bookmarks.entry(user.clone()).or_default();
        if list.iter().any(|b| &b.company_id == company_id) {
            return Ok((false, list.len()));
        }

        quota.check(LimitType::Bookmarks, list.len())?;
        list.push(Bookmark {
            company_id: company_id.clone(),
            created_at: Utc::now(),
        });
        Ok((true, list.len()))
    }

    /// Remove a bookmark, returning the remaining count, or `None` if it
    /// was not bookmarked
    pub fn remove_bookmark(&self, user: &UserId, company_id: &EntityId) -> Option<usize> {
        let mut bookmarks = self.bookmarks.write();
        let list = bookmarks.get_mut(user)?;
        let index = list.iter().position(|b| &b.company_id == company_id)?;
        list.remove(index);
        Some(list.len())
    }

    // =========================================================================
    // Saved searches
    // =========================================================================

    pub fn saved_searches(&self, user: &UserId) -> Vec<SavedSearch> {
        self.saved_searches.read().get(user).cloned().unwrap_or_default()
    }

    pub fn saved_search_count(&self, user: &UserId) -> usize {
        self.saved_searches.read().get(user).map_or(0, Vec::len)
    }

    pub fn saved_search(&self, user: &UserId, id: &str) -> Option<SavedSearch> {
        self.saved_searches
            .read()
            .get(user)
            .and_then(|list| list.iter().find(|s| s.id == id).cloned())
    }

    /// Store a search if the quota allows, returning the resulting count
    pub fn insert_saved_search(
        &self,
        user: &UserId,
        search: SavedSearch,
        quota: Quota,
    ) -> Result<usize, QuotaExceeded> {
        let mut searches = self.saved_searches.write();
        let list = searches.entry(user.clone()).or_default();
        quota.check(LimitType::SavedSearches, list.len())?;
        list.push(search);
        Ok(list.len())
    }

    pub fn remove_saved_search(&self, user: &UserId, id: &str) -> Option<SavedSearch> {
        let mut searches = self.saved_searches.write();
        let list = searches.get_mut(user)?;
        let index = list.iter().position(|s| s.id == id)?;
        Some(list.remove(index))
    }

    // =========================================================================
    // Export usage
    // =========================================================================

    /// Exports made in `month`
    pub fn exports_in(&self, user: &UserId, month: UsageMonth) -> usize {
        self.exports
            .read()
            .get(user)
            .filter(|usage| usage.month == month)
            .map_or(0, |usage| usage.count)
    }

    /// Count one export in `month` if the quota allows. A new month starts
    /// from zero. Returns the month's count including this export.
    pub fn record_export(&self, user: &UserId, month: UsageMonth, quota: Quota) -> Result<usize, QuotaExceeded> {
        let mut exports = self.exports.write();
        let usage = exports
            .entry(user.clone())
            .or_insert(ExportUsage { month, count: 0 });
        if usage.month != month {
            *usage = ExportUsage { month, count: 0 };
        }

        quota.check(LimitType::Exports, usage.count)?;
        usage.count += 1;
        Ok(usage.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icn_directory::CompanyQuery;

    fn user() -> UserId {
        UserId::from("user-1")
    }

    #[test]
    fn test_default_tier_is_free() {
        let store = MemberStore::new();
        assert_eq!(store.tier(&user()), Tier::Free);
        assert!(store.subscription(&user()).is_none());

        store.set_tier(&user(), Tier::Premium);
        assert_eq!(store.tier(&user()), Tier::Premium);
    }

    #[test]
    fn test_bookmark_quota_and_readd() {
        let store = MemberStore::new();
        let ids: Vec<EntityId> = (0..3).map(|i| EntityId::from_string(format!("c{i}"))).collect();
        let quota = Quota::Max(2);

        assert_eq!(store.insert_bookmark(&user(), &ids[0], quota).unwrap(), (true, 1));
        assert_eq!(store.insert_bookmark(&user(), &ids[1], quota).unwrap(), (true, 2));
        assert_eq!(store.insert_bookmark(&user(), &ids[1], quota).unwrap(), (false, 2));

        let err = store.insert_bookmark(&user(), &ids[2], quota).unwrap_err();
        assert_eq!(err.limit, 2);
        assert!(!store.is_bookmarked(&user(), &ids[2]));

        assert_eq!(store.remove_bookmark(&user(), &ids[0]), Some(1));
        assert_eq!(store.remove_bookmark(&user(), &ids[0]), None);
        assert_eq!(store.insert_bookmark(&user(), &ids[2], quota).unwrap(), (true, 2));
    }

    #[test]
    fn test_saved_search_zero_quota() {
        let store = MemberStore::new();
        let search = SavedSearch::new("Victoria", CompanyQuery::new());

        assert!(store.insert_saved_search(&user(), search.clone(), Quota::Max(0)).is_err());
        assert_eq!(store.insert_saved_search(&user(), search.clone(), Quota::Unlimited).unwrap(), 1);
        assert_eq!(store.saved_search(&user(), &search.id), Some(search.clone()));
        assert_eq!(store.remove_saved_search(&user(), &search.id), Some(search));
        assert_eq!(store.saved_search_count(&user()), 0);
    }

    #[test]
    fn test_export_counter_resets_each_month() {
        let store = MemberStore::new();
        let may = UsageMonth { year: 2025, month: 5 };
        let june = UsageMonth { year: 2025, month: 6 };
        let quota = Quota::Max(2);

        assert_eq!(store.record_export(&user(), may, quota).unwrap(), 1);
        assert_eq!(store.record_export(&user(), may, quota).unwrap(), 2);
        assert!(store.record_export(&user(), may, quota).is_err());
        assert_eq!(store.exports_in(&user(), may), 2);

        assert_eq!(store.exports_in(&user(), june), 0);
        assert_eq!(store.record_export(&user(), june, quota).unwrap(), 1);
    }
}
