//! Summary browser: the arena listing page.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::client::{ArenaApi, ClientError};
use crate::models::{ArenaSummary, FilterSet, Server, SortMode, SummaryKey};
use crate::notify::{NoticeLevel, Notifier};
use crate::paging::{jump_to_page, JumpOutcome, PageEntry, PageState};
use crate::query::summary_query;

/// Summary rows per page, fixed for the browse view.
pub const ITEMS_PER_PAGE: u32 = 30;

/// Seasons offered when the seasons endpoint is unreachable.
pub const SEASON_FALLBACK: std::ops::RangeInclusive<u32> = 1..=10;

/// State and operations of the summary browser.
///
/// Mirrors what the arena page tracked: server, sort, filter panel state,
/// the current page of rows, and the moderation selection. Any change to
/// server, sort, or filters snaps back to page 1.
pub struct ArenaBrowser<A: ArenaApi> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    server: Server,
    sort: SortMode,
    filters: FilterSet,
    page: PageState,
    summaries: Vec<ArenaSummary>,
    selection: HashSet<SummaryKey>,
}

impl<A: ArenaApi> ArenaBrowser<A> {
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            server: Server::All,
            sort: SortMode::Default,
            filters: FilterSet::new(),
            page: PageState::new(ITEMS_PER_PAGE),
            summaries: Vec::new(),
            selection: HashSet::new(),
        }
    }

    pub fn summaries(&self) -> &[ArenaSummary] {
        &self.summaries
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn window(&self) -> Vec<PageEntry> {
        self.page.window()
    }

    pub fn server(&self) -> Server {
        self.server
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Set the whole browse position in one step without fetching, for
    /// one-shot uses that follow with a single [`refresh`](Self::refresh).
    pub fn configure(&mut self, server: Server, sort: SortMode, filters: FilterSet, page: u32) {
        self.server = server;
        self.sort = sort;
        self.filters = filters;
        self.page.current_page = page.max(1);
    }

    /// Fetch the current page. Selection is cleared on every refresh, so a
    /// stale selection can never outlive the rows it pointed at.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.selection.clear();

        let query = summary_query(
            &self.filters,
            self.page.current_page,
            ITEMS_PER_PAGE,
            self.sort,
            self.server,
        );

        match self.api.summaries(&query).await {
            Ok(page) => {
                self.page.total_items = page.total;
                self.summaries = page.data;
                Ok(())
            }
            Err(e) => {
                self.notifier.notify("Failed to load data", NoticeLevel::Error);
                Err(e)
            }
        }
    }

    /// Navigate to a page if it is in range; refreshes on change.
    pub async fn set_page(&mut self, target: u32) -> Result<bool, ClientError> {
        if !self.page.go_to(target) {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Free-text jump-to-page input. Invalid input navigates nowhere.
    pub async fn jump_to(&mut self, raw: &str) -> Result<bool, ClientError> {
        match jump_to_page(raw, self.page.total_pages()) {
            JumpOutcome::Jump(page) => self.set_page(page).await,
            JumpOutcome::Invalid => Ok(false),
        }
    }

    pub async fn set_filters(&mut self, filters: FilterSet) -> Result<(), ClientError> {
        self.filters = filters;
        self.page.current_page = 1;
        self.refresh().await
    }

    pub async fn set_server(&mut self, server: Server) -> Result<(), ClientError> {
        self.server = server;
        self.page.current_page = 1;
        self.refresh().await
    }

    pub async fn set_sort(&mut self, sort: SortMode) -> Result<(), ClientError> {
        self.sort = sort;
        self.page.current_page = 1;
        self.refresh().await
    }

    pub async fn set_season(&mut self, season: Option<u32>) -> Result<(), ClientError> {
        self.filters.season = season;
        self.page.current_page = 1;
        self.refresh().await
    }

    /// Seasons available for the current server. Falls back to the fixed
    /// range when the endpoint is down, and drops a selected season that is
    /// no longer offered.
    pub async fn load_seasons(&mut self) -> Vec<u32> {
        let seasons = match self.api.seasons(self.server).await {
            Ok(seasons) => seasons,
            Err(e) => {
                warn!("Error fetching seasons, using fallback: {}", e);
                SEASON_FALLBACK.collect()
            }
        };

        if let Some(selected) = self.filters.season {
            if !seasons.contains(&selected) {
                self.filters.season = None;
            }
        }

        seasons
    }

    // ── Selection ────────────────────────────────────────────────

    pub fn selected(&self) -> &HashSet<SummaryKey> {
        &self.selection
    }

    pub fn is_selected(&self, summary: &ArenaSummary) -> bool {
        self.selection.contains(&summary.key())
    }

    pub fn toggle_select(&mut self, summary: &ArenaSummary, checked: bool) {
        let key = summary.key();
        if checked {
            self.selection.insert(key);
        } else {
            self.selection.remove(&key);
        }
    }

    /// Select every row on the page, or clear them all when every row is
    /// already selected.
    pub fn select_all_page(&mut self) {
        let keys: Vec<SummaryKey> = self.summaries.iter().map(|s| s.key()).collect();
        let all_selected =
            !keys.is_empty() && keys.iter().all(|key| self.selection.contains(key));

        if all_selected {
            for key in keys {
                self.selection.remove(&key);
            }
        } else {
            self.selection.extend(keys);
        }
    }

    // ── Moderation ───────────────────────────────────────────────

    /// Delete one summary row behind a confirmation.
    pub async fn delete_one(&mut self, key: SummaryKey) -> Result<bool, ClientError> {
        if !self
            .notifier
            .confirm("Delete summary", "Remove this record and its battles?")
        {
            return Ok(false);
        }

        match self.api.delete_summary(&key).await {
            Ok(()) => {
                self.notifier
                    .notify("Deleted successfully", NoticeLevel::Success);
                self.refresh().await?;
                Ok(true)
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    /// Delete every selected row behind a confirmation.
    pub async fn batch_delete(&mut self) -> Result<bool, ClientError> {
        if self.selection.is_empty() {
            return Ok(false);
        }

        let count = self.selection.len();
        if !self.notifier.confirm(
            "Batch delete",
            &format!("Delete {} selected records?", count),
        ) {
            return Ok(false);
        }

        let keys: Vec<SummaryKey> = self.selection.iter().cloned().collect();
        match self.api.batch_delete(&keys).await {
            Ok(()) => {
                self.notifier
                    .notify("Deleted successfully", NoticeLevel::Success);
                self.refresh().await?;
                Ok(true)
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::ScriptedApi;
    use crate::models::SummaryPage;
    use crate::notify::RecordingNotifier;
    use pretty_assertions::assert_eq;

    fn summary(season: u32, atk_sig: &str) -> ArenaSummary {
        serde_json::from_value(serde_json::json!({
            "server": "global",
            "season": season,
            "tag": "",
            "attackingTeam": [1, 2],
            "defendingTeam": [3, 4],
            "total": 10,
            "wins": 6,
            "losses": 4,
            "winRate": 0.6,
            "wilsonScore": 0.31,
            "avgWinRate": 0.58,
            "lastSeen": 1735689600,
            "atk_sig": atk_sig,
            "def_sig": "3,4"
        }))
        .unwrap()
    }

    fn browser_with(
        api: Arc<ScriptedApi>,
        notifier: Arc<RecordingNotifier>,
    ) -> ArenaBrowser<ScriptedApi> {
        ArenaBrowser::new(api, notifier)
    }

    fn page_of(data: Vec<ArenaSummary>, total: u32) -> SummaryPage<ArenaSummary> {
        SummaryPage {
            data,
            total,
            page: 1,
            total_pages: total.div_ceil(ITEMS_PER_PAGE),
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_page_and_clears_selection() {
        let api = Arc::new(ScriptedApi::default());
        *api.summaries_page.lock().unwrap() = page_of(vec![summary(9, "1,2")], 90);
        let notifier = Arc::new(RecordingNotifier::new(true));
        let mut browser = browser_with(api.clone(), notifier);

        browser.refresh().await.unwrap();
        assert_eq!(browser.summaries().len(), 1);
        assert_eq!(browser.page_state().total_pages(), 3);

        let row = browser.summaries()[0].clone();
        browser.toggle_select(&row, true);
        assert_eq!(browser.selected().len(), 1);

        browser.refresh().await.unwrap();
        assert!(browser.selected().is_empty());
    }

    #[tokio::test]
    async fn test_filter_change_resets_to_first_page() {
        let api = Arc::new(ScriptedApi::default());
        *api.summaries_page.lock().unwrap() = page_of(vec![], 300);
        let notifier = Arc::new(RecordingNotifier::new(true));
        let mut browser = browser_with(api.clone(), notifier);

        browser.refresh().await.unwrap();
        browser.set_page(5).await.unwrap();
        assert_eq!(browser.page_state().current_page, 5);

        let mut filters = FilterSet::new();
        filters.min_battles = Some(30);
        browser.set_filters(filters).await.unwrap();
        assert_eq!(browser.page_state().current_page, 1);

        // The last composed query carries the new filter and page 1.
        let queries = api.summary_queries.lock().unwrap();
        let last = queries.last().unwrap();
        assert!(last.contains(&("page".to_string(), "1".to_string())));
        assert!(last.contains(&("min_battles".to_string(), "30".to_string())));
    }

    #[tokio::test]
    async fn test_jump_ignores_invalid_input() {
        let api = Arc::new(ScriptedApi::default());
        *api.summaries_page.lock().unwrap() = page_of(vec![], 300);
        let notifier = Arc::new(RecordingNotifier::new(true));
        let mut browser = browser_with(api, notifier);

        browser.refresh().await.unwrap();
        assert!(!browser.jump_to("99").await.unwrap());
        assert!(!browser.jump_to("abc").await.unwrap());
        assert!(browser.jump_to("3").await.unwrap());
        assert_eq!(browser.page_state().current_page, 3);
    }

    #[tokio::test]
    async fn test_select_all_page_toggles() {
        let api = Arc::new(ScriptedApi::default());
        *api.summaries_page.lock().unwrap() =
            page_of(vec![summary(9, "1,2"), summary(9, "5,6")], 2);
        let notifier = Arc::new(RecordingNotifier::new(true));
        let mut browser = browser_with(api, notifier);

        browser.refresh().await.unwrap();
        browser.select_all_page();
        assert_eq!(browser.selected().len(), 2);
        browser.select_all_page();
        assert!(browser.selected().is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete_requires_confirmation() {
        let api = Arc::new(ScriptedApi::default());
        *api.summaries_page.lock().unwrap() = page_of(vec![summary(9, "1,2")], 1);
        let notifier = Arc::new(RecordingNotifier::new(false));
        let mut browser = browser_with(api.clone(), notifier.clone());

        browser.refresh().await.unwrap();
        browser.select_all_page();
        assert!(!browser.batch_delete().await.unwrap());
        assert!(api.batch_deleted.lock().unwrap().is_empty());

        notifier.set_answer(true);
        browser.select_all_page();
        assert!(browser.batch_delete().await.unwrap());
        let batches = api.batch_deleted.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
    }

    #[tokio::test]
    async fn test_batch_delete_noop_when_nothing_selected() {
        let api = Arc::new(ScriptedApi::default());
        let notifier = Arc::new(RecordingNotifier::new(true));
        let mut browser = browser_with(api.clone(), notifier.clone());

        assert!(!browser.batch_delete().await.unwrap());
        assert!(notifier.confirmations().is_empty());
    }

    #[tokio::test]
    async fn test_seasons_fallback_and_stale_selection() {
        let api = Arc::new(ScriptedApi::default());
        *api.seasons.lock().unwrap() = Err(());
        let notifier = Arc::new(RecordingNotifier::new(true));
        let mut browser = browser_with(api.clone(), notifier);

        browser.filters.season = Some(99);
        let seasons = browser.load_seasons().await;
        assert_eq!(seasons, (1..=10).collect::<Vec<_>>());
        assert_eq!(browser.filters().season, None);

        *api.seasons.lock().unwrap() = Ok(vec![8, 9]);
        browser.filters.season = Some(9);
        let seasons = browser.load_seasons().await;
        assert_eq!(seasons, vec![8, 9]);
        assert_eq!(browser.filters().season, Some(9));
    }
}
