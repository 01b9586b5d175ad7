use crate::catalog::{Episode, EpisodeCache, Show};

/// Which list the main pane is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Shows,
    Episodes,
}

/// Episode-picker narrowing: the whole cached list, or a single episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpisodeFocus {
    #[default]
    All,
    One(u64),
}

/// Outcome of `select_show`: either the episodes are already cached, or the
/// caller still has to start a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    CacheHit,
    NeedsFetch,
}

/// Browsing state: the full show list, the per-show episode cache, and the
/// current selection/filter.
///
/// All mutation goes through the methods below; the UI layer only reads the
/// derived lists and calls back into the operations. Fetch completions are
/// applied through `shows_loaded`/`episodes_loaded`/`*_failed`, which are the
/// single writer path for network data.
#[derive(Debug, Default)]
pub struct Browser {
    shows: Vec<Show>,
    cache: EpisodeCache,
    selected_show: Option<u64>,
    search_term: String,
    episode_focus: EpisodeFocus,
    error: Option<String>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    // --- fetch completions ---

    pub fn shows_loaded(&mut self, shows: Vec<Show>) {
        self.shows = shows;
        self.error = None;
    }

    /// The caller sees an empty catalog plus the visible message; no typed
    /// error crosses this boundary.
    pub fn shows_failed(&mut self, message: impl Into<String>) {
        self.shows = Vec::new();
        self.error = Some(message.into());
    }

    /// A late completion for a show the user has already left still fills
    /// that show's cache slot.
    pub fn episodes_loaded(&mut self, show_id: u64, episodes: Vec<Episode>) {
        self.cache.insert(show_id, episodes);
    }

    /// The cache stays untouched so re-selecting the show fetches again.
    /// If the failure is for the current selection, the view falls back to
    /// the show list; a stale failure for a background fetch changes nothing.
    pub fn episodes_failed(&mut self, show_id: u64, message: impl Into<String>) {
        if self.selected_show == Some(show_id) {
            self.selected_show = None;
            self.search_term.clear();
            self.episode_focus = EpisodeFocus::All;
            self.error = Some(message.into());
        }
    }

    // --- user operations ---

    /// Selects a show, clears the search term, resets the episode focus to
    /// All, and switches to the episode view.
    pub fn select_show(&mut self, id: u64) -> Selection {
        self.selected_show = Some(id);
        self.search_term.clear();
        self.episode_focus = EpisodeFocus::All;
        self.error = None;

        if self.cache.contains(id) {
            Selection::CacheHit
        } else {
            Selection::NeedsFetch
        }
    }

    /// Returns to the show list with the search term and episode focus reset.
    pub fn clear_selection(&mut self) {
        self.selected_show = None;
        self.search_term.clear();
        self.episode_focus = EpisodeFocus::All;
    }

    /// Stores the lowercased term. Typing always widens the episode picker
    /// back out to All.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_lowercase();
        self.episode_focus = EpisodeFocus::All;
    }

    pub fn select_episode(&mut self, id: Option<u64>) {
        self.episode_focus = match id {
            Some(id) => EpisodeFocus::One(id),
            None => EpisodeFocus::All,
        };
    }

    // --- derived views ---

    pub fn pane(&self) -> Pane {
        if self.selected_show.is_some() {
            Pane::Episodes
        } else {
            Pane::Shows
        }
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn episode_focus(&self) -> EpisodeFocus {
        self.episode_focus
    }

    pub fn selected_show_id(&self) -> Option<u64> {
        self.selected_show
    }

    pub fn selected_show(&self) -> Option<&Show> {
        self.selected_show
            .and_then(|id| self.shows.iter().find(|s| s.id == id))
    }

    pub fn has_cached(&self, show_id: u64) -> bool {
        self.cache.contains(show_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn visible_shows(&self) -> Vec<&Show> {
        filter_shows(&self.search_term, &self.shows)
    }

    /// The selected show's full cached episode list, or empty while the
    /// fetch is still in flight.
    pub fn cached_episodes(&self) -> &[Episode] {
        self.selected_show
            .and_then(|id| self.cache.get(id))
            .unwrap_or(&[])
    }

    /// Cached episodes with the search filter applied (picker contents).
    pub fn filtered_episodes(&self) -> Vec<&Episode> {
        filter_episodes(&self.search_term, self.cached_episodes())
    }

    /// Filtered episodes, further narrowed to a single one when the picker
    /// has an episode focused.
    pub fn visible_episodes(&self) -> Vec<&Episode> {
        let filtered = self.filtered_episodes();
        match self.episode_focus {
            EpisodeFocus::All => filtered,
            EpisodeFocus::One(id) => filtered.into_iter().filter(|e| e.id == id).collect(),
        }
    }

    /// The "Results: N" counter for the current pane.
    pub fn result_count(&self) -> usize {
        match self.pane() {
            Pane::Shows => self.visible_shows().len(),
            Pane::Episodes => self.visible_episodes().len(),
        }
    }
}

/// Case-insensitive substring match on name, any genre, or summary.
/// Recomputed from the full source every time; an empty term is the
/// identity filter.
pub fn filter_shows<'a>(term: &str, shows: &'a [Show]) -> Vec<&'a Show> {
    if term.is_empty() {
        return shows.iter().collect();
    }
    let term = term.to_lowercase();
    shows
        .iter()
        .filter(|show| {
            show.name.to_lowercase().contains(&term)
                || show.genres.iter().any(|g| g.to_lowercase().contains(&term))
                || show
                    .summary
                    .as_ref()
                    .is_some_and(|s| s.to_lowercase().contains(&term))
        })
        .collect()
}

/// Case-insensitive substring match on name or summary.
pub fn filter_episodes<'a>(term: &str, episodes: &'a [Episode]) -> Vec<&'a Episode> {
    if term.is_empty() {
        return episodes.iter().collect();
    }
    let term = term.to_lowercase();
    episodes
        .iter()
        .filter(|ep| {
            ep.name.to_lowercase().contains(&term)
                || ep
                    .summary
                    .as_ref()
                    .is_some_and(|s| s.to_lowercase().contains(&term))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(id: u64, name: &str) -> Show {
        Show {
            id,
            name: name.to_string(),
            genres: vec!["Drama".to_string()],
            summary: Some(format!("Summary of {}", name)),
            ..Default::default()
        }
    }

    fn episode(id: u64, name: &str, summary: &str) -> Episode {
        Episode {
            id,
            name: name.to_string(),
            season: 1,
            number: id as u32,
            summary: Some(summary.to_string()),
            ..Default::default()
        }
    }

    fn browser_with_shows() -> Browser {
        let mut browser = Browser::new();
        browser.shows_loaded(vec![show(2, "alpha"), show(1, "Zeta")]);
        browser
    }

    #[test]
    fn loaded_catalog_renders_in_given_order_with_counter() {
        let browser = browser_with_shows();
        let names: Vec<&str> = browser.visible_shows().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Zeta"]);
        assert_eq!(browser.result_count(), 2);
    }

    #[test]
    fn empty_term_is_the_identity_filter() {
        let shows = vec![show(1, "Dragon Ball"), show(2, "Firefly")];
        assert_eq!(filter_shows("", &shows).len(), 2);

        let eps = vec![episode(1, "Pilot", "start"), episode(2, "Finale", "end")];
        assert_eq!(filter_episodes("", &eps).len(), 2);
    }

    #[test]
    fn show_filter_matches_name_case_insensitively() {
        let shows = vec![show(1, "Dragon Ball"), show(2, "Firefly")];
        let hits = filter_shows("drag", &shows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Dragon Ball");
    }

    #[test]
    fn show_filter_matches_genre_and_summary() {
        let mut scifi = show(1, "Firefly");
        scifi.genres = vec!["Science-Fiction".to_string()];
        scifi.summary = Some("A space western".to_string());
        let shows = vec![scifi, show(2, "Cheers")];

        assert_eq!(filter_shows("science", &shows).len(), 1);
        assert_eq!(filter_shows("WESTERN", &shows).len(), 1);
    }

    #[test]
    fn show_filter_results_are_a_subset_containing_the_term() {
        let shows = vec![show(1, "Dragon Ball"), show(2, "Dragnet"), show(3, "Firefly")];
        let term = "drag";
        for hit in filter_shows(term, &shows) {
            let haystack = format!(
                "{} {} {}",
                hit.name,
                hit.genres.join(" "),
                hit.summary.as_deref().unwrap_or("")
            )
            .to_lowercase();
            assert!(haystack.contains(term));
            assert!(shows.iter().any(|s| s.id == hit.id));
        }
    }

    #[test]
    fn zero_matches_yield_an_empty_result_and_counter() {
        let mut browser = browser_with_shows();
        browser.set_search_term("no such show");
        assert!(browser.visible_shows().is_empty());
        assert_eq!(browser.result_count(), 0);
    }

    #[test]
    fn select_show_cache_miss_then_hit() {
        let mut browser = browser_with_shows();
        assert_eq!(browser.select_show(1), Selection::NeedsFetch);

        browser.episodes_loaded(1, vec![episode(10, "Pilot", "start")]);
        browser.clear_selection();

        // second selection short-circuits without a fetch
        assert_eq!(browser.select_show(1), Selection::CacheHit);
        assert_eq!(browser.visible_episodes().len(), 1);
    }

    #[test]
    fn select_show_clears_search_and_switches_pane() {
        let mut browser = browser_with_shows();
        browser.set_search_term("zeta");
        assert_eq!(browser.select_show(1), Selection::NeedsFetch);

        assert_eq!(browser.pane(), Pane::Episodes);
        assert_eq!(browser.search_term(), "");
        assert_eq!(browser.episode_focus(), EpisodeFocus::All);
    }

    #[test]
    fn clear_selection_restores_the_show_list() {
        let mut browser = browser_with_shows();
        browser.select_show(1);
        browser.episodes_loaded(1, vec![episode(10, "Pilot", "start")]);
        browser.set_search_term("pilot");

        browser.clear_selection();

        assert_eq!(browser.pane(), Pane::Shows);
        assert_eq!(browser.search_term(), "");
        assert_eq!(browser.episode_focus(), EpisodeFocus::All);
        assert_eq!(browser.result_count(), 2);
    }

    #[test]
    fn search_filters_episodes_when_a_show_is_selected() {
        let mut browser = browser_with_shows();
        browser.select_show(1);
        browser.episodes_loaded(
            1,
            vec![
                episode(10, "The Dragon", "fire"),
                episode(11, "Quiet Episode", "nothing happens"),
            ],
        );

        browser.set_search_term("dragon");
        assert_eq!(browser.visible_episodes().len(), 1);
        assert_eq!(browser.visible_episodes()[0].id, 10);
        assert_eq!(browser.result_count(), 1);

        browser.set_search_term("nothing");
        assert_eq!(browser.visible_episodes()[0].id, 11);
    }

    #[test]
    fn episode_focus_narrows_to_one_and_back() {
        let mut browser = browser_with_shows();
        browser.select_show(1);
        browser.episodes_loaded(
            1,
            vec![episode(10, "One", "a"), episode(11, "Two", "b")],
        );

        browser.select_episode(Some(11));
        assert_eq!(browser.visible_episodes().len(), 1);
        assert_eq!(browser.visible_episodes()[0].id, 11);

        browser.select_episode(None);
        assert_eq!(browser.visible_episodes().len(), 2);
    }

    #[test]
    fn typing_resets_the_episode_focus() {
        let mut browser = browser_with_shows();
        browser.select_show(1);
        browser.episodes_loaded(
            1,
            vec![episode(10, "One", "a"), episode(11, "Two", "b")],
        );
        browser.select_episode(Some(10));

        browser.set_search_term("t");
        assert_eq!(browser.episode_focus(), EpisodeFocus::All);
    }

    #[test]
    fn failed_episode_fetch_leaves_no_cache_entry_and_falls_back() {
        let mut browser = browser_with_shows();
        assert_eq!(browser.select_show(1), Selection::NeedsFetch);

        browser.episodes_failed(1, "Error loading episodes. Please try again.");

        assert!(!browser.has_cached(1));
        assert_eq!(browser.pane(), Pane::Shows);
        assert_eq!(browser.result_count(), 2);
        assert_eq!(
            browser.error(),
            Some("Error loading episodes. Please try again.")
        );

        // the implicit retry: selecting again needs a fetch
        assert_eq!(browser.select_show(1), Selection::NeedsFetch);
    }

    #[test]
    fn stale_failure_for_a_background_show_changes_nothing() {
        let mut browser = browser_with_shows();
        browser.select_show(1);
        browser.episodes_loaded(1, vec![episode(10, "One", "a")]);

        browser.episodes_failed(2, "Error loading episodes. Please try again.");

        assert_eq!(browser.pane(), Pane::Episodes);
        assert!(browser.error().is_none());
    }

    #[test]
    fn failed_catalog_fetch_yields_an_empty_list_and_a_message() {
        let mut browser = Browser::new();
        browser.shows_failed("Error loading the shows. Please try again later.");

        assert!(browser.visible_shows().is_empty());
        assert_eq!(browser.result_count(), 0);
        assert_eq!(
            browser.error(),
            Some("Error loading the shows. Please try again later.")
        );
    }
}
