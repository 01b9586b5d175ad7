use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::Color,
    widgets::ListState,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::catalog::{CatalogProvider, Episode, Show};
use crate::config::Config;
use crate::error::Result;
use crate::state::{Browser, Pane, Selection};
use crate::ui::{self, picker::PickerItem, widgets};

/// The two user-facing failure messages. Network and parse failures both
/// collapse into these; nothing more structured crosses the UI boundary.
pub const SHOWS_ERROR: &str = "Error loading the shows. Please try again later.";
pub const EPISODES_ERROR: &str = "Error loading episodes. Please try again.";

/// Input mode: normal browsing, the search box, or one of the two pickers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Browse,
    Search,
    ShowPicker,
    EpisodePicker,
}

/// Fetch completions, delivered to the event loop over the message channel.
/// Episode messages carry the show id they were started for, so a late
/// completion lands in that show's cache slot.
pub enum AppMessage {
    ShowsLoaded(Vec<Show>),
    ShowsError(String),
    EpisodesLoaded(u64, Vec<Episode>),
    EpisodesError(u64, String),
}

pub struct App {
    pub running: bool,
    pub view: View,
    pub browser: Browser,
    pub accent: Color,

    pub shows_state: ListState,
    pub episodes_state: ListState,
    pub picker_state: ListState,

    pub search_input: String,
    pub shows_loading: bool,
    pub episodes_loading: bool,

    msg_tx: mpsc::UnboundedSender<AppMessage>,
    msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    provider: Arc<dyn CatalogProvider + Send + Sync>,
}

impl App {
    pub fn new(config: &Config, provider: Arc<dyn CatalogProvider + Send + Sync>) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            view: View::Browse,
            browser: Browser::new(),
            accent,

            shows_state: ListState::default(),
            episodes_state: ListState::default(),
            picker_state: ListState::default(),

            search_input: String::new(),
            shows_loading: false,
            episodes_loading: false,

            msg_tx,
            msg_rx,

            provider,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.fetch_shows();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
            self.process_messages();
        }

        Ok(())
    }

    // --- fetches ---

    fn fetch_shows(&mut self) {
        self.shows_loading = true;
        let provider = Arc::clone(&self.provider);
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match provider.fetch_shows().await {
                Ok(shows) => {
                    let _ = tx.send(AppMessage::ShowsLoaded(shows));
                }
                Err(e) => {
                    error!(error = %e, "Show catalog fetch failed");
                    let _ = tx.send(AppMessage::ShowsError(SHOWS_ERROR.to_string()));
                }
            }
        });
    }

    /// Selects a show; spawns an episode fetch unless the cache already has
    /// the list.
    fn select_show(&mut self, show_id: u64) {
        self.search_input.clear();

        if self.browser.select_show(show_id) == Selection::NeedsFetch {
            self.episodes_loading = true;
            let provider = Arc::clone(&self.provider);
            let tx = self.msg_tx.clone();

            tokio::spawn(async move {
                match provider.fetch_episodes(show_id).await {
                    Ok(episodes) => {
                        let _ = tx.send(AppMessage::EpisodesLoaded(show_id, episodes));
                    }
                    Err(e) => {
                        error!(show_id, error = %e, "Episode fetch failed");
                        let _ = tx.send(AppMessage::EpisodesError(
                            show_id,
                            EPISODES_ERROR.to_string(),
                        ));
                    }
                }
            });
        }

        self.reset_episode_selection();
    }

    // --- messages ---

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply_message(msg);
        }
    }

    fn apply_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::ShowsLoaded(shows) => {
                self.shows_loading = false;
                info!(count = shows.len(), "Show catalog loaded");
                self.browser.shows_loaded(shows);
                self.reset_show_selection();
            }
            AppMessage::ShowsError(message) => {
                self.shows_loading = false;
                self.browser.shows_failed(message);
                self.shows_state.select(None);
            }
            AppMessage::EpisodesLoaded(show_id, episodes) => {
                if self.browser.selected_show_id() == Some(show_id) {
                    self.episodes_loading = false;
                }
                self.browser.episodes_loaded(show_id, episodes);
                if self.browser.selected_show_id() == Some(show_id) {
                    self.reset_episode_selection();
                }
            }
            AppMessage::EpisodesError(show_id, message) => {
                if self.browser.selected_show_id() == Some(show_id) {
                    self.episodes_loading = false;
                    self.browser.episodes_failed(show_id, message);
                    self.search_input.clear();
                    self.reset_show_selection();
                }
            }
        }
    }

    // --- input ---

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    self.running = false;
                    return Ok(());
                }

                match self.view {
                    View::Browse => self.handle_browse_input(key.code),
                    View::Search => self.handle_search_input(key.code),
                    View::ShowPicker => self.handle_show_picker_input(key.code),
                    View::EpisodePicker => self.handle_episode_picker_input(key.code),
                }
            }
        }
        Ok(())
    }

    fn handle_browse_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if self.browser.pane() == Pane::Shows {
                    self.open_selected_show();
                }
            }
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                if self.browser.pane() == Pane::Episodes {
                    self.browser.clear_selection();
                    self.search_input.clear();
                    self.reset_show_selection();
                }
            }
            KeyCode::Char('/') => {
                self.view = View::Search;
            }
            KeyCode::Char('s') => self.open_picker(View::ShowPicker),
            KeyCode::Char('e') => {
                if self.browser.pane() == Pane::Episodes {
                    self.open_picker(View::EpisodePicker);
                }
            }
            KeyCode::Char('r') => {
                if self.browser.pane() == Pane::Shows {
                    self.fetch_shows();
                }
            }
            _ => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Enter => {
                self.view = View::Browse;
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.apply_search();
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.apply_search();
            }
            _ => {}
        }
    }

    /// Live filtering: every keystroke recomputes the visible list from the
    /// full source.
    fn apply_search(&mut self) {
        self.browser.set_search_term(&self.search_input);
        match self.browser.pane() {
            Pane::Shows => self.reset_show_selection(),
            Pane::Episodes => self.reset_episode_selection(),
        }
    }

    fn handle_show_picker_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.view = View::Browse;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Enter => self.confirm_show_picker(),
            _ => {}
        }
    }

    fn handle_episode_picker_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.view = View::Browse;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Enter => self.confirm_episode_picker(),
            _ => {}
        }
    }

    // --- selection plumbing ---

    fn open_selected_show(&mut self) {
        let id = self
            .shows_state
            .selected()
            .and_then(|idx| self.browser.visible_shows().get(idx).map(|s| s.id));
        if let Some(id) = id {
            self.select_show(id);
        }
    }

    fn open_picker(&mut self, picker: View) {
        self.picker_state = ListState::default();
        self.picker_state.select(Some(0));
        self.view = picker;
    }

    /// Row 0 is the "Select a Show" sentinel; it returns to the show list.
    fn confirm_show_picker(&mut self) {
        self.view = View::Browse;
        match self.picker_state.selected() {
            Some(0) | None => {
                self.browser.clear_selection();
                self.search_input.clear();
                self.reset_show_selection();
            }
            Some(idx) => {
                let id = self.browser.shows().get(idx - 1).map(|s| s.id);
                if let Some(id) = id {
                    self.select_show(id);
                }
            }
        }
    }

    /// Row 0 is the "All Episodes" sentinel; the placeholder row shown when
    /// the filter matched nothing behaves like it.
    fn confirm_episode_picker(&mut self) {
        let choice = match self.picker_state.selected() {
            Some(0) | None => None,
            Some(idx) => self.browser.filtered_episodes().get(idx - 1).map(|e| e.id),
        };
        self.browser.select_episode(choice);
        self.view = View::Browse;
        self.reset_episode_selection();
    }

    fn reset_show_selection(&mut self) {
        if self.browser.visible_shows().is_empty() {
            self.shows_state.select(None);
        } else {
            self.shows_state.select(Some(0));
        }
    }

    fn reset_episode_selection(&mut self) {
        if self.browser.visible_episodes().is_empty() {
            self.episodes_state.select(None);
        } else {
            self.episodes_state.select(Some(0));
        }
    }

    fn list_len(&self) -> usize {
        match self.view {
            View::ShowPicker => self.browser.shows().len() + 1,
            View::EpisodePicker => {
                let filtered = self.browser.filtered_episodes().len();
                // sentinel row, plus either the entries or the placeholder
                if filtered == 0 { 2 } else { filtered + 1 }
            }
            _ => match self.browser.pane() {
                Pane::Shows => self.browser.visible_shows().len(),
                Pane::Episodes => self.browser.visible_episodes().len(),
            },
        }
    }

    fn active_state(&mut self) -> &mut ListState {
        match self.view {
            View::ShowPicker | View::EpisodePicker => &mut self.picker_state,
            _ => match self.browser.pane() {
                Pane::Shows => &mut self.shows_state,
                Pane::Episodes => &mut self.episodes_state,
            },
        }
    }

    fn move_selection_down(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let next = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        state.select(Some(next));
    }

    fn move_selection_up(&mut self) {
        if self.list_len() == 0 {
            return;
        }
        let state = self.active_state();
        let next = state.selected().map_or(0, |i| i.saturating_sub(1));
        state.select(Some(next));
    }

    // --- rendering ---

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        ui::render_search_bar(
            frame,
            chunks[0],
            &self.search_input,
            self.view == View::Search,
            self.accent,
        );
        ui::render_status_line(
            frame,
            chunks[1],
            self.browser.result_count(),
            self.browser.error(),
        );

        match self.browser.pane() {
            Pane::Shows => {
                let shows = self.browser.visible_shows();
                ui::render_shows_view(
                    frame,
                    chunks[2],
                    &shows,
                    &mut self.shows_state,
                    self.shows_loading,
                    self.accent,
                );

                let help = widgets::help_bar(&[
                    ("j/k", "navigate"),
                    ("Enter", "episodes"),
                    ("/", "search"),
                    ("s", "show picker"),
                    ("r", "reload"),
                    ("q", "quit"),
                ]);
                frame.render_widget(help, chunks[3]);
            }
            Pane::Episodes => {
                if let Some(show) = self.browser.selected_show() {
                    let episodes = self.browser.visible_episodes();
                    ui::render_episodes_view(
                        frame,
                        chunks[2],
                        show,
                        &episodes,
                        &mut self.episodes_state,
                        self.episodes_loading,
                        self.accent,
                    );
                }

                let help = widgets::help_bar(&[
                    ("j/k", "navigate"),
                    ("e", "episode picker"),
                    ("/", "search"),
                    ("Esc", "back to shows"),
                    ("q", "quit"),
                ]);
                frame.render_widget(help, chunks[3]);
            }
        }

        match self.view {
            View::ShowPicker => self.render_show_picker(frame),
            View::EpisodePicker => self.render_episode_picker(frame),
            _ => {}
        }
    }

    fn render_show_picker(&mut self, frame: &mut Frame) {
        let mut items = vec![PickerItem::Sentinel("Select a Show")];
        items.extend(
            self.browser
                .shows()
                .iter()
                .map(|s| PickerItem::Entry(s.name.clone())),
        );
        ui::render_picker(frame, "Select a Show", &items, &mut self.picker_state, self.accent);
    }

    fn render_episode_picker(&mut self, frame: &mut Frame) {
        let filtered = self.browser.filtered_episodes();
        let mut items = vec![PickerItem::Sentinel("All Episodes")];
        if filtered.is_empty() {
            items.push(PickerItem::Placeholder("No episodes found"));
        } else {
            items.extend(filtered.iter().map(|e| PickerItem::Entry(e.label())));
        }
        ui::render_picker(frame, "Episodes", &items, &mut self.picker_state, self.accent);
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TvMazeClient;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(base_url: String) -> App {
        App::new(&Config::default(), Arc::new(TvMazeClient::new(base_url)))
    }

    async fn apply_next(app: &mut App) {
        let msg = app.msg_rx.recv().await.expect("a fetch completion");
        app.apply_message(msg);
    }

    #[tokio::test]
    async fn catalog_loads_sorted_with_counter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 1, "name": "Zeta" },
                { "id": 2, "name": "alpha" },
            ])))
            .mount(&server)
            .await;

        let mut app = test_app(server.uri());
        app.fetch_shows();
        apply_next(&mut app).await;

        let names: Vec<String> = app
            .browser
            .visible_shows()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, ["alpha", "Zeta"]);
        assert_eq!(app.browser.result_count(), 2);
        assert_eq!(app.shows_state.selected(), Some(0));
        assert!(!app.shows_loading);
    }

    #[tokio::test]
    async fn failed_catalog_fetch_shows_message_and_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shows"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = test_app(server.uri());
        app.fetch_shows();
        apply_next(&mut app).await;

        assert_eq!(app.browser.error(), Some(SHOWS_ERROR));
        assert!(app.browser.visible_shows().is_empty());
        assert_eq!(app.shows_state.selected(), None);
    }

    #[tokio::test]
    async fn episodes_fetched_at_most_once_per_show() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shows/5/episodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 50, "name": "Pilot", "season": 1, "number": 1 },
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = test_app(server.uri());
        app.select_show(5);
        apply_next(&mut app).await;
        assert!(app.browser.has_cached(5));

        // re-selecting hits the cache; the mock's expect(1) verifies no
        // second request goes out
        app.browser.clear_selection();
        app.select_show(5);
        assert_eq!(app.browser.visible_episodes().len(), 1);
        assert!(!app.episodes_loading);
    }

    #[tokio::test]
    async fn failed_episode_fetch_shows_message_and_leaves_cache_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shows/5/episodes"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = test_app(server.uri());
        app.select_show(5);
        apply_next(&mut app).await;

        assert_eq!(app.browser.error(), Some(EPISODES_ERROR));
        assert!(!app.browser.has_cached(5));
        assert_eq!(app.browser.pane(), Pane::Shows);
    }
}
