use firewatch_core::estimate::{parse_form, FIELD_LABELS};
use firewatch_core::views::{list_rows, list_sections_where, ListRow, ListSection, TierToggles};
use firewatch_core::{
    estimate, Boundary, ClassifiedFire, FeedState, FeedStatus, PredictionInput, PredictionResult,
    Severity, Snapshot,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

const THROBBER_STEP: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Dashboard,
    Statistics,
    Predict,
}

impl AppScreen {
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Statistics, Self::Predict];

    pub const fn index(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::Statistics => 1,
            Self::Predict => 2,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Dashboard),
            1 => Some(Self::Statistics),
            2 => Some(Self::Predict),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Map & List",
            Self::Statistics => "Statistics",
            Self::Predict => "Predict Risk",
        }
    }
}

/// Text fields of the risk form and the last result.
#[derive(Debug, Clone)]
pub struct PredictForm {
    pub fields: [String; 4],
    pub focus: usize,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
}

impl PredictForm {
    pub fn new() -> Self {
        let defaults = PredictionInput::default();
        Self {
            fields: [
                defaults.ndvi.to_string(),
                defaults.lst.to_string(),
                defaults.slope.to_string(),
                defaults.elevation.to_string(),
            ],
            focus: 0,
            result: None,
            error: None,
        }
    }

    pub fn labels() -> [(&'static str, &'static str); 4] {
        FIELD_LABELS
    }

    pub fn push(&mut self, ch: char) {
        if ch.is_ascii_digit() || matches!(ch, '.' | '-' | 'e' | 'E' | '+') {
            self.fields[self.focus].push(ch);
        }
    }

    pub fn pop(&mut self) {
        self.fields[self.focus].pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Parses the fields and stores either a result or an error message.
    pub fn submit(&mut self) {
        let [ndvi, lst, slope, elevation] = &self.fields;
        match parse_form([ndvi.as_str(), lst.as_str(), slope.as_str(), elevation.as_str()]) {
            Ok(input) => {
                let result = estimate(input);
                log::debug!("risk estimate {:.4} ({})", result.score, result.tier.label());
                self.result = Some(result);
                self.error = None;
            }
            Err(error) => {
                self.result = None;
                self.error = Some(error.to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PredictForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub feed: FeedState,
    pub boundary: Option<Boundary>,
    pub toggles: TierToggles,
    pub selected_row: usize,
    pub detail_open: bool,
    pub alerts_expanded: bool,
    pub filter: String,
    pub filter_editing: bool,
    pub show_help: bool,
    pub status_message: String,
    pub stats_row: usize,
    pub predict: PredictForm,
    pub refresh_requested: bool,
    pub throbber: ThrobberState,
    pub last_tick: Instant,
}

impl App {
    pub fn new(boundary: Option<Boundary>) -> Self {
        Self {
            running: true,
            screen: AppScreen::Dashboard,
            feed: FeedState::new(),
            boundary,
            toggles: TierToggles::default(),
            selected_row: 0,
            detail_open: false,
            alerts_expanded: true,
            filter: String::new(),
            filter_editing: false,
            show_help: false,
            status_message: String::new(),
            stats_row: 0,
            predict: PredictForm::new(),
            refresh_requested: false,
            throbber: ThrobberState::default(),
            last_tick: Instant::now(),
        }
    }

    /// Advances the spinner at a fixed pace regardless of frame rate.
    pub fn update(&mut self) {
        if self.last_tick.elapsed() >= THROBBER_STEP {
            self.throbber.calc_next();
            self.last_tick = Instant::now();
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.feed.snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.feed.is_loading() || self.refresh_requested
    }

    /// Replaces the feed state with the latest published one.
    pub fn apply_feed(&mut self, feed: FeedState) {
        let changed_at = feed.attempted_at() != self.feed.attempted_at();
        self.feed = feed;
        if changed_at {
            self.refresh_requested = false;
            self.status_message = match self.feed.status() {
                FeedStatus::Stale(_) | FeedStatus::Unavailable(_) => {
                    format!("Error: {}", self.feed.status_line())
                }
                FeedStatus::Live(_) | FeedStatus::Loading => String::new(),
            };
        }
        self.clamp_selection();
    }

    /// Tier sections, narrowed by the fuzzy location filter.
    pub fn list_sections(&self) -> Vec<ListSection<'_>> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let filter = self.filter.trim();
        if filter.is_empty() {
            return list_sections_where(snapshot, self.toggles, |_| true);
        }
        let matcher = SkimMatcherV2::default();
        list_sections_where(snapshot, self.toggles, |fire| {
            matcher.fuzzy_match(&fire.record.place(), filter).is_some()
        })
    }

    pub fn list_rows(&self) -> Vec<ListRow<'_>> {
        list_rows(&self.list_sections())
    }

    pub fn selected_fire(&self) -> Option<&ClassifiedFire> {
        match self.list_rows().get(self.selected_row) {
            Some(ListRow::Fire(fire)) => Some(*fire),
            _ => None,
        }
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected_fire().map(|fire| fire.id().to_string())
    }

    pub fn select_next(&mut self) {
        let rows = self.list_rows().len();
        if rows > 0 && self.selected_row + 1 < rows {
            self.selected_row += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Enter on a header folds the tier; on a fire it opens the details.
    pub fn activate_selected(&mut self) {
        let target = self.list_rows().get(self.selected_row).map(|row| match row {
            ListRow::Header { severity, .. } => Some(*severity),
            ListRow::Fire(_) => None,
        });
        match target {
            Some(Some(severity)) => self.toggle_tier(severity),
            Some(None) => self.detail_open = true,
            None => {}
        }
    }

    pub fn toggle_tier(&mut self, severity: Severity) {
        self.toggles.toggle(severity);
        self.clamp_selection();
    }

    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.selected_row = 0;
        self.detail_open = false;
    }

    pub fn stats_len(&self) -> usize {
        self.snapshot().map_or(0, Snapshot::total)
    }

    fn clamp_selection(&mut self) {
        let rows = self.list_rows().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        if self.selected_fire().is_none() {
            self.detail_open = false;
        }
        self.stats_row = self.stats_row.min(self.stats_len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use firewatch_core::{Classifier, Confidence, FetchOutcome, FireRecord, RiskTier, SourceKind};

    fn record(id: &str, brightness: f64, location: &str) -> FireRecord {
        FireRecord {
            id: id.to_string(),
            latitude: 30.0,
            longitude: 79.0,
            brightness,
            frp: 6.0,
            acq_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap_or_default(),
            acq_time: Some("0834".to_string()),
            datetime_utc: None,
            satellite: None,
            confidence: Confidence::High,
            location: Some(location.to_string()),
        }
    }

    fn loaded_app() -> App {
        let snapshot = Classifier::new().classify(vec![
            record("a", 350.0, "Almora"),
            record("b", 300.0, "Nainital"),
            record("c", 345.0, "Pithoragarh"),
        ]);
        let mut feed = FeedState::new();
        feed.apply(
            FetchOutcome::Fetched {
                snapshot,
                source: SourceKind::Primary,
            },
            Utc::now(),
        );
        let mut app = App::new(None);
        app.apply_feed(feed);
        app
    }

    #[test]
    fn rows_follow_tier_headers() {
        let app = loaded_app();
        let rows = app.list_rows();
        // HIGH header, a, c, MEDIUM header, b
        assert_eq!(rows.len(), 5);
        assert!(app.selected_fire().is_none());
    }

    #[test]
    fn enter_on_header_collapses_tier() {
        let mut app = loaded_app();
        app.activate_selected();
        assert!(app.toggles.is_collapsed(Severity::High));
        assert_eq!(app.list_rows().len(), 3);
        assert!(!app.detail_open);
    }

    #[test]
    fn enter_on_fire_opens_details() {
        let mut app = loaded_app();
        app.select_next();
        app.activate_selected();
        assert!(app.detail_open);
        assert_eq!(app.selected_id().as_deref(), Some("a"));
    }

    #[test]
    fn fuzzy_filter_narrows_rows() {
        let mut app = loaded_app();
        app.set_filter("nain".to_string());
        let rows = app.list_rows();
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[1], ListRow::Fire(fire) if fire.id() == "b"));
    }

    #[test]
    fn failed_refresh_keeps_rows_and_reports() {
        let mut app = loaded_app();
        let mut feed = app.feed.clone();
        feed.apply(
            FetchOutcome::Failed {
                primary: None,
                fallback: firewatch_core::FetchError::Status(500),
            },
            Utc::now() + chrono::Duration::seconds(1),
        );
        app.apply_feed(feed);
        assert_eq!(app.list_rows().len(), 5);
        assert!(app.status_message.starts_with("Error"));
    }

    #[test]
    fn predict_form_defaults_to_medium() {
        let mut form = PredictForm::new();
        form.submit();
        assert_eq!(form.result.map(|result| result.tier), Some(RiskTier::Medium));

        form.fields[0].clear();
        form.submit();
        assert!(form.result.is_none());
        assert_eq!(form.error.as_deref(), Some("NDVI is required"));
    }

    #[test]
    fn screen_indices_round_trip() {
        assert_eq!(AppScreen::from_index(3), None);
        for screen in AppScreen::ALL {
            assert_eq!(AppScreen::from_index(screen.index()), Some(screen));
        }
    }
}
