use firewatch_core::estimate::{parse_form, FIELD_LABELS};
use firewatch_core::views::{list_rows, list_sections, ListRow, TierToggles};
use firewatch_core::{
    estimate, Boundary, ClassifiedFire, FeedState, PredictionInput, PredictionResult,
    RefreshGate, Severity, Snapshot,
};
use ratzilla::event::KeyCode;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    MapList,
    Statistics,
    Predict,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::MapList, Self::Statistics, Self::Predict];

    pub const fn index(self) -> usize {
        match self {
            Self::MapList => 0,
            Self::Statistics => 1,
            Self::Predict => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MapList => "🗺️ Map & List",
            Self::Statistics => "📊 Statistics",
            Self::Predict => "🔮 Predict Risk",
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::MapList => Self::Statistics,
            Self::Statistics => Self::Predict,
            Self::Predict => Self::MapList,
        }
    }
}

/// What the key handler asks the page to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    None,
    Refresh,
}

#[derive(Debug, Clone)]
pub struct RiskForm {
    pub fields: [String; 4],
    pub focus: usize,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
}

impl RiskForm {
    fn new() -> Self {
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

    pub const fn labels() -> [(&'static str, &'static str); 4] {
        FIELD_LABELS
    }

    fn submit(&mut self) {
        let [ndvi, lst, slope, elevation] = &self.fields;
        match parse_form([ndvi.as_str(), lst.as_str(), slope.as_str(), elevation.as_str()]) {
            Ok(input) => {
                self.result = Some(estimate(input));
                self.error = None;
            }
            Err(error) => {
                self.result = None;
                self.error = Some(error.to_string());
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len(),
            KeyCode::Up => self.focus = (self.focus + self.fields.len() - 1) % self.fields.len(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.fields[self.focus].pop();
            }
            KeyCode::Delete => *self = Self::new(),
            KeyCode::Char(ch) if ch.is_ascii_digit() || matches!(ch, '.' | '-' | 'e' | 'E' | '+') => {
                self.fields[self.focus].push(ch);
            }
            _ => {}
        }
    }
}

/// Everything the page draws, shared by the timer, key and draw callbacks.
#[derive(Debug)]
pub struct WebState {
    pub feed: FeedState,
    pub gate: RefreshGate,
    pub boundary: Option<Boundary>,
    pub tab: Tab,
    pub toggles: TierToggles,
    pub selected_row: usize,
    pub detail_open: bool,
    pub alerts_expanded: bool,
    pub stats_offset: usize,
    pub form: RiskForm,
}

impl WebState {
    pub fn new() -> Self {
        Self {
            feed: FeedState::new(),
            gate: RefreshGate::new(),
            boundary: None,
            tab: Tab::MapList,
            toggles: TierToggles::default(),
            selected_row: 0,
            detail_open: false,
            alerts_expanded: true,
            stats_offset: 0,
            form: RiskForm::new(),
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.feed.snapshot()
    }

    pub fn rows(&self) -> Vec<ListRow<'_>> {
        self.snapshot()
            .map(|snapshot| list_rows(&list_sections(snapshot, self.toggles)))
            .unwrap_or_default()
    }

    pub fn selected_fire(&self) -> Option<&ClassifiedFire> {
        match self.rows().get(self.selected_row) {
            Some(ListRow::Fire(fire)) => Some(*fire),
            _ => None,
        }
    }

    /// Keeps the list selection valid after the snapshot or toggles change.
    pub fn clamp_selection(&mut self) {
        let rows = self.rows().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        if self.selected_fire().is_none() {
            self.detail_open = false;
        }
        let total = self.snapshot().map_or(0, Snapshot::total);
        self.stats_offset = self.stats_offset.min(total.saturating_sub(1));
    }

    pub fn handle_key(&mut self, code: KeyCode) -> KeyOutcome {
        if self.tab == Tab::Predict {
            if code == KeyCode::Esc {
                self.tab = Tab::MapList;
            } else {
                self.form.handle_key(code);
            }
            return KeyOutcome::None;
        }

        if self.detail_open {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                self.detail_open = false;
            }
            return KeyOutcome::None;
        }

        match code {
            KeyCode::Char('r') => return KeyOutcome::Refresh,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('1') => self.tab = Tab::MapList,
            KeyCode::Char('2') => self.tab = Tab::Statistics,
            KeyCode::Char('3') => self.tab = Tab::Predict,
            _ if self.tab == Tab::Statistics => self.handle_stats_key(code),
            _ => self.handle_list_key(code),
        }
        KeyOutcome::None
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_row = self.selected_row.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_row + 1 < self.rows().len() {
                    self.selected_row += 1;
                }
            }
            KeyCode::Enter => {
                let target = self.rows().get(self.selected_row).map(|row| match row {
                    ListRow::Header { severity, .. } => Some(*severity),
                    ListRow::Fire(_) => None,
                });
                match target {
                    Some(Some(severity)) => self.toggle_tier(severity),
                    Some(None) => self.detail_open = true,
                    None => {}
                }
            }
            KeyCode::Char('h') => self.toggle_tier(Severity::High),
            KeyCode::Char('m') => self.toggle_tier(Severity::Medium),
            KeyCode::Char('l') => self.toggle_tier(Severity::Low),
            KeyCode::Char('a') => self.alerts_expanded = !self.alerts_expanded,
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, code: KeyCode) {
        let total = self.snapshot().map_or(0, Snapshot::total);
        match code {
            KeyCode::Up => self.stats_offset = self.stats_offset.saturating_sub(1),
            KeyCode::Down => self.stats_offset = (self.stats_offset + 1).min(total.saturating_sub(1)),
            KeyCode::PageUp => self.stats_offset = self.stats_offset.saturating_sub(10),
            KeyCode::PageDown => {
                self.stats_offset = (self.stats_offset + 10).min(total.saturating_sub(1));
            }
            KeyCode::Home => self.stats_offset = 0,
            _ => {}
        }
    }

    fn toggle_tier(&mut self, severity: Severity) {
        self.toggles.toggle(severity);
        self.clamp_selection();
    }
}

/// Closes the refresh gate. Returns `false` when the state is borrowed
/// elsewhere and the gate stays open.
pub fn close_gate(state: &RefCell<WebState>) -> bool {
    state
        .try_borrow_mut()
        .map(|mut state| state.gate.close())
        .is_ok()
}

impl Default for WebState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use firewatch_core::{Classifier, Confidence, FetchOutcome, FireRecord, RiskTier, SourceKind};

    fn loaded() -> WebState {
        let record = |id: &str, brightness: f64| FireRecord {
            id: id.to_string(),
            latitude: 30.4,
            longitude: 79.6,
            brightness,
            frp: 12.0,
            acq_date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap_or_default(),
            acq_time: Some("1015".to_string()),
            datetime_utc: None,
            satellite: Some("N".to_string()),
            confidence: Confidence::High,
            location: None,
        };
        let mut state = WebState::new();
        state.feed.apply(
            FetchOutcome::Fetched {
                snapshot: Classifier::new().classify(vec![record("x", 360.0), record("y", 310.0)]),
                source: SourceKind::Fallback,
            },
            Utc::now(),
        );
        state
    }

    #[test]
    fn enter_opens_fire_details() {
        let mut state = loaded();
        state.handle_key(KeyCode::Down);
        state.handle_key(KeyCode::Enter);
        assert!(state.detail_open);
        assert_eq!(state.selected_fire().map(ClassifiedFire::id), Some("x"));

        state.handle_key(KeyCode::Esc);
        assert!(!state.detail_open);
    }

    #[test]
    fn collapsing_tier_clamps_selection() {
        let mut state = loaded();
        state.selected_row = 3;
        state.handle_key(KeyCode::Char('m'));
        assert_eq!(state.rows().len(), 3);
        assert_eq!(state.selected_row, 2);
    }

    #[test]
    fn refresh_key_is_reported() {
        let mut state = loaded();
        assert_eq!(state.handle_key(KeyCode::Char('r')), KeyOutcome::Refresh);
    }

    #[test]
    fn gate_close_waits_for_borrow() {
        let state = RefCell::new(WebState::new());
        {
            let _reader = state.borrow();
            assert!(!close_gate(&state));
        }
        assert!(!state.borrow().gate.is_closed());

        assert!(close_gate(&state));
        assert!(state.borrow().gate.is_closed());
        assert!(state.borrow_mut().gate.try_begin().is_none());
    }

    #[test]
    fn predict_tab_takes_digits() {
        let mut state = WebState::new();
        state.handle_key(KeyCode::Char('3'));
        assert_eq!(state.tab, Tab::Predict);

        state.form.fields = ["1".into(), "60".into(), "60".into(), "4000".into()];
        state.handle_key(KeyCode::Enter);
        assert_eq!(state.form.result.map(|result| result.tier), Some(RiskTier::High));

        state.handle_key(KeyCode::Char('x'));
        state.handle_key(KeyCode::Backspace);
        assert!(state.form.fields[0].is_empty());
        assert_eq!(state.tab, Tab::Predict);
    }
}
