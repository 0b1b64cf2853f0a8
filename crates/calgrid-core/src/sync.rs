//! Scroll <-> date synchronization for virtualized calendar lists.
//!
//! Everything here is single-threaded and event-driven: the structs
//! own the timeline window and the visible cursor, and every method
//! returns the effects ([`ScrollRequest`], [`MonthChange`]) for the
//! caller to forward to the external list primitive. Requests are
//! fire-and-forget; the cursor reflects the requested state until the
//! next viewability report corrects it, and a later request simply
//! supersedes the destination of an earlier one.

use tracing::{debug, trace};

use crate::algebra::{same_date, same_month, same_week};
use crate::date::{CalendarDate, DateInput, DayInfo, month_span, parse_date};
use crate::grid;
use crate::window::{Window, WindowPolicy};

/// Percentage of an item that must be on screen before the list
/// primitive reports it viewable.
pub const VIEW_AREA_COVERAGE_PERCENT: f64 = 20.0;

/// An imperative scroll the caller should hand to the list primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub offset: f64,
    pub animated: bool,
}

/// Fixed-size item geometry for the virtualizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemLayout {
    pub length: f64,
    pub offset: f64,
    pub index: usize,
}

/// Cursor-change notification; feeds both the "month changed" and the
/// "visible months changed" outbound callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthChange {
    pub current: DayInfo,
}

impl MonthChange {
    fn new(date: CalendarDate) -> Self {
        Self {
            current: DayInfo::from_date(date),
        }
    }

    pub fn visible_months(&self) -> Vec<DayInfo> {
        vec![self.current.clone()]
    }
}

/// Outcome of stepping the cursor by whole months.
#[derive(Debug, Clone, PartialEq)]
pub struct AddMonth {
    pub scroll: Option<ScrollRequest>,
    pub change: MonthChange,
}

#[derive(Debug, Clone)]
pub struct MonthSyncConfig {
    /// Months scrollable into the past from the initial anchor.
    pub past_scroll_range: usize,
    /// Months scrollable into the future from the initial anchor.
    pub future_scroll_range: usize,
    pub calendar_width: f64,
    pub calendar_height: f64,
    /// Height of one display-week row, for intra-page offsets in
    /// vertical mode.
    pub row_height: f64,
    pub first_day: u32,
    pub horizontal: bool,
    pub animate_scroll: bool,
    /// Non-scrolling header mirroring the cursor (horizontal only).
    pub static_header: bool,
}

impl Default for MonthSyncConfig {
    fn default() -> Self {
        Self {
            past_scroll_range: 50,
            future_scroll_range: 50,
            calendar_width: 360.0,
            calendar_height: 360.0,
            row_height: 46.0,
            first_day: 0,
            horizontal: false,
            animate_scroll: false,
            static_header: false,
        }
    }
}

/// Month-list synchronizer. Its window is built once for the life of
/// the value and never regenerated (`WindowPolicy::Fixed`); only the
/// week strip regenerates near its edges. That asymmetry is inherited
/// behavior, kept deliberately.
#[derive(Debug, Clone)]
pub struct MonthSync {
    config: MonthSyncConfig,
    initial_anchor: CalendarDate,
    window: Window,
    current: Option<CalendarDate>,
    visible: Option<CalendarDate>,
}

impl MonthSync {
    /// `current` resolving to nothing falls back to `today`; `today`
    /// is injected so construction stays deterministic under test.
    pub fn new(
        config: MonthSyncConfig,
        current: Option<&DateInput>,
        today: CalendarDate,
    ) -> Self {
        let parsed = current.and_then(parse_date);
        let initial_anchor = parsed.unwrap_or(today).start_of_month();
        let window = Window::months(
            initial_anchor,
            config.past_scroll_range,
            config.future_scroll_range,
        );
        debug!(
            initial = %initial_anchor,
            window_len = window.len(),
            horizontal = config.horizontal,
            "month sync created"
        );
        Self {
            config,
            initial_anchor,
            window,
            current: parsed,
            visible: parsed,
        }
    }

    /// Page extent along the scroll axis.
    pub fn page_size(&self) -> f64 {
        if self.config.horizontal {
            self.config.calendar_width
        } else {
            self.config.calendar_height
        }
    }

    pub fn anchors(&self) -> &[CalendarDate] {
        self.window.anchors()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn current_month(&self) -> Option<CalendarDate> {
        self.current
    }

    /// Index the list should start at: the initial anchor's slot.
    pub fn initial_index(&self) -> Option<usize> {
        self.window.position_of(self.initial_anchor)
    }

    /// Coverage threshold to configure the list's viewability
    /// reporting with.
    pub fn viewability_threshold(&self) -> f64 {
        VIEW_AREA_COVERAGE_PERCENT
    }

    pub fn item_layout(&self, index: usize) -> ItemLayout {
        let size = self.page_size();
        ItemLayout {
            length: size,
            offset: size * index as f64,
            index,
        }
    }

    /// Scroll to a specific day. Vertical mode additionally offsets to
    /// the display-week row containing the day inside its month page.
    /// Returns `None` when the date does not resolve, or when the
    /// computed amount is exactly zero; the zero guard conflates "no
    /// distance" with "nothing to do" and is kept as inherited
    /// behavior rather than fixed.
    pub fn scroll_to_day(
        &self,
        date: &DateInput,
        offset: f64,
        animated: bool,
    ) -> Option<ScrollRequest> {
        let target = parse_date(date)?;
        let mut amount = self.base_offset(target) + offset;

        if !self.config.horizontal {
            let days = grid::page(target, self.config.first_day, false);
            if let Some(week) = grid::week_row_of(&days, target) {
                amount += self.config.row_height * week as f64;
            }
        }

        trace!(target = %target, amount, "scroll_to_day");
        if amount != 0.0 {
            Some(ScrollRequest { offset: amount, animated })
        } else {
            None
        }
    }

    /// Scroll so the month containing `date` is in view.
    pub fn scroll_to_month(&self, date: &DateInput) -> Option<ScrollRequest> {
        let target = parse_date(date)?;
        self.scroll_to_month_date(target)
    }

    fn scroll_to_month_date(&self, target: CalendarDate) -> Option<ScrollRequest> {
        let amount = self.base_offset(target);
        trace!(target = %target, amount, "scroll_to_month");
        if amount != 0.0 {
            Some(ScrollRequest {
                offset: amount,
                animated: self.config.animate_scroll,
            })
        } else {
            None
        }
    }

    fn base_offset(&self, target: CalendarDate) -> f64 {
        let diff = month_span(self.initial_anchor, target.start_of_month()).round();
        let size = self.page_size();
        size * self.config.past_scroll_range as f64 + diff * size
    }

    /// Step the cursor by `count` months. No-op when the step lands in
    /// the month already current, which avoids a redundant scroll and
    /// notification when arrow controls step within a month that is
    /// still partially visible.
    pub fn add_month(&mut self, count: i32) -> Option<AddMonth> {
        let current = self.current?;
        let day = current.add_months(count);
        if same_month(Some(day), Some(current)) {
            trace!(count, "add_month landed in the current month; skipping");
            return None;
        }

        let scroll = self.scroll_to_month_date(day);
        self.current = Some(day);
        debug!(current = %day, "cursor stepped by months");
        Some(AddMonth {
            scroll,
            change: MonthChange::new(day),
        })
    }

    /// Viewability report from the list primitive: the first visible
    /// anchor becomes the cursor when it differs at day granularity.
    /// Reports are accepted unconditionally, including ones produced
    /// by a scroll this synchronizer itself requested.
    pub fn on_viewable_items_changed(
        &mut self,
        visible: &[CalendarDate],
    ) -> Option<MonthChange> {
        let new_visible = visible.first().copied();
        if same_date(self.visible, new_visible) {
            return None;
        }

        self.visible = new_visible;
        self.current = new_visible;
        let month = new_visible?;
        debug!(visible = %month, "visible month changed");
        Some(MonthChange::new(month))
    }

    /// Whether `date`'s page should render in full: within one page of
    /// the cursor horizontally, three vertically. Pages outside render
    /// as cheap placeholders.
    pub fn in_render_range(&self, date: CalendarDate) -> bool {
        let range: i32 = if self.config.horizontal { 1 } else { 3 };
        (-range..=range).any(|step| {
            same_month(Some(date), self.current.map(|c| c.add_months(step)))
        })
    }

    /// Per-item marking filter: true when any marking key falls in the
    /// anchor's month, so months without markings skip the lookup.
    pub fn markings_relevant(&self, keys: &[String], anchor: CalendarDate) -> bool {
        keys.iter().any(|key| {
            same_month(CalendarDate::from_iso(key), Some(anchor))
        })
    }

    /// Month the non-scrolling header should show, when configured.
    pub fn static_header_month(&self) -> Option<CalendarDate> {
        if self.config.static_header && self.config.horizontal {
            self.current
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeekSyncConfig {
    /// Pages generated on each side of the center anchor.
    pub num_pages: usize,
    pub page_width: f64,
    pub first_day: u32,
}

impl Default for WeekSyncConfig {
    fn default() -> Self {
        Self {
            num_pages: 50,
            page_width: 360.0,
            first_day: 0,
        }
    }
}

/// Week-strip synchronizer; its window regenerates around the current
/// anchor whenever scrolling approaches either edge.
#[derive(Debug, Clone)]
pub struct WeekSync {
    config: WeekSyncConfig,
    window: Window,
    current: Option<CalendarDate>,
}

impl WeekSync {
    pub fn new(
        config: WeekSyncConfig,
        current: Option<&DateInput>,
        today: CalendarDate,
    ) -> Self {
        let date = current.and_then(parse_date).unwrap_or(today);
        let window = Window::weeks(date, config.first_day, config.num_pages);
        debug!(
            initial = %date,
            window_len = window.len(),
            "week sync created"
        );
        Self {
            config,
            window,
            current: Some(date),
        }
    }

    pub fn anchors(&self) -> &[CalendarDate] {
        self.window.anchors()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn current_date(&self) -> Option<CalendarDate> {
        self.current
    }

    pub fn initial_page_index(&self) -> usize {
        self.config.num_pages
    }

    /// Pages-from-edge distance at which regeneration is requested.
    pub fn near_edge_threshold(&self) -> usize {
        (self.config.num_pages as f64 * 0.4).round() as usize
    }

    pub fn is_near_edge(&self, index: usize) -> bool {
        self.window.near_edge(index, self.near_edge_threshold())
    }

    pub fn item_layout(&self, index: usize) -> ItemLayout {
        ItemLayout {
            length: self.config.page_width,
            offset: self.config.page_width * index as f64,
            index,
        }
    }

    /// Scroll to the page whose week contains `date`; never animated.
    pub fn scroll_to_date(&self, date: &DateInput) -> Option<ScrollRequest> {
        let target = parse_date(date)?;
        let index = self.window.anchors().iter().position(|anchor| {
            same_week(Some(*anchor), Some(target), self.config.first_day)
        })?;
        trace!(target = %target, index, "scroll_to_date");
        Some(ScrollRequest {
            offset: index as f64 * self.config.page_width,
            animated: false,
        })
    }

    /// Page-change report; only user-driven scrolls move the cursor,
    /// so a programmatic scroll does not echo back as a date change.
    pub fn on_page_change(
        &mut self,
        index: usize,
        scrolled_by_user: bool,
    ) -> Option<DayInfo> {
        if !scrolled_by_user {
            return None;
        }
        let anchor = self.window.get(index)?;
        self.current = Some(anchor);
        debug!(current = %anchor, index, "week cursor moved");
        Some(DayInfo::from_date(anchor))
    }

    /// Edge-approach handler: rebuilds the window centered on the
    /// anchor at `index`. Returns false when the window's policy does
    /// not regenerate.
    pub fn on_reach_near_edge(&mut self, index: usize) -> bool {
        debug_assert_eq!(self.window.policy(), WindowPolicy::Regenerating);
        self.window.regenerate(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).expect("valid date")
    }

    fn iso(raw: &str) -> DateInput {
        DateInput::Iso(raw.to_string())
    }

    fn horizontal_config() -> MonthSyncConfig {
        MonthSyncConfig {
            horizontal: true,
            ..MonthSyncConfig::default()
        }
    }

    #[test]
    fn scroll_to_month_three_months_ahead() {
        let sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        let request = sync.scroll_to_month(&iso("2021-09-10")).expect("request");
        assert_eq!(request.offset, 360.0 * 50.0 + 3.0 * 360.0);
        assert!(!request.animated);
    }

    #[test]
    fn scroll_to_month_into_the_past() {
        let sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        let request = sync.scroll_to_month(&iso("2021-04-30")).expect("request");
        assert_eq!(request.offset, 360.0 * 50.0 - 2.0 * 360.0);
    }

    #[test]
    fn scroll_to_day_adds_week_row_in_vertical_mode() {
        let sync = MonthSync::new(
            MonthSyncConfig::default(),
            Some(&iso("2014-03-01")),
            date(2014, 3, 1),
        );
        // 2014-03-15 sits in the third displayed week of its page.
        let request = sync
            .scroll_to_day(&iso("2014-03-15"), 0.0, true)
            .expect("request");
        assert_eq!(request.offset, 360.0 * 50.0 + 46.0 * 2.0);
        assert!(request.animated);

        let horizontal = MonthSync::new(
            horizontal_config(),
            Some(&iso("2014-03-01")),
            date(2014, 3, 1),
        );
        let request = horizontal
            .scroll_to_day(&iso("2014-03-15"), 0.0, false)
            .expect("request");
        assert_eq!(request.offset, 360.0 * 50.0);
    }

    #[test]
    fn scroll_to_day_applies_extra_offset() {
        let sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        let request = sync
            .scroll_to_day(&iso("2021-06-20"), 12.5, false)
            .expect("request");
        assert_eq!(request.offset, 360.0 * 50.0 + 12.5);
    }

    #[test]
    fn zero_amount_scroll_is_suppressed() {
        // With no past range the initial month sits at offset zero and
        // the inherited guard swallows the request.
        let config = MonthSyncConfig {
            past_scroll_range: 0,
            horizontal: true,
            ..MonthSyncConfig::default()
        };
        let sync = MonthSync::new(config, Some(&iso("2021-06-15")), date(2021, 6, 15));
        assert_eq!(sync.scroll_to_month(&iso("2021-06-01")), None);
        assert_eq!(sync.scroll_to_day(&iso("2021-06-01"), 0.0, false), None);
    }

    #[test]
    fn unresolvable_date_is_a_no_op() {
        let sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        assert_eq!(sync.scroll_to_month(&iso("garbage")), None);
        assert_eq!(sync.scroll_to_day(&iso("2021-13-40"), 0.0, false), None);
    }

    #[test]
    fn window_seeds_initial_index_at_past_range() {
        let sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        assert_eq!(sync.anchors().len(), 101);
        assert_eq!(sync.initial_index(), Some(50));
        assert_eq!(sync.anchors()[50], date(2021, 6, 1));

        let layout = sync.item_layout(50);
        assert_eq!(layout.length, 360.0);
        assert_eq!(layout.offset, 18_000.0);
        assert_eq!(layout.index, 50);
    }

    #[test]
    fn viewability_moves_cursor_exactly_once() {
        let mut sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );

        let change = sync
            .on_viewable_items_changed(&[date(2021, 7, 1), date(2021, 8, 1)])
            .expect("change");
        assert_eq!(change.current.date_string, "2021-07-01");
        assert_eq!(change.visible_months().len(), 1);
        assert_eq!(sync.current_month(), Some(date(2021, 7, 1)));

        // Same first anchor again: no new notification.
        assert_eq!(
            sync.on_viewable_items_changed(&[date(2021, 7, 1)]),
            None
        );
    }

    #[test]
    fn empty_viewability_report_clears_cursor_silently() {
        let mut sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        assert_eq!(sync.on_viewable_items_changed(&[]), None);
        assert_eq!(sync.current_month(), None);
    }

    #[test]
    fn add_month_skips_same_month_steps() {
        let mut sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        assert_eq!(sync.add_month(0), None);

        let outcome = sync.add_month(1).expect("outcome");
        assert_eq!(outcome.change.current.month, 7);
        let scroll = outcome.scroll.expect("scroll");
        assert_eq!(scroll.offset, 360.0 * 50.0 + 360.0);
        assert_eq!(sync.current_month(), Some(date(2021, 7, 15)));
    }

    #[test]
    fn render_range_tracks_the_cursor() {
        let sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        assert!(sync.in_render_range(date(2021, 6, 1)));
        assert!(sync.in_render_range(date(2021, 7, 20)));
        assert!(!sync.in_render_range(date(2021, 8, 1)));

        let vertical = MonthSync::new(
            MonthSyncConfig::default(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        assert!(vertical.in_render_range(date(2021, 9, 1)));
        assert!(!vertical.in_render_range(date(2021, 10, 1)));
    }

    #[test]
    fn markings_filter_by_anchor_month() {
        let sync = MonthSync::new(
            horizontal_config(),
            Some(&iso("2021-06-15")),
            date(2021, 6, 15),
        );
        let keys = vec!["2021-07-04".to_string(), "2021-09-01".to_string()];
        assert!(sync.markings_relevant(&keys, date(2021, 7, 1)));
        assert!(!sync.markings_relevant(&keys, date(2021, 8, 1)));
    }

    #[test]
    fn static_header_follows_cursor_only_when_configured() {
        let config = MonthSyncConfig {
            static_header: true,
            ..horizontal_config()
        };
        let sync = MonthSync::new(config, Some(&iso("2021-06-15")), date(2021, 6, 15));
        assert_eq!(sync.static_header_month(), Some(date(2021, 6, 15)));

        let vertical = MonthSyncConfig {
            static_header: true,
            ..MonthSyncConfig::default()
        };
        let sync = MonthSync::new(vertical, Some(&iso("2021-06-15")), date(2021, 6, 15));
        assert_eq!(sync.static_header_month(), None);
    }

    #[test]
    fn week_scroll_targets_the_matching_page() {
        let config = WeekSyncConfig {
            first_day: 1,
            ..WeekSyncConfig::default()
        };
        let sync = WeekSync::new(config, Some(&iso("2021-01-06")), date(2021, 1, 6));
        assert_eq!(sync.anchors().len(), 101);
        assert_eq!(sync.initial_page_index(), 50);

        // 2021-01-05 is in the same Monday week as the center anchor.
        let request = sync.scroll_to_date(&iso("2021-01-05")).expect("request");
        assert_eq!(request.offset, 50.0 * 360.0);
        assert!(!request.animated);

        // The following week sits one page to the right.
        let request = sync.scroll_to_date(&iso("2021-01-13")).expect("request");
        assert_eq!(request.offset, 51.0 * 360.0);
    }

    #[test]
    fn week_page_change_moves_cursor_for_user_scrolls_only() {
        let mut sync = WeekSync::new(
            WeekSyncConfig::default(),
            Some(&iso("2021-01-06")),
            date(2021, 1, 6),
        );

        assert_eq!(sync.on_page_change(51, false), None);
        assert_eq!(sync.current_date(), Some(date(2021, 1, 6)));

        let info = sync.on_page_change(51, true).expect("change");
        assert_eq!(info.date_string, "2021-01-10");
        assert_eq!(sync.current_date(), Some(date(2021, 1, 10)));
    }

    #[test]
    fn week_edge_approach_recenters_the_window() {
        let mut sync = WeekSync::new(
            WeekSyncConfig::default(),
            Some(&iso("2021-01-06")),
            date(2021, 1, 6),
        );
        assert_eq!(sync.near_edge_threshold(), 20);
        assert!(sync.is_near_edge(15));
        assert!(!sync.is_near_edge(50));
        assert!(sync.is_near_edge(85));
        // A report that outlived a regeneration may carry an index
        // past the window; it must degrade, not panic.
        assert!(!sync.is_near_edge(200));

        let edge_anchor = sync.anchors()[85];
        assert!(sync.on_reach_near_edge(85));
        assert_eq!(sync.anchors()[sync.initial_page_index()], edge_anchor);
    }
}
