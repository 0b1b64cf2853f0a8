use tracing::debug;

use crate::date::CalendarDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUnit {
    Month,
    Week,
}

/// Whether the window may be rebuilt around a new center once scrolling
/// nears an edge. Month lists historically keep a fixed window for the
/// life of the component while week strips regenerate; the asymmetry is
/// kept as an explicit policy instead of being hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    Fixed,
    Regenerating,
}

/// The bounded, ordered set of period anchors materialized for the
/// virtualized list. Anchor identity is the `yyyy-MM-dd` marking
/// string, which is stable and collision-free.
#[derive(Debug, Clone)]
pub struct Window {
    anchors: Vec<CalendarDate>,
    unit: WindowUnit,
    policy: WindowPolicy,
    first_day: u32,
    past: usize,
    future: usize,
}

impl Window {
    /// Month window: `past + future + 1` anchors, one per calendar
    /// month, with index `past` at `initial`'s month start.
    pub fn months(initial: CalendarDate, past: usize, future: usize) -> Self {
        let mut window = Self {
            anchors: Vec::new(),
            unit: WindowUnit::Month,
            policy: WindowPolicy::Fixed,
            first_day: 0,
            past,
            future,
        };
        window.fill(initial);
        window
    }

    /// Week window: `2 * pages + 1` anchors centered on `initial`.
    /// The center keeps `initial` as given; every other entry realigns
    /// to `first_day` once and then advances by whole weeks, so
    /// repeated regeneration cannot drift.
    pub fn weeks(initial: CalendarDate, first_day: u32, pages: usize) -> Self {
        let mut window = Self {
            anchors: Vec::new(),
            unit: WindowUnit::Week,
            policy: WindowPolicy::Regenerating,
            first_day,
            past: pages,
            future: pages,
        };
        window.fill(initial);
        window
    }

    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn fill(&mut self, center: CalendarDate) {
        let len = self.past + self.future + 1;
        let mut anchors = Vec::with_capacity(len);
        for index in 0..len {
            let offset = index as i64 - self.past as i64;
            let anchor = match self.unit {
                WindowUnit::Month => center.start_of_month().add_months(offset as i32),
                WindowUnit::Week => week_anchor(center, self.first_day, offset),
            };
            anchors.push(anchor);
        }
        self.anchors = anchors;
    }

    pub fn anchors(&self) -> &[CalendarDate] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<CalendarDate> {
        self.anchors.get(index).copied()
    }

    pub fn unit(&self) -> WindowUnit {
        self.unit
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Index of the anchor matching `date` by marking string.
    pub fn position_of(&self, date: CalendarDate) -> Option<usize> {
        self.anchors.iter().position(|anchor| *anchor == date)
    }

    /// Whether `index` lies within `threshold` anchors of either end.
    /// A stale index past the window degrades to false rather than
    /// panicking; the reporting list may lag a regeneration.
    pub fn near_edge(&self, index: usize, threshold: usize) -> bool {
        if index >= self.anchors.len() {
            return false;
        }
        index <= threshold || self.anchors.len() - 1 - index <= threshold
    }

    /// Rebuilds the window centered on the anchor at `center_index`.
    /// Returns false without touching anything under the Fixed policy
    /// or for an out-of-range index.
    pub fn regenerate(&mut self, center_index: usize) -> bool {
        if self.policy == WindowPolicy::Fixed {
            return false;
        }
        let Some(center) = self.get(center_index) else {
            return false;
        };
        debug!(center = %center, "regenerating timeline window");
        self.fill(center);
        true
    }
}

/// One week-strip anchor: `initial` shifted by `week_index` whole
/// weeks, normalized once to the week's `first_day` except at index 0
/// where the given date itself stays the visible anchor.
fn week_anchor(initial: CalendarDate, first_day: u32, week_index: i64) -> CalendarDate {
    let mut day_of_week = initial.weekday_index() as i64;
    if day_of_week < first_day as i64 && first_day > 0 {
        day_of_week += 7;
    }

    let base = if week_index == 0 {
        initial
    } else {
        initial.add_days(first_day as i64 - day_of_week)
    };
    base.add_weeks(week_index)
}
