//! Month grid widget
//!
//! Renders one month as a header (name, year, previous/next buttons), a row
//! of weekday names and one row per calendar week. Day cells report mouse
//! interaction as component events carrying the cell's [`CalendarDate`]:
//!
//! | host event | component event | filtered |
//! |---|---|---|
//! | click | `daySelected` | yes, and stops propagation |
//! | mouseover | `mouseoverDate` | yes |
//! | mousedown | `mousedownDate` | yes |
//! | mouseup | `mouseupDate` | no |
//!
//! Filtered events are ignored when already default-prevented, when a
//! modifier key is held, or for any button but the primary one.

use std::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;
use tessel_core::{
    share, Component, Cx, DirtyBits, HostEvent, HostEventKind, HostHandler, HostTree, ListenerId,
    MouseButton, NodeId, RenderFragment, Scope, Setup, SharedFragment, SharedHost, WeakHandle,
};

use crate::date::{
    date_gt, date_gte, date_lt, date_lte, dates_match, month_weeks, CalendarDate, YearMonth,
};
use crate::locale::{CalendarConfig, CONTEXT_KEY};

/// One calendar week, `None` for padding cells
pub type Week = [Option<CalendarDate>; 7];

pub(crate) const DEFAULT_START: CalendarDate = CalendarDate {
    year: 2020,
    month: 1,
    day: 15,
};

pub(crate) const DEFAULT_END: CalendarDate = CalendarDate {
    year: 2020,
    month: 2,
    day: 15,
};

/// Inputs of [`Month`]; `None` keeps the current value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthInputs {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
    pub visible_month: Option<YearMonth>,
}

/// A single month calendar highlighting a date range
pub struct Month {
    visible_month: YearMonth,
    start: CalendarDate,
    end: CalendarDate,
    visible_weeks: Vec<Week>,
    config: Rc<CalendarConfig>,
}

impl Month {
    pub const VISIBLE_MONTH: usize = 0;
    pub const START: usize = 1;
    pub const END: usize = 2;
    pub const VISIBLE_WEEKS: usize = 3;

    pub fn visible_month(&self) -> YearMonth {
        self.visible_month
    }

    pub fn start(&self) -> CalendarDate {
        self.start
    }

    pub fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn visible_weeks(&self) -> &[Week] {
        &self.visible_weeks
    }

    /// Whether `date` is one of the range's endpoints
    pub fn is_selected(&self, date: &CalendarDate) -> bool {
        dates_match(date, &self.start) || dates_match(date, &self.end)
    }

    /// Show the month `increment` months away
    pub fn switch_month(&mut self, increment: i32, cx: &mut Cx<'_, Self>) {
        let next = self.visible_month.offset(increment);
        cx.set(Self::VISIBLE_MONTH, &mut self.visible_month, next);
    }
}

impl Component for Month {
    type Inputs = MonthInputs;
    const NAME: &'static str = "Month";

    fn create(inputs: MonthInputs, setup: &mut Setup<'_, Self>) -> Self {
        let config = setup
            .get_context::<CalendarConfig>(CONTEXT_KEY)
            .unwrap_or_default();
        Month {
            visible_month: inputs
                .visible_month
                .unwrap_or_else(|| DEFAULT_START.year_month()),
            start: inputs.start.unwrap_or(DEFAULT_START),
            end: inputs.end.unwrap_or(DEFAULT_END),
            visible_weeks: Vec::new(),
            config,
        }
    }

    fn set_inputs(&mut self, inputs: MonthInputs, cx: &mut Cx<'_, Self>) {
        if let Some(start) = inputs.start {
            cx.set(Self::START, &mut self.start, start);
        }
        if let Some(end) = inputs.end {
            cx.set(Self::END, &mut self.end, end);
        }
        if let Some(visible_month) = inputs.visible_month {
            cx.set(Self::VISIBLE_MONTH, &mut self.visible_month, visible_month);
        }
    }

    fn derive(&mut self, cx: &mut Cx<'_, Self>) -> anyhow::Result<()> {
        if cx.is_dirty(Self::VISIBLE_MONTH) {
            let weeks = month_weeks(self.visible_month, self.config.week_start)?;
            cx.set(Self::VISIBLE_WEEKS, &mut self.visible_weeks, weeks);
        }
        Ok(())
    }

    fn render(&self, scope: &Scope<Self>) -> anyhow::Result<Option<SharedFragment<Self>>> {
        Ok(Some(share(MonthView::new(self, scope)?)))
    }

    fn slot_value(&self, slot: usize) -> Option<&dyn std::any::Any> {
        match slot {
            Self::VISIBLE_MONTH => Some(&self.visible_month),
            Self::START => Some(&self.start),
            Self::END => Some(&self.end),
            _ => None,
        }
    }
}

// =============================================================================
// FRAGMENT
// =============================================================================

pub(crate) fn element(host: &mut HostTree, tag: &str, class: &str) -> NodeId {
    let node = host.create_element(tag);
    host.set_attr(node, "class", Some(class));
    node
}

fn bool_attr(value: bool) -> Option<&'static str> {
    Some(if value { "true" } else { "false" })
}

/// Primary button, no modifier key, not already handled
fn should_react(event: &HostEvent) -> bool {
    !event.default_prevented() && !event.modifiers.any() && event.button == MouseButton::Primary
}

struct DayNodes {
    cell: NodeId,
    button: NodeId,
    color: NodeId,
    date: Rc<Cell<CalendarDate>>,
    listeners: SmallVec<[ListenerId; 4]>,
}

enum DayCell {
    Padding(NodeId),
    Day(DayNodes),
}

impl DayCell {
    fn node(&self) -> NodeId {
        match self {
            DayCell::Padding(node) => *node,
            DayCell::Day(day) => day.cell,
        }
    }
}

struct WeekRow {
    node: NodeId,
    cells: Vec<DayCell>,
}

struct MonthNodes {
    container: NodeId,
    month_name: NodeId,
    year: NodeId,
    weeks: NodeId,
    nav: SmallVec<[(NodeId, ListenerId); 2]>,
    rows: Vec<WeekRow>,
}

struct MonthView {
    host: SharedHost,
    handle: WeakHandle<Month>,
    config: Rc<CalendarConfig>,
    shown_month: YearMonth,
    shown_range: (CalendarDate, CalendarDate),
    pending_weeks: Vec<Week>,
    nodes: Option<MonthNodes>,
}

impl MonthView {
    fn new(month: &Month, scope: &Scope<Month>) -> crate::Result<Self> {
        month.config.month_name(month.visible_month.month)?;
        Ok(Self {
            host: scope.host().clone(),
            handle: scope.handle().clone(),
            config: month.config.clone(),
            shown_month: month.visible_month,
            shown_range: (month.start, month.end),
            pending_weeks: month.visible_weeks.clone(),
            nodes: None,
        })
    }

    fn nav_button(&self, host: &mut HostTree, label: &str, increment: i32) -> Option<(NodeId, ListenerId)> {
        let button = host.create_element("button");
        host.set_attr(button, "type", Some("button"));
        let text = host.create_text(label);
        host.append(button, text);

        let handle = self.handle.clone();
        let handler: HostHandler = Rc::new(move |event: &mut HostEvent| {
            event.stop_propagation();
            handle.update(|month, cx| month.switch_month(increment, cx));
        });
        host.listen(button, HostEventKind::Click, handler)
            .map(|id| (button, id))
    }

    fn day_listeners(
        &self,
        host: &mut HostTree,
        button: NodeId,
        date: &Rc<Cell<CalendarDate>>,
    ) -> SmallVec<[ListenerId; 4]> {
        let routes = [
            (HostEventKind::Click, "daySelected", true),
            (HostEventKind::MouseOver, "mouseoverDate", true),
            (HostEventKind::MouseDown, "mousedownDate", true),
            (HostEventKind::MouseUp, "mouseupDate", false),
        ];
        routes
            .into_iter()
            .filter_map(|(kind, name, filtered)| {
                let handle = self.handle.clone();
                let date = date.clone();
                let handler: HostHandler = Rc::new(move |event: &mut HostEvent| {
                    if filtered && !should_react(event) {
                        return;
                    }
                    if kind == HostEventKind::Click {
                        event.stop_propagation();
                    }
                    handle.dispatch(name, date.get());
                });
                host.listen(button, kind, handler)
            })
            .collect()
    }

    fn build_cell(&self, host: &mut HostTree, date: Option<CalendarDate>) -> DayCell {
        let Some(date) = date else {
            return DayCell::Padding(element(host, "span", "day"));
        };

        let cell = element(host, "span", "day");
        let button = host.create_element("button");
        host.set_attr(button, "type", Some("button"));
        host.set_attr(button, "draggable", Some("false"));
        let color = element(host, "span", "day-color make-the-background-square-on-safari");
        let text = host.create_text(&date.day.to_string());
        host.append(color, text);
        host.append(button, color);
        host.append(cell, button);

        let date = Rc::new(Cell::new(date));
        let listeners = self.day_listeners(host, button, &date);
        let day = DayNodes {
            cell,
            button,
            color,
            date,
            listeners,
        };
        self.apply_range(host, &day);
        DayCell::Day(day)
    }

    fn apply_range(&self, host: &mut HostTree, day: &DayNodes) {
        let date = day.date.get();
        let (start, end) = &self.shown_range;
        let selected = dates_match(&date, start) || dates_match(&date, end);
        host.set_attr(day.button, "data-selected", bool_attr(selected));
        host.set_attr(
            day.color,
            "data-range-left",
            bool_attr(date_lte(&date, end) && date_gt(&date, start)),
        );
        host.set_attr(
            day.color,
            "data-range-right",
            bool_attr(date_gte(&date, start) && date_lt(&date, end)),
        );
    }

    fn build_row(&self, host: &mut HostTree, week: &Week) -> WeekRow {
        let node = element(host, "div", "week");
        let cells = week
            .iter()
            .map(|date| {
                let cell = self.build_cell(host, *date);
                host.append(node, cell.node());
                cell
            })
            .collect();
        WeekRow { node, cells }
    }

    /// Keep cells whose day number is unchanged, rebuild the rest in place
    fn patch_row(&self, host: &mut HostTree, row: &mut WeekRow, week: &Week) {
        for (column, date) in week.iter().enumerate() {
            let kept = match (&row.cells[column], date) {
                (DayCell::Padding(_), None) => true,
                (DayCell::Day(day), Some(date)) if day.date.get().day == date.day => {
                    day.date.set(*date);
                    self.apply_range(host, day);
                    true
                }
                _ => false,
            };
            if !kept {
                let fresh = self.build_cell(host, *date);
                let stale = row.cells[column].node();
                host.insert(row.node, fresh.node(), Some(stale));
                host.remove(stale);
                row.cells[column] = fresh;
            }
        }
    }
}

impl RenderFragment<Month> for MonthView {
    fn create(&mut self) {
        let host_rc = self.host.clone();
        let mut host = host_rc.borrow_mut();

        let container = element(&mut host, "div", "container full-width");
        let header = element(&mut host, "div", "full-width month-row");
        let title = host.create_element("span");
        let name = self.config.month_name(self.shown_month.month).unwrap_or_default();
        let month_name = host.create_text(name);
        let gap = host.create_text(" ");
        let year = host.create_text(&self.shown_month.year.to_string());
        host.append(title, month_name);
        host.append(title, gap);
        host.append(title, year);

        let nav_span = host.create_element("span");
        host.set_style(nav_span, "display", Some("flex"));
        let nav: SmallVec<[(NodeId, ListenerId); 2]> = [("❮", -1), ("❯", 1)]
            .into_iter()
            .filter_map(|(label, increment)| {
                let entry = self.nav_button(&mut host, label, increment)?;
                host.append(nav_span, entry.0);
                Some(entry)
            })
            .collect();
        host.append(header, title);
        host.append(header, nav_span);

        let weekdays = element(&mut host, "div", "full-width weekday-names");
        for name in self.config.weekday_header() {
            let span = element(&mut host, "span", "weekday-name");
            let text = host.create_text(name);
            host.append(span, text);
            host.append(weekdays, span);
        }

        let weeks = element(&mut host, "div", "full-width weeks");
        let rows: Vec<WeekRow> = std::mem::take(&mut self.pending_weeks)
            .iter()
            .map(|week| {
                let row = self.build_row(&mut host, week);
                host.append(weeks, row.node);
                row
            })
            .collect();

        host.append(container, header);
        host.append(container, weekdays);
        host.append(container, weeks);

        self.nodes = Some(MonthNodes {
            container,
            month_name,
            year,
            weeks,
            nav,
            rows,
        });
    }

    fn mount(&mut self, target: NodeId, anchor: Option<NodeId>) {
        if let Some(nodes) = &self.nodes {
            self.host.borrow_mut().insert(target, nodes.container, anchor);
        }
    }

    fn patch(&mut self, month: &Month, dirty: &DirtyBits) -> anyhow::Result<()> {
        let title = if dirty.contains(Month::VISIBLE_MONTH) && month.visible_month != self.shown_month {
            let name = self.config.month_name(month.visible_month.month)?.to_string();
            Some((name, month.visible_month.year.to_string()))
        } else {
            None
        };

        let Some(mut nodes) = self.nodes.take() else {
            // Not built yet; `create` paints from the latest state
            self.shown_month = month.visible_month;
            self.shown_range = (month.start, month.end);
            self.pending_weeks = month.visible_weeks.clone();
            return Ok(());
        };
        let host_rc = self.host.clone();
        let mut host = host_rc.borrow_mut();

        if let Some((name, year)) = title {
            host.set_text(nodes.month_name, &name);
            host.set_text(nodes.year, &year);
            self.shown_month = month.visible_month;
        }

        if dirty.any(&[Month::VISIBLE_WEEKS, Month::START, Month::END]) {
            self.shown_range = (month.start, month.end);
            for (index, week) in month.visible_weeks.iter().enumerate() {
                match nodes.rows.get_mut(index) {
                    Some(row) => self.patch_row(&mut host, row, week),
                    None => {
                        let row = self.build_row(&mut host, week);
                        host.append(nodes.weeks, row.node);
                        nodes.rows.push(row);
                    }
                }
            }
            for row in nodes.rows.drain(month.visible_weeks.len()..) {
                host.remove(row.node);
            }
        }

        self.nodes = Some(nodes);
        Ok(())
    }

    fn detach(&mut self, detaching: bool) {
        let Some(nodes) = self.nodes.take() else {
            return;
        };
        let mut host = self.host.borrow_mut();
        if detaching {
            host.remove(nodes.container);
            return;
        }
        for (button, id) in nodes.nav {
            host.unlisten(button, id);
        }
        for row in &nodes.rows {
            for cell in &row.cells {
                if let DayCell::Day(day) = cell {
                    for id in &day.listeners {
                        host.unlisten(day.button, *id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::{dispatch, ComponentEvent, ContextMap, Handle, Modifiers, MountOptions, Runtime};

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate { year, month, day }
    }

    fn mount_month(runtime: &Runtime, inputs: MonthInputs) -> Handle<Month> {
        let root = runtime.host().borrow().root();
        runtime
            .mount(MountOptions::<Month>::new(inputs).target(root))
            .unwrap()
    }

    fn header_text(host: &HostTree, root: NodeId) -> String {
        let row = host.query_class(root, "month-row")[0];
        host.text_content(host.children(row)[0])
    }

    fn cell_for_day(host: &HostTree, root: NodeId, day: u32) -> NodeId {
        let label = day.to_string();
        host.query_class(root, "day")
            .into_iter()
            .find(|cell| host.text_content(*cell) == label)
            .unwrap()
    }

    fn button_for_day(host: &HostTree, root: NodeId, day: u32) -> NodeId {
        host.children(cell_for_day(host, root, day))[0]
    }

    fn nav_buttons(host: &HostTree, root: NodeId) -> (NodeId, NodeId) {
        let row = host.query_class(root, "month-row")[0];
        let nav = host.children(row)[1];
        (host.children(nav)[0], host.children(nav)[1])
    }

    #[test]
    fn test_renders_grid() {
        let runtime = Runtime::new();
        let _month = mount_month(&runtime, MonthInputs::default());
        let host = runtime.host().borrow();
        let root = host.root();

        assert_eq!(header_text(&host, root), "January 2020");
        assert_eq!(host.query_class(root, "weekday-name").len(), 7);
        assert_eq!(host.query_class(root, "week").len(), 5);
        assert_eq!(host.query_class(root, "day").len(), 35);
        assert_eq!(host.query_class(root, "day-color").len(), 31);
    }

    #[test]
    fn test_range_attributes() {
        let runtime = Runtime::new();
        let _month = mount_month(
            &runtime,
            MonthInputs {
                start: Some(date(2020, 1, 15)),
                end: Some(date(2020, 1, 20)),
                ..Default::default()
            },
        );
        let host = runtime.host().borrow();
        let root = host.root();

        let start = button_for_day(&host, root, 15);
        assert_eq!(host.attr(start, "data-selected"), Some("true"));
        let start_color = host.children(start)[0];
        assert_eq!(host.attr(start_color, "data-range-left"), Some("false"));
        assert_eq!(host.attr(start_color, "data-range-right"), Some("true"));

        let inside = host.children(button_for_day(&host, root, 17))[0];
        assert_eq!(host.attr(inside, "data-range-left"), Some("true"));
        assert_eq!(host.attr(inside, "data-range-right"), Some("true"));

        let end = button_for_day(&host, root, 20);
        assert_eq!(host.attr(end, "data-selected"), Some("true"));
        assert_eq!(host.attr(host.children(end)[0], "data-range-right"), Some("false"));

        let outside = button_for_day(&host, root, 21);
        assert_eq!(host.attr(outside, "data-selected"), Some("false"));
    }

    #[test]
    fn test_visible_month_change_keeps_matching_cells() {
        let runtime = Runtime::new();
        let month = mount_month(&runtime, MonthInputs::default());
        let root = runtime.host().borrow().root();

        let before: Vec<NodeId> = {
            let host = runtime.host().borrow();
            (1..=31).map(|day| cell_for_day(&host, root, day)).collect()
        };

        // January and April 2020 both start on a Wednesday
        month.set_inputs(MonthInputs {
            visible_month: Some(YearMonth::new(2020, 4)),
            ..Default::default()
        });
        runtime.tick().unwrap();

        let host = runtime.host().borrow();
        assert_eq!(header_text(&host, root), "April 2020");
        for day in 1..=30 {
            assert_eq!(cell_for_day(&host, root, day), before[day as usize - 1]);
        }
        assert!(!host.contains(before[30]));
        assert_eq!(host.query_class(root, "day-color").len(), 30);
    }

    #[test]
    fn test_first_paint_after_update_shows_latest_state() {
        let runtime = Runtime::new();
        let root = runtime.host().borrow().root();
        let month = runtime
            .mount(MountOptions::<Month>::new(MonthInputs::default()))
            .unwrap();

        month.set_inputs(MonthInputs {
            visible_month: Some(YearMonth::new(2020, 4)),
            start: Some(date(2020, 4, 3)),
            ..Default::default()
        });
        runtime.tick().unwrap();
        month.create_fragment();
        month.mount(root, None);
        runtime.tick().unwrap();

        let host = runtime.host().borrow();
        assert_eq!(header_text(&host, root), "April 2020");
        assert_eq!(host.query_class(root, "day-color").len(), 30);
        assert_eq!(host.attr(button_for_day(&host, root, 3), "data-selected"), Some("true"));
        assert_eq!(host.attr(button_for_day(&host, root, 15), "data-selected"), Some("false"));
    }

    #[test]
    fn test_row_count_follows_month() {
        let runtime = Runtime::new();
        let month = mount_month(&runtime, MonthInputs::default());
        let root = runtime.host().borrow().root();

        // May 2020 needs six rows, February 2015 only four
        month.set_inputs(MonthInputs {
            visible_month: Some(YearMonth::new(2020, 5)),
            ..Default::default()
        });
        runtime.tick().unwrap();
        assert_eq!(runtime.host().borrow().query_class(root, "week").len(), 6);

        month.set_inputs(MonthInputs {
            visible_month: Some(YearMonth::new(2015, 2)),
            ..Default::default()
        });
        runtime.tick().unwrap();
        assert_eq!(runtime.host().borrow().query_class(root, "week").len(), 4);
    }

    #[test]
    fn test_nav_buttons_wrap_years() {
        let runtime = Runtime::new();
        let month = mount_month(&runtime, MonthInputs::default());
        let root = runtime.host().borrow().root();

        let (prev, _) = nav_buttons(&runtime.host().borrow(), root);
        dispatch(runtime.host(), prev, HostEvent::mouse(HostEventKind::Click));
        runtime.tick().unwrap();
        assert_eq!(month.read(|m| m.visible_month()), Some(YearMonth::new(2019, 12)));
        assert_eq!(header_text(&runtime.host().borrow(), root), "December 2019");

        let (_, next) = nav_buttons(&runtime.host().borrow(), root);
        dispatch(runtime.host(), next, HostEvent::mouse(HostEventKind::Click));
        dispatch(runtime.host(), next, HostEvent::mouse(HostEventKind::Click));
        runtime.tick().unwrap();
        assert_eq!(header_text(&runtime.host().borrow(), root), "February 2020");
    }

    #[test]
    fn test_day_events_are_filtered() {
        let runtime = Runtime::new();
        let month = mount_month(&runtime, MonthInputs::default());
        let root = runtime.host().borrow().root();

        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut handles = Vec::new();
        for name in ["daySelected", "mouseoverDate", "mousedownDate", "mouseupDate"] {
            let log = log.clone();
            handles.push(month.add_event_listener(name, move |event: &mut ComponentEvent| {
                let day = event.detail::<CalendarDate>().map(|d| d.day).unwrap_or(0);
                log.borrow_mut().push((event.name().to_string(), day));
            }));
        }
        let window_clicks = Rc::new(Cell::new(0));
        let counter = window_clicks.clone();
        runtime.host().borrow_mut().listen(
            root,
            HostEventKind::Click,
            Rc::new(move |_: &mut HostEvent| counter.set(counter.get() + 1)),
        );

        let button = button_for_day(&runtime.host().borrow(), root, 9);
        let host = runtime.host();

        let event = dispatch(host, button, HostEvent::mouse(HostEventKind::Click));
        assert!(event.propagation_stopped());
        dispatch(
            host,
            button,
            HostEvent::mouse(HostEventKind::Click).with_modifiers(Modifiers {
                shift: true,
                ..Modifiers::default()
            }),
        );
        dispatch(
            host,
            button,
            HostEvent::mouse(HostEventKind::MouseDown).with_button(MouseButton::Secondary),
        );
        dispatch(host, button, HostEvent::mouse(HostEventKind::MouseOver));
        dispatch(
            host,
            button,
            HostEvent::mouse(HostEventKind::MouseUp).with_button(MouseButton::Secondary),
        );

        assert_eq!(
            *log.borrow(),
            vec![
                ("daySelected".to_string(), 9),
                ("mouseoverDate".to_string(), 9),
                ("mouseupDate".to_string(), 9),
            ]
        );
        // Only the modified click reached the window
        assert_eq!(window_clicks.get(), 1);
    }

    #[test]
    fn test_kept_cell_reports_new_date() {
        let runtime = Runtime::new();
        let month = mount_month(&runtime, MonthInputs::default());
        let root = runtime.host().borrow().root();

        month.set_inputs(MonthInputs {
            visible_month: Some(YearMonth::new(2020, 4)),
            ..Default::default()
        });
        runtime.tick().unwrap();

        let picked = Rc::new(Cell::new(None));
        let sink = picked.clone();
        let _listener = month.add_event_listener("daySelected", move |event: &mut ComponentEvent| {
            sink.set(event.detail::<CalendarDate>().copied());
        });
        let button = button_for_day(&runtime.host().borrow(), root, 3);
        dispatch(runtime.host(), button, HostEvent::mouse(HostEventKind::Click));
        assert_eq!(picked.get(), Some(date(2020, 4, 3)));
    }

    #[test]
    fn test_config_from_context() {
        let runtime = Runtime::new();
        let root = runtime.host().borrow().root();
        let mut config = CalendarConfig::default();
        config.month_names[0] = "Januar".into();
        let _month = runtime
            .mount(
                MountOptions::<Month>::new(MonthInputs::default())
                    .target(root)
                    .context(ContextMap::new().with(CONTEXT_KEY, config)),
            )
            .unwrap();
        assert_eq!(header_text(&runtime.host().borrow(), root), "Januar 2020");
    }

    #[test]
    fn test_invalid_month_fails_construction() {
        let runtime = Runtime::new();
        let result = runtime.mount(MountOptions::<Month>::new(MonthInputs {
            visible_month: Some(YearMonth::new(2020, 13)),
            ..Default::default()
        }));
        assert!(matches!(
            result,
            Err(tessel_core::RuntimeError::Hook {
                component: "Month",
                phase: tessel_core::Phase::Derive,
                ..
            })
        ));
    }

    #[test]
    fn test_destroy_removes_nodes() {
        let runtime = Runtime::new();
        let month = mount_month(&runtime, MonthInputs::default());
        let root = runtime.host().borrow().root();
        month.destroy();
        assert!(runtime.host().borrow().children(root).is_empty());
    }
}
