//! Two-month date-range picker
//!
//! [`DateRangeInput`] shows a start and an end [`Month`] side by side. A range
//! is picked either by clicking a day or by dragging from one day to another.
//! While a drag is in progress both months preview the range; releasing the
//! mouse commits it. Every user-driven change of the committed range emits a
//! `change` event whose detail is the new [`DateRange`].
//!
//! The visible month of each child is bound to the parent, so paging a child
//! with its previous/next buttons is reflected in
//! [`DateRangeInput::visible_start_month`] and
//! [`DateRangeInput::visible_end_month`].

use std::cell::Cell;
use std::rc::Rc;

use tessel_core::{
    share, Component, ComponentEvent, Cx, DirtyBits, Handle, HostEvent, HostEventKind,
    HostHandler, ListenerHandle, ListenerId, MountOptions, NodeId, RenderFragment, Runtime, Scope,
    Setup, SharedFragment, TransitionCoordinator, WeakHandle,
};

use crate::date::{date_gt, date_lt, dates_as_range, dates_match, CalendarDate, DateRange, YearMonth};
use crate::month::{element, Month, MonthInputs, DEFAULT_END, DEFAULT_START};

/// Inputs of [`DateRangeInput`]; `None` keeps the current value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateRangeInputs {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
    pub visible_start_month: Option<YearMonth>,
    pub visible_end_month: Option<YearMonth>,
}

/// Which of the two months
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

impl Side {
    const BOTH: [Side; 2] = [Side::Start, Side::End];

    fn index(self) -> usize {
        match self {
            Side::Start => 0,
            Side::End => 1,
        }
    }

    fn visible_slot(self) -> usize {
        match self {
            Side::Start => DateRangeInput::VISIBLE_START_MONTH,
            Side::End => DateRangeInput::VISIBLE_END_MONTH,
        }
    }
}

/// Range shown while the mouse is down
///
/// Pressing on the start month moves the start to the pressed day and the
/// end to the hovered day; pressing on the end month does the opposite.
pub fn get_display_range(
    start: CalendarDate,
    end: CalendarDate,
    start_mouse_down: Option<CalendarDate>,
    end_mouse_down: Option<CalendarDate>,
    mouseover_date: Option<CalendarDate>,
) -> DateRange {
    let (mut start, mut end) = (start, end);
    if let Some(down) = start_mouse_down {
        start = down;
        if let Some(over) = mouseover_date.filter(|over| !dates_match(over, &down)) {
            end = over;
        }
    } else if let Some(down) = end_mouse_down {
        end = down;
        if let Some(over) = mouseover_date.filter(|over| !dates_match(over, &down)) {
            start = over;
        }
    }
    dates_as_range(start, end)
}

pub struct DateRangeInput {
    visible_start_month: YearMonth,
    visible_end_month: YearMonth,
    start_mouse_down: Option<CalendarDate>,
    end_mouse_down: Option<CalendarDate>,
    mouseover_date: Option<CalendarDate>,
    display_range: DateRange,
    start: CalendarDate,
    end: CalendarDate,
    user_selected_start: Option<CalendarDate>,
    user_selected_end: Option<CalendarDate>,
}

impl DateRangeInput {
    pub const VISIBLE_START_MONTH: usize = 0;
    pub const VISIBLE_END_MONTH: usize = 1;
    pub const START_MOUSE_DOWN: usize = 2;
    pub const END_MOUSE_DOWN: usize = 3;
    pub const MOUSEOVER_DATE: usize = 4;
    pub const DISPLAY_RANGE: usize = 5;
    pub const START: usize = 6;
    pub const END: usize = 7;
    pub const USER_SELECTED_START: usize = 8;
    pub const USER_SELECTED_END: usize = 9;

    pub fn start(&self) -> CalendarDate {
        self.start
    }

    pub fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn display_range(&self) -> DateRange {
        self.display_range
    }

    pub fn visible_start_month(&self) -> YearMonth {
        self.visible_start_month
    }

    pub fn visible_end_month(&self) -> YearMonth {
        self.visible_end_month
    }

    /// Whether a drag is in progress
    pub fn is_mouse_down(&self) -> bool {
        self.start_mouse_down.is_some() || self.end_mouse_down.is_some()
    }

    fn visible_month(&self, side: Side) -> YearMonth {
        match side {
            Side::Start => self.visible_start_month,
            Side::End => self.visible_end_month,
        }
    }

    fn visible_month_mut(&mut self, side: Side) -> &mut YearMonth {
        match side {
            Side::Start => &mut self.visible_start_month,
            Side::End => &mut self.visible_end_month,
        }
    }

    pub fn clear_any_mouse_down(&mut self, cx: &mut Cx<'_, Self>) {
        cx.set(Self::START_MOUSE_DOWN, &mut self.start_mouse_down, None);
        cx.set(Self::END_MOUSE_DOWN, &mut self.end_mouse_down, None);
    }

    pub fn on_mouseover_date(&mut self, date: CalendarDate, cx: &mut Cx<'_, Self>) {
        if self.is_mouse_down() {
            cx.set(Self::MOUSEOVER_DATE, &mut self.mouseover_date, Some(date));
        }
    }

    /// Commit the previewed range, unless the press and release were on the
    /// same day; that is a click and is handled as a day selection
    pub fn on_mouseup_date(&mut self, date: CalendarDate, cx: &mut Cx<'_, Self>) {
        let pressed_here = |down: Option<CalendarDate>| down.is_some_and(|d| dates_match(&d, &date));
        if !self.is_mouse_down()
            || pressed_here(self.start_mouse_down)
            || pressed_here(self.end_mouse_down)
        {
            return;
        }
        let range = self.display_range;
        cx.set(Self::USER_SELECTED_START, &mut self.user_selected_start, Some(range.start));
        cx.set(Self::USER_SELECTED_END, &mut self.user_selected_end, Some(range.end));
    }

    /// A day clicked on the start month; a day past the end becomes the new
    /// end and the old end the new start
    pub fn on_start_day_selected(&mut self, date: CalendarDate, cx: &mut Cx<'_, Self>) {
        self.clear_any_mouse_down(cx);
        if date_gt(&date, &self.end) {
            let end = self.end;
            cx.set(Self::USER_SELECTED_START, &mut self.user_selected_start, Some(end));
            cx.set(Self::USER_SELECTED_END, &mut self.user_selected_end, Some(date));
        } else if !dates_match(&date, &self.start) {
            cx.set(Self::USER_SELECTED_START, &mut self.user_selected_start, Some(date));
        }
    }

    /// A day clicked on the end month; a day before the start becomes the
    /// new start and the old start the new end
    pub fn on_end_day_selected(&mut self, date: CalendarDate, cx: &mut Cx<'_, Self>) {
        self.clear_any_mouse_down(cx);
        if date_lt(&date, &self.start) {
            let start = self.start;
            cx.set(Self::USER_SELECTED_END, &mut self.user_selected_end, Some(start));
            cx.set(Self::USER_SELECTED_START, &mut self.user_selected_start, Some(date));
        } else if !dates_match(&date, &self.end) {
            cx.set(Self::USER_SELECTED_END, &mut self.user_selected_end, Some(date));
        }
    }

    pub fn on_start_mousedown(&mut self, date: CalendarDate, cx: &mut Cx<'_, Self>) {
        cx.set(Self::START_MOUSE_DOWN, &mut self.start_mouse_down, Some(date));
        cx.set(Self::MOUSEOVER_DATE, &mut self.mouseover_date, Some(date));
    }

    pub fn on_end_mousedown(&mut self, date: CalendarDate, cx: &mut Cx<'_, Self>) {
        cx.set(Self::END_MOUSE_DOWN, &mut self.end_mouse_down, Some(date));
        cx.set(Self::MOUSEOVER_DATE, &mut self.mouseover_date, Some(date));
    }

    fn build_month(&self, scope: &Scope<Self>, side: Side) -> tessel_core::Result<Handle<Month>> {
        let inputs = MonthInputs {
            start: Some(self.display_range.start),
            end: Some(self.display_range.end),
            visible_month: Some(self.visible_month(side)),
        };
        let month = Handle::new(
            scope.runtime(),
            MountOptions::new(inputs).context(scope.context().clone()),
        )?;

        let child = month.downgrade();
        let parent = scope.handle().clone();
        scope
            .runtime()
            .scheduler()
            .add_binding_callback(Self::NAME, move || {
                if let Some(child) = child.upgrade() {
                    child.bind(Month::VISIBLE_MONTH, move |value: YearMonth| {
                        parent.update(|input, cx| {
                            cx.set(side.visible_slot(), input.visible_month_mut(side), value);
                        });
                    });
                }
                Ok(())
            });
        Ok(month)
    }
}

impl Component for DateRangeInput {
    type Inputs = DateRangeInputs;
    const NAME: &'static str = "DateRangeInput";

    fn create(inputs: DateRangeInputs, _setup: &mut Setup<'_, Self>) -> Self {
        let start = inputs.start.unwrap_or(DEFAULT_START);
        let end = inputs.end.unwrap_or(DEFAULT_END);
        DateRangeInput {
            visible_start_month: inputs.visible_start_month.unwrap_or(start.year_month()),
            visible_end_month: inputs.visible_end_month.unwrap_or(end.year_month()),
            start_mouse_down: None,
            end_mouse_down: None,
            mouseover_date: None,
            display_range: dates_as_range(start, end),
            start,
            end,
            user_selected_start: None,
            user_selected_end: None,
        }
    }

    fn set_inputs(&mut self, inputs: DateRangeInputs, cx: &mut Cx<'_, Self>) {
        if let Some(start) = inputs.start {
            cx.set(Self::START, &mut self.start, start);
        }
        if let Some(end) = inputs.end {
            cx.set(Self::END, &mut self.end, end);
        }
        if let Some(month) = inputs.visible_start_month {
            cx.set(Self::VISIBLE_START_MONTH, &mut self.visible_start_month, month);
        }
        if let Some(month) = inputs.visible_end_month {
            cx.set(Self::VISIBLE_END_MONTH, &mut self.visible_end_month, month);
        }
    }

    fn derive(&mut self, cx: &mut Cx<'_, Self>) -> anyhow::Result<()> {
        if cx.any_dirty(&[
            Self::USER_SELECTED_START,
            Self::USER_SELECTED_END,
            Self::START,
            Self::END,
        ]) {
            let selected_start = self.user_selected_start.take();
            let selected_end = self.user_selected_end.take();
            if selected_start.is_some() || selected_end.is_some() {
                let mut changed = false;
                if let Some(start) = selected_start {
                    changed |= cx.set(Self::START, &mut self.start, start);
                }
                if let Some(end) = selected_end {
                    changed |= cx.set(Self::END, &mut self.end, end);
                }
                cx.invalidate(Self::USER_SELECTED_START, &self.user_selected_start);
                cx.invalidate(Self::USER_SELECTED_END, &self.user_selected_end);
                if changed {
                    tracing::debug!(start = %self.start, end = %self.end, "range selected");
                    cx.dispatch(
                        "change",
                        DateRange {
                            start: self.start,
                            end: self.end,
                        },
                    );
                }
            }
        }

        if cx.any_dirty(&[
            Self::START,
            Self::END,
            Self::START_MOUSE_DOWN,
            Self::END_MOUSE_DOWN,
            Self::MOUSEOVER_DATE,
        ]) {
            let range = get_display_range(
                self.start,
                self.end,
                self.start_mouse_down,
                self.end_mouse_down,
                self.mouseover_date,
            );
            cx.set(Self::DISPLAY_RANGE, &mut self.display_range, range);
        }
        Ok(())
    }

    fn render(&self, scope: &Scope<Self>) -> anyhow::Result<Option<SharedFragment<Self>>> {
        let months = [
            self.build_month(scope, Side::Start)?,
            self.build_month(scope, Side::End)?,
        ];
        Ok(Some(share(DateRangeView::new(scope, months))))
    }

    fn slot_value(&self, slot: usize) -> Option<&dyn std::any::Any> {
        match slot {
            Self::VISIBLE_START_MONTH => Some(&self.visible_start_month),
            Self::VISIBLE_END_MONTH => Some(&self.visible_end_month),
            Self::START => Some(&self.start),
            Self::END => Some(&self.end),
            _ => None,
        }
    }
}

// =============================================================================
// FRAGMENT
// =============================================================================

type DateHandler = fn(&mut DateRangeInput, CalendarDate, &mut Cx<'_, DateRangeInput>);

/// Forward a child's date event to a handler on the parent
fn forward(
    month: &Handle<Month>,
    parent: &WeakHandle<DateRangeInput>,
    name: &str,
    handler: DateHandler,
) -> ListenerHandle {
    let parent = parent.clone();
    month.add_event_listener(name, move |event: &mut ComponentEvent| {
        if let Some(date) = event.detail::<CalendarDate>().copied() {
            parent.update(|input, cx| handler(input, date, cx));
        }
    })
}

struct RangeNodes {
    container: NodeId,
    window_mouseup: Option<ListenerId>,
}

struct DateRangeView {
    runtime: Runtime,
    handle: WeakHandle<DateRangeInput>,
    months: [Handle<Month>; 2],
    /// Set while a visible month pushed down to a child is settling
    updating: [Rc<Cell<bool>>; 2],
    month_listeners: Vec<ListenerHandle>,
    nodes: Option<RangeNodes>,
}

impl DateRangeView {
    fn new(scope: &Scope<DateRangeInput>, months: [Handle<Month>; 2]) -> Self {
        let parent = scope.handle();
        let [start_month, end_month] = &months;
        let month_listeners = vec![
            forward(start_month, parent, "daySelected", DateRangeInput::on_start_day_selected),
            forward(start_month, parent, "mousedownDate", DateRangeInput::on_start_mousedown),
            forward(start_month, parent, "mouseoverDate", DateRangeInput::on_mouseover_date),
            forward(start_month, parent, "mouseupDate", DateRangeInput::on_mouseup_date),
            forward(end_month, parent, "daySelected", DateRangeInput::on_end_day_selected),
            forward(end_month, parent, "mousedownDate", DateRangeInput::on_end_mousedown),
            forward(end_month, parent, "mouseoverDate", DateRangeInput::on_mouseover_date),
            forward(end_month, parent, "mouseupDate", DateRangeInput::on_mouseup_date),
        ];
        Self {
            runtime: scope.runtime().clone(),
            handle: parent.clone(),
            months,
            updating: [Rc::new(Cell::new(false)), Rc::new(Cell::new(false))],
            month_listeners,
            nodes: None,
        }
    }
}

impl RenderFragment<DateRangeInput> for DateRangeView {
    fn create(&mut self) {
        let container = element(&mut self.runtime.host().borrow_mut(), "div", "container");
        for month in &self.months {
            month.create_fragment();
        }
        self.nodes = Some(RangeNodes {
            container,
            window_mouseup: None,
        });
    }

    fn mount(&mut self, target: NodeId, anchor: Option<NodeId>) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        let host = self.runtime.host();
        host.borrow_mut().insert(target, nodes.container, anchor);

        self.months[0].mount(nodes.container, None);
        {
            let mut host = host.borrow_mut();
            let before = host.create_text(" ");
            let spacer = element(&mut host, "span", "hspace");
            let after = host.create_text(" ");
            host.append(nodes.container, before);
            host.append(nodes.container, spacer);
            host.append(nodes.container, after);
        }
        self.months[1].mount(nodes.container, None);

        if nodes.window_mouseup.is_none() {
            let parent = self.handle.clone();
            let handler: HostHandler = Rc::new(move |_: &mut HostEvent| {
                parent.update(|input, cx| input.clear_any_mouse_down(cx));
            });
            let mut host = host.borrow_mut();
            let root = host.root();
            nodes.window_mouseup = host.listen(root, HostEventKind::MouseUp, handler);
        }
    }

    fn patch(&mut self, input: &DateRangeInput, dirty: &DirtyBits) -> anyhow::Result<()> {
        for side in Side::BOTH {
            let mut changes = MonthInputs::default();
            if dirty.contains(DateRangeInput::DISPLAY_RANGE) {
                changes.start = Some(input.display_range.start);
                changes.end = Some(input.display_range.end);
            }
            let updating = &self.updating[side.index()];
            if !updating.get() && dirty.contains(side.visible_slot()) {
                updating.set(true);
                changes.visible_month = Some(input.visible_month(side));
                let settled = updating.clone();
                self.runtime
                    .scheduler()
                    .add_flush_callback(move || settled.set(false));
            }
            if changes != MonthInputs::default() {
                self.months[side.index()].set_inputs(changes);
            }
        }
        Ok(())
    }

    fn has_transitions(&self) -> bool {
        for month in &self.months {
            if let Some(fragment) = month.fragment() {
                if fragment.borrow().has_transitions() {
                    return true;
                }
            }
        }
        false
    }

    fn intro(&mut self, local: bool, transitions: &TransitionCoordinator) {
        for month in &self.months {
            if let Some(fragment) = month.fragment() {
                transitions.transition_in(&fragment, local);
            }
        }
    }

    fn outro(&mut self, local: bool, transitions: &TransitionCoordinator) {
        for month in &self.months {
            if let Some(fragment) = month.fragment() {
                transitions.transition_out(&fragment, local, false, None);
            }
        }
    }

    fn detach(&mut self, detaching: bool) {
        if let Some(nodes) = self.nodes.take() {
            let mut host = self.runtime.host().borrow_mut();
            if detaching {
                host.remove(nodes.container);
            }
            if let Some(id) = nodes.window_mouseup {
                let root = host.root();
                host.unlisten(root, id);
            }
        }
        for listener in self.month_listeners.drain(..) {
            listener.remove();
        }
        for month in &self.months {
            month.destroy_with(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate { year, month, day }
    }

    #[test]
    fn test_display_range_without_drag() {
        let range = get_display_range(date(2020, 1, 15), date(2020, 2, 15), None, None, None);
        assert_eq!(range.start, date(2020, 1, 15));
        assert_eq!(range.end, date(2020, 2, 15));
    }

    #[test]
    fn test_display_range_start_drag() {
        let start = date(2020, 1, 15);
        let end = date(2020, 2, 15);
        let down = Some(date(2020, 1, 20));

        let pressed = get_display_range(start, end, down, None, down);
        assert_eq!(pressed.start, date(2020, 1, 20));
        assert_eq!(pressed.end, end);

        let dragged = get_display_range(start, end, down, None, Some(date(2020, 1, 25)));
        assert_eq!(dragged.end, date(2020, 1, 25));

        // Dragging backwards past the press reorders the range
        let backwards = get_display_range(start, end, down, None, Some(date(2020, 1, 5)));
        assert_eq!(backwards.start, date(2020, 1, 5));
        assert_eq!(backwards.end, date(2020, 1, 20));
    }

    #[test]
    fn test_display_range_end_drag() {
        let start = date(2020, 1, 15);
        let end = date(2020, 2, 15);
        let range = get_display_range(
            start,
            end,
            None,
            Some(date(2020, 2, 10)),
            Some(date(2020, 1, 30)),
        );
        assert_eq!(range.start, date(2020, 1, 30));
        assert_eq!(range.end, date(2020, 2, 10));
    }

    #[test]
    fn test_visible_months_default_to_range() {
        let runtime = Runtime::new();
        let input = runtime
            .mount(MountOptions::<DateRangeInput>::new(DateRangeInputs {
                start: Some(date(2021, 3, 2)),
                end: Some(date(2021, 6, 9)),
                ..Default::default()
            }))
            .unwrap();
        assert_eq!(
            input.read(|i| (i.visible_start_month(), i.visible_end_month())),
            Some((YearMonth::new(2021, 3), YearMonth::new(2021, 6)))
        );
    }

    #[test]
    fn test_start_day_selection_rules() {
        let runtime = Runtime::new();
        let input = runtime
            .mount(MountOptions::<DateRangeInput>::new(DateRangeInputs::default()))
            .unwrap();
        let changes = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = changes.clone();
        let _listener = input.add_event_listener("change", move |event: &mut ComponentEvent| {
            if let Some(range) = event.detail::<DateRange>() {
                sink.borrow_mut().push(*range);
            }
        });

        // Reselecting the current start is not a change
        input.update(|i, cx| i.on_start_day_selected(date(2020, 1, 15), cx));
        runtime.tick().unwrap();
        assert!(changes.borrow().is_empty());

        input.update(|i, cx| i.on_start_day_selected(date(2020, 1, 10), cx));
        runtime.tick().unwrap();
        assert_eq!(
            changes.borrow().last(),
            Some(&DateRange {
                start: date(2020, 1, 10),
                end: date(2020, 2, 15)
            })
        );

        input.update(|i, cx| i.on_start_day_selected(date(2020, 3, 1), cx));
        runtime.tick().unwrap();
        assert_eq!(
            changes.borrow().last(),
            Some(&DateRange {
                start: date(2020, 2, 15),
                end: date(2020, 3, 1)
            })
        );
        assert_eq!(changes.borrow().len(), 2);
    }
}
