/// Icon tray visibility and icon highlight state
///
/// The tray slides in on interaction and back out after an idle delay. At
/// most one hide is pending; any interaction cancels it.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::scheduler::{Scheduler, TaskId};

/// Icon scale factor as a CSS transform value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconScale {
    Normal,
    Hover,
    DropTarget,
}

impl IconScale {
    pub fn css(self) -> &'static str {
        match self {
            IconScale::Normal => "scale(1)",
            IconScale::Hover => "scale(1.1)",
            IconScale::DropTarget => "scale(1.2)",
        }
    }
}

struct Inner {
    scheduler: Rc<dyn Scheduler>,
    hide_delay_ms: u32,
    expanded: Cell<bool>,
    highlight: Cell<Option<(usize, IconScale)>>,
    pending_hide: Cell<Option<TaskId>>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

#[derive(Clone)]
pub struct Tray {
    inner: Rc<Inner>,
}

impl Tray {
    /// Starts collapsed; only pointer or drag interaction slides it out
    pub fn new(scheduler: Rc<dyn Scheduler>, hide_delay_ms: u32) -> Self {
        Tray {
            inner: Rc::new(Inner {
                scheduler,
                hide_delay_ms,
                expanded: Cell::new(false),
                highlight: Cell::new(None),
                pending_hide: Cell::new(None),
                listener: RefCell::new(None),
            }),
        }
    }

    /// Register the re-render hook
    pub fn subscribe(&self, listener: Rc<dyn Fn()>) {
        *self.inner.listener.borrow_mut() = Some(listener);
    }

    pub fn unsubscribe(&self) {
        self.inner.listener.borrow_mut().take();
    }

    pub fn is_expanded(&self) -> bool {
        self.inner.expanded.get()
    }

    pub fn icon_scale(&self, index: usize) -> IconScale {
        match self.inner.highlight.get() {
            Some((highlighted, scale)) if highlighted == index => scale,
            _ => IconScale::Normal,
        }
    }

    /// Re-assert the collapsed position once the page has settled
    pub fn start(&self) {
        self.hide_later();
    }

    pub fn pointer_entered(&self) {
        self.show();
    }

    pub fn pointer_left(&self) {
        self.hide_later();
    }

    /// A page hyperlink started being dragged
    pub fn link_drag_started(&self) {
        self.show();
    }

    pub fn icon_pointer_over(&self, index: usize) {
        self.set_highlight(Some((index, IconScale::Hover)));
    }

    pub fn icon_pointer_out(&self, index: usize) {
        self.clear_highlight(index);
    }

    pub fn icon_drag_over(&self, index: usize) {
        self.show();
        self.set_highlight(Some((index, IconScale::DropTarget)));
    }

    pub fn icon_drag_leave(&self, index: usize) {
        self.clear_highlight(index);
    }

    pub fn icon_dropped(&self, index: usize) {
        self.clear_highlight(index);
    }

    fn show(&self) {
        self.cancel_pending_hide();
        if !self.inner.expanded.replace(true) {
            self.notify();
        }
    }

    fn hide_later(&self) {
        self.cancel_pending_hide();

        let weak = Rc::downgrade(&self.inner);
        let id = self.inner.scheduler.schedule(
            self.inner.hide_delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let tray = Tray { inner };
                    tray.inner.pending_hide.set(None);
                    if tray.inner.expanded.replace(false) {
                        tray.notify();
                    }
                }
            }),
        );
        self.inner.pending_hide.set(Some(id));
    }

    fn cancel_pending_hide(&self) {
        if let Some(id) = self.inner.pending_hide.take() {
            self.inner.scheduler.cancel(id);
        }
    }

    fn clear_highlight(&self, index: usize) {
        if matches!(self.inner.highlight.get(), Some((highlighted, _)) if highlighted == index) {
            self.set_highlight(None);
        }
    }

    fn set_highlight(&self, highlight: Option<(usize, IconScale)>) {
        if self.inner.highlight.replace(highlight) != highlight {
            self.notify();
        }
    }

    fn notify(&self) {
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    fn tray() -> (Rc<ManualScheduler>, Tray) {
        let scheduler = ManualScheduler::new();
        let tray = Tray::new(Rc::clone(&scheduler) as Rc<dyn Scheduler>, 1000);
        (scheduler, tray)
    }

    #[test]
    fn test_starts_collapsed() {
        let (scheduler, tray) = tray();
        assert!(!tray.is_expanded());

        tray.start();
        assert!(!tray.is_expanded());
        scheduler.advance(1000);
        assert!(!tray.is_expanded());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_startup_collapse_does_not_hide_an_interaction() {
        let (scheduler, tray) = tray();
        tray.start();

        tray.link_drag_started();
        scheduler.advance(1000);
        assert!(tray.is_expanded());
    }

    #[test]
    fn test_pointer_leave_hides_after_delay() {
        let (scheduler, tray) = tray();
        tray.start();
        scheduler.advance(1000);

        tray.pointer_entered();
        assert!(tray.is_expanded());

        tray.pointer_left();
        scheduler.advance(500);
        assert!(tray.is_expanded());
        scheduler.advance(500);
        assert!(!tray.is_expanded());
    }

    #[test]
    fn test_hide_is_debounced() {
        let (scheduler, tray) = tray();

        tray.pointer_entered();
        tray.pointer_left();
        scheduler.advance(800);
        tray.pointer_left();
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(800);
        assert!(tray.is_expanded());
        scheduler.advance(200);
        assert!(!tray.is_expanded());
    }

    #[test]
    fn test_interaction_cancels_pending_hide() {
        let (scheduler, tray) = tray();

        tray.pointer_left();
        tray.link_drag_started();
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(5000);
        assert!(tray.is_expanded());
    }

    #[test]
    fn test_drag_over_shows_and_highlights() {
        let (scheduler, tray) = tray();
        tray.start();
        scheduler.advance(1000);
        assert!(!tray.is_expanded());

        tray.icon_drag_over(1);
        assert!(tray.is_expanded());
        assert_eq!(tray.icon_scale(1), IconScale::DropTarget);
        assert_eq!(tray.icon_scale(0), IconScale::Normal);

        tray.icon_dropped(1);
        assert_eq!(tray.icon_scale(1), IconScale::Normal);
    }

    #[test]
    fn test_hover_highlight() {
        let (_, tray) = tray();

        tray.icon_pointer_over(0);
        assert_eq!(tray.icon_scale(0).css(), "scale(1.1)");

        // leaving another icon leaves this highlight alone
        tray.icon_drag_leave(2);
        assert_eq!(tray.icon_scale(0), IconScale::Hover);

        tray.icon_pointer_out(0);
        assert_eq!(tray.icon_scale(0).css(), "scale(1)");
    }

    #[test]
    fn test_listener_called_on_changes() {
        let (scheduler, tray) = tray();
        let calls = Rc::new(Cell::new(0));
        {
            let calls = Rc::clone(&calls);
            tray.subscribe(Rc::new(move || calls.set(calls.get() + 1)));
        }

        // already collapsed
        tray.start();
        scheduler.advance(1000);
        assert_eq!(calls.get(), 0);

        tray.pointer_entered();
        assert_eq!(calls.get(), 1);
        tray.pointer_entered();
        assert_eq!(calls.get(), 1);

        tray.pointer_left();
        scheduler.advance(1000);
        assert_eq!(calls.get(), 2);
    }
}
