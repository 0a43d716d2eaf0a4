use eframe::egui::Context;
use log::debug;

/// Source of simulation frames. The view owns one for as long as it is shown.
pub trait FrameScheduler {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    /// Whether a tick should run this frame. Only true while running.
    fn frame_due(&mut self) -> bool;
}

/// Keeps egui redrawing every frame while running.
pub struct RepaintScheduler {
    ctx: Context,
    running: bool,
}

impl RepaintScheduler {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            running: false,
        }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn start(&mut self) {
        self.running = true;
        self.ctx.request_repaint();
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn frame_due(&mut self) -> bool {
        if self.running {
            self.ctx.request_repaint();
        }
        self.running
    }
}

/// Scoped frame subscription: started on construction, stopped on drop, so
/// tearing a view down always ends its loop.
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    label: &'static str,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn start(mut scheduler: S, label: &'static str) -> Self {
        scheduler.start();
        debug!("{label} frame loop started");
        Self { scheduler, label }
    }

    pub fn frame_due(&mut self) -> bool {
        self.scheduler.frame_due()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn pause(&mut self) {
        self.scheduler.stop();
    }

    pub fn resume(&mut self) {
        self.scheduler.start();
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.scheduler.stop();
        debug!("{} frame loop stopped", self.label);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    /// Grants frames only when told to. Clones share state, so a test can hold
    /// one handle while the loop owns another.
    #[derive(Clone, Default)]
    struct ManualScheduler {
        running: Rc<Cell<bool>>,
        pending: Rc<Cell<usize>>,
    }

    impl ManualScheduler {
        fn advance(&self, frames: usize) {
            self.pending.set(self.pending.get() + frames);
        }

        fn pending(&self) -> usize {
            self.pending.get()
        }
    }

    impl FrameScheduler for ManualScheduler {
        fn start(&mut self) {
            self.running.set(true);
        }

        fn stop(&mut self) {
            self.running.set(false);
            self.pending.set(0);
        }

        fn is_running(&self) -> bool {
            self.running.get()
        }

        fn frame_due(&mut self) -> bool {
            let pending = self.pending.get();
            if !self.running.get() || pending == 0 {
                return false;
            }
            self.pending.set(pending - 1);
            true
        }
    }

    #[test]
    fn manual_frames_are_consumed_one_at_a_time() {
        let clock = ManualScheduler::default();
        let mut frames = FrameLoop::start(clock.clone(), "test");

        assert!(!frames.frame_due());
        clock.advance(2);
        assert!(frames.frame_due());
        assert!(frames.frame_due());
        assert!(!frames.frame_due());
    }

    #[test]
    fn dropping_the_loop_stops_the_scheduler() {
        let clock = ManualScheduler::default();
        let frames = FrameLoop::start(clock.clone(), "test");
        clock.advance(5);
        assert!(clock.is_running());

        drop(frames);
        assert!(!clock.is_running());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn paused_loop_grants_no_frames() {
        let clock = ManualScheduler::default();
        let mut frames = FrameLoop::start(clock.clone(), "test");
        frames.pause();
        clock.advance(3);
        assert!(!frames.frame_due());

        frames.resume();
        assert!(frames.frame_due());
        assert!(frames.is_running());
    }

    #[test]
    fn repaint_scheduler_tracks_running_state() {
        let mut scheduler = RepaintScheduler::new(Context::default());
        assert!(!scheduler.frame_due());

        let mut frames = FrameLoop::start(scheduler, "repaint");
        assert!(frames.frame_due());
        frames.pause();
        assert!(!frames.frame_due());
    }
}
