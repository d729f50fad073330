//! Stage-weighted progress reporting.
//!
//! The pipeline is an ordered list of stages, each owning a fixed,
//! non-overlapping slice of the global 0–100 range. Stages report
//! their own 0–1 fraction and the reporter maps it into the global
//! range, so no stage needs to know where it sits in the run.

/// One sequential phase of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    CreateBoard,
    Tags,
    Tasks,
    Subtasks,
    History,
}

impl Stage {
    /// The global percent window this stage owns.
    pub fn window(self) -> (f64, f64) {
        match self {
            Stage::Fetch => (10.0, 20.0),
            Stage::CreateBoard => (20.0, 30.0),
            Stage::Tags => (30.0, 40.0),
            Stage::Tasks => (40.0, 80.0),
            Stage::Subtasks => (80.0, 95.0),
            Stage::History => (95.0, 100.0),
        }
    }
}

/// Maps stage-local fractions into the global 0–100 range and clamps
/// so successive reports never go backwards.
pub struct ProgressReporter<F> {
    sink: F,
    last: f64,
}

impl<F: FnMut(f64, &str)> ProgressReporter<F> {
    pub fn new(sink: F) -> Self {
        Self { sink, last: 0.0 }
    }

    /// Report `fraction` (0–1) of `stage` with a human-readable
    /// message.
    pub fn update(&mut self, stage: Stage, fraction: f64, message: &str) {
        let (start, end) = stage.window();
        let percent = start + fraction.clamp(0.0, 1.0) * (end - start);
        let percent = percent.max(self.last);
        self.last = percent;
        (self.sink)(percent, message);
    }

    /// The highest percent reported so far.
    pub fn percent(&self) -> f64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn collecting_reporter(
        events: &RefCell<Vec<f64>>,
    ) -> ProgressReporter<impl FnMut(f64, &str) + '_> {
        ProgressReporter::new(|pct, _msg| events.borrow_mut().push(pct))
    }

    #[test]
    fn fractions_map_into_stage_windows() {
        let events = RefCell::new(Vec::new());
        let mut reporter = collecting_reporter(&events);

        reporter.update(Stage::Fetch, 0.0, "fetching");
        reporter.update(Stage::Fetch, 1.0, "fetched");
        reporter.update(Stage::Tasks, 0.5, "halfway");
        reporter.update(Stage::History, 1.0, "done");

        assert_eq!(*events.borrow(), vec![10.0, 20.0, 60.0, 100.0]);
    }

    #[test]
    fn reports_never_decrease() {
        let events = RefCell::new(Vec::new());
        let mut reporter = collecting_reporter(&events);

        reporter.update(Stage::Tasks, 1.0, "tasks done");
        // An earlier stage reported late must not move the bar back.
        reporter.update(Stage::Tags, 0.0, "stray");
        reporter.update(Stage::Subtasks, 0.0, "subtasks");

        assert_eq!(*events.borrow(), vec![80.0, 80.0, 80.0]);
    }

    #[test]
    fn fraction_is_clamped() {
        let events = RefCell::new(Vec::new());
        let mut reporter = collecting_reporter(&events);

        reporter.update(Stage::Fetch, 7.5, "overshoot");
        assert_eq!(*events.borrow(), vec![20.0]);

        reporter.update(Stage::CreateBoard, -1.0, "undershoot");
        assert_eq!(events.borrow()[1], 20.0);
    }

    #[test]
    fn windows_tile_the_range() {
        let stages = [
            Stage::Fetch,
            Stage::CreateBoard,
            Stage::Tags,
            Stage::Tasks,
            Stage::Subtasks,
            Stage::History,
        ];
        let mut prev_end = 10.0;
        for stage in stages {
            let (start, end) = stage.window();
            assert_eq!(start, prev_end);
            assert!(end > start);
            prev_end = end;
        }
        assert_eq!(prev_end, 100.0);
    }
}
