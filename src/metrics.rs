//! Operation instrumentation.
//!
//! A session reports the start and end of every operation it performs to an
//! optional [`OperationObserver`]. Nothing in the editing core depends on the
//! observer being present.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::util::time;

/// Timing and outcome of one session operation
#[derive(Debug, Clone, PartialEq)]
pub struct OperationMetrics {
    pub operation: &'static str,
    pub start_time: f64,
    pub end_time: f64,
    pub success: bool,
}

impl OperationMetrics {
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

impl fmt::Display for OperationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {:.6}s",
            self.operation,
            if self.success { "succeeded" } else { "failed" },
            self.duration()
        )
    }
}

pub trait OperationObserver {
    fn operation_started(&mut self, _operation: &'static str) {}

    fn operation_finished(&mut self, metrics: OperationMetrics);
}

impl<T: OperationObserver> OperationObserver for Rc<RefCell<T>> {
    fn operation_started(&mut self, operation: &'static str) {
        self.borrow_mut().operation_started(operation);
    }

    fn operation_finished(&mut self, metrics: OperationMetrics) {
        self.borrow_mut().operation_finished(metrics);
    }
}

/// Bounded in-memory record of finished operations
#[derive(Debug)]
pub struct MetricsRecorder {
    history: VecDeque<OperationMetrics>,
    capacity: usize,
}

impl MetricsRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn metrics(&self) -> impl Iterator<Item = &OperationMetrics> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        log::info!("Metrics history cleared");
    }

    /// `None` until at least one operation has been recorded
    pub fn summary(&self) -> Option<PerformanceSummary> {
        if self.history.is_empty() {
            return None;
        }
        let total = self.history.len();
        let successful = self.history.iter().filter(|m| m.success).count();
        let total_duration: f64 = self.history.iter().map(OperationMetrics::duration).sum();
        Some(PerformanceSummary {
            total_operations: total,
            successful_operations: successful,
            failed_operations: total - successful,
            average_duration: total_duration / total as f64,
        })
    }
}

impl OperationObserver for MetricsRecorder {
    fn operation_finished(&mut self, metrics: OperationMetrics) {
        log::debug!("Operation recorded: {}", metrics);
        if self.capacity == 0 {
            return;
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(metrics);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub total_operations: usize,
    pub successful_operations: usize,
    pub failed_operations: usize,
    pub average_duration: f64,
}

/// Measures one operation from `start` to `finish`
pub(crate) struct OperationTimer {
    operation: &'static str,
    start_time: f64,
}

impl OperationTimer {
    pub(crate) fn start(
        operation: &'static str,
        observer: Option<&mut (dyn OperationObserver + 'static)>,
    ) -> Self {
        if let Some(observer) = observer {
            observer.operation_started(operation);
        }
        Self {
            operation,
            start_time: time::current_time_secs(),
        }
    }

    pub(crate) fn finish(self, observer: Option<&mut (dyn OperationObserver + 'static)>, success: bool) {
        let Some(observer) = observer else {
            return;
        };
        observer.operation_finished(OperationMetrics {
            operation: self.operation,
            start_time: self.start_time,
            end_time: time::current_time_secs(),
            success,
        });
    }
}
