// src/progress.rs
/// Progress reporting for a run. Frontends implement this to surface status.
/// Every method has a no-op default.
pub trait Progress {
    /// Called once the raw lines are loaded.
    fn begin(&mut self, _lines: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called after each record has been offered to every live sink.
    fn record_done(&mut self, _count: usize) {}

    /// A sink failed and has been dropped for the rest of the run.
    fn sink_failed(&mut self, _sink: &str, _err: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
