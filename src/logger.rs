//! Pluggable diagnostics sink for parser events.
//!
//! The parser reports matches, misses and rule reordering through a
//! [`Logger`] only when debug mode is on. The default [`NoopLogger`]
//! discards everything.

use std::fmt;

/// Logger receives formatted diagnostic messages.
///
/// Any `Fn(fmt::Arguments)` closure is a logger as well.
pub trait Logger: Send + Sync {
    /// Log an informational message.
    fn info(&self, args: fmt::Arguments<'_>);
}

/// Logger that forwards to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn info(&self, args: fmt::Arguments<'_>) {
        log::info!(target: "uarule", "{}", args);
    }
}

/// Logger that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _args: fmt::Arguments<'_>) {}
}

impl<F> Logger for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn info(&self, args: fmt::Arguments<'_>) {
        self(args)
    }
}
