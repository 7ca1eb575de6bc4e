//! Error kinds (spec.md §7).
//!
//! Policy: configuration invalidities and structural errors are reported
//! synchronously on the call that caused them; the engine never accumulates
//! deferred errors. `EmptyDraw` is deliberately *not* a variant here — per
//! §7 it is a silent skip at draw time, surfaced only as a `log::trace!`
//! when the `logging` feature is enabled.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A V-list glue has shrink of infinite order at page-break time; the
    /// page-breaker cannot proceed (spec.md §4.6, §7).
    #[error("vertical list contains glue with infinite shrink order {order}, cannot page-break")]
    InfiniteShrink { order: u8 },

    /// The line-breaker deactivated every candidate before reaching the end
    /// of the paragraph under the configured tolerance `rho` (spec.md §4.4,
    /// §7). The engine does not relax `rho` and retry; this is fatal.
    #[error(
        "paragraph has no feasible line-break solution at rho = {rho} \
         (deactivated at h-list position {position})"
    )]
    InfeasibleParagraph { rho: f64, position: usize },

    /// Propagated verbatim from a `PageSink` call. The engine's list state
    /// is left unchanged, so the caller may retry after addressing the sink.
    #[error("page sink failure: {0}")]
    SinkFailure(String),

    /// Front-end (lexer/parser) failure. Not one of the core's four error
    /// kinds — the core itself never parses input (spec.md §1) — but the
    /// demo `compile()` pipeline needs a single error type to return, so
    /// front-end failures are folded in here rather than kept as a bare
    /// `String`.
    #[error("failed to parse input: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
