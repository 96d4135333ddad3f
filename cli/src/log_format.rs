//! Plain-text event formatter that prefixes each line with the span ids and span name.
//!
//! Used by `logging::init()` for `LOG_FILE` output, so all events of one generation
//! (catalog load, cache lookup, completion call) can be grouped by `trace_id`.

use std::fmt;

use tracing_core::Subscriber;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::{LookupSpan, SpanRef};

/// Output format: `TIMESTAMP trace_id=X span_id=Y span=NAME LEVEL target: fields` when the
/// event is inside a span; otherwise `TIMESTAMP LEVEL target: fields`.
#[derive(Default)]
pub struct TextWithSpanIds {
    timer: SystemTime,
}

impl TextWithSpanIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, N> FormatEvent<S, N> for TextWithSpanIds
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing_core::Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        if let Some(span) = ctx.parent_span() {
            let span_id = span.id().into_u64();
            let trace_id = span
                .scope()
                .from_root()
                .next()
                .map(|root: SpanRef<'_, S>| root.id().into_u64())
                .unwrap_or(span_id);
            write!(
                writer,
                " trace_id={} span_id={} span={}",
                trace_id,
                span_id,
                span.name()
            )?;
        }

        write!(
            writer,
            " {}: {}: ",
            event.metadata().level(),
            event.metadata().target()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
