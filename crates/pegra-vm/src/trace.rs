//! Execution tracing.

use pegra_core::RuleId;

/// Receives match-engine events.
///
/// Generic dispatch: `NoopTracer` calls are optimized away entirely, while
/// `PrintTracer` collects an indented textual trace.
pub trait Tracer {
    fn enter(&mut self, rule: RuleId, label: Option<&str>, pos: usize) {
        let _ = (rule, label, pos);
    }

    fn result(&mut self, rule: RuleId, matched: bool, pos: usize) {
        let _ = (rule, matched, pos);
    }

    fn action(&mut self, rule: RuleId, shift: u8, ok: bool) {
        let _ = (rule, shift, ok);
    }
}

/// Tracer that does nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Tracer that collects an indented textual trace, for debugging and
/// snapshot tests.
#[derive(Default)]
pub struct PrintTracer {
    lines: Vec<String>,
    depth: usize,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected trace, one event per line.
    pub fn output(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl Tracer for PrintTracer {
    fn enter(&mut self, rule: RuleId, label: Option<&str>, pos: usize) {
        let pad = "  ".repeat(self.depth);
        let line = match label {
            Some(label) => format!("{pad}> {rule} {label} @{pos}"),
            None => format!("{pad}> {rule} @{pos}"),
        };
        self.lines.push(line);
        self.depth += 1;
    }

    fn result(&mut self, rule: RuleId, matched: bool, pos: usize) {
        self.depth = self.depth.saturating_sub(1);
        let pad = "  ".repeat(self.depth);
        let sign = if matched { "ok" } else { "fail" };
        self.lines.push(format!("{pad}< {rule} {sign} @{pos}"));
    }

    fn action(&mut self, rule: RuleId, shift: u8, ok: bool) {
        let pad = "  ".repeat(self.depth);
        self.lines
            .push(format!("{pad}! {rule} shift={shift} -> {ok}"));
    }
}
