// This module tracks what a single translation produced. TranslationStats counts the
// global constants and handlers emitted, the statements and nested closures inside
// handler bodies, suspending versus plain opcode calls, literals that were widened to
// BigInt, skipped event declarations, and which listeners were started. The program
// assembler fills one in as it walks the IR and logs it at debug level once the output
// is complete; translate_with_stats hands it back to callers such as the CLI --stats
// flag.

//! Per-translation statistics.

use std::collections::HashMap;
use std::fmt;

/// Translation statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslationStats {
    pub constants_emitted: usize,
    pub events_skipped: usize,
    pub handlers_emitted: usize,
    pub statements_emitted: usize,
    pub closures_emitted: usize,
    /// Calls emitted with `await`.
    pub suspending_calls: usize,
    pub plain_calls: usize,
    /// Integer literals emitted with the BigInt suffix.
    pub bigint_literals: usize,
    pub http_listener: bool,
    pub tcp_listener: bool,
    /// Count of each opcode called.
    pub opcode_counts: HashMap<String, usize>,
}

impl TranslationStats {
    pub fn record_call(&mut self, op: &str, suspending: bool) {
        if suspending {
            self.suspending_calls += 1;
        } else {
            self.plain_calls += 1;
        }
        *self.opcode_counts.entry(op.to_string()).or_insert(0) += 1;
    }

    pub fn total_calls(&self) -> usize {
        self.suspending_calls + self.plain_calls
    }
}

impl fmt::Display for TranslationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Translation Statistics:")?;
        writeln!(f, "  Constants emitted: {}", self.constants_emitted)?;
        writeln!(f, "  Event declarations skipped: {}", self.events_skipped)?;
        writeln!(f, "  Handlers emitted: {}", self.handlers_emitted)?;
        writeln!(f, "  Statements emitted: {}", self.statements_emitted)?;
        writeln!(f, "  Closures emitted: {}", self.closures_emitted)?;
        writeln!(
            f,
            "  Calls: {} ({} awaited)",
            self.total_calls(),
            self.suspending_calls
        )?;
        writeln!(f, "  BigInt literals: {}", self.bigint_literals)?;

        let mut listeners = Vec::new();
        if self.http_listener {
            listeners.push("http");
        }
        if self.tcp_listener {
            listeners.push("tcp");
        }
        if !listeners.is_empty() {
            writeln!(f, "  Listeners: {}", listeners.join(", "))?;
        }

        if !self.opcode_counts.is_empty() {
            writeln!(f, "  Opcode breakdown:")?;
            let mut sorted: Vec<_> = self.opcode_counts.iter().collect();
            sorted.sort_by(|(a_op, a), (b_op, b)| b.cmp(a).then_with(|| a_op.cmp(b_op)));

            for (op, count) in sorted.into_iter().take(10) {
                writeln!(f, "    {}: {}", op, count)?;
            }
        }

        Ok(())
    }
}
