//! Opcode call emission.

use std::fmt::Write;

use super::JsEmitter;
use crate::amm::Call;
use crate::core::TranslateResult;

impl JsEmitter<'_> {
    /// Write `r.<op>(<args>)`, prefixed with `await ` when the opcode suspends.
    ///
    /// Every call site sits inside an async handler or closure, so the
    /// `await` is always legal.
    pub fn emit_call(&mut self, out: &mut String, call: &Call) -> TranslateResult<()> {
        let suspending = self.profile.is_suspending(&call.op);
        self.stats.record_call(&call.op, suspending);

        if suspending {
            out.push_str("await ");
        }
        write!(
            out,
            "{}.{}({})",
            self.profile.handle,
            call.op,
            call.args.join(", ")
        )?;
        Ok(())
    }
}
