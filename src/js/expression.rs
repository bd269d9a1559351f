//! Assignable (right-hand side) emission.

use std::fmt::Write;

use super::{JsEmitter, INDENT};
use crate::amm::{Assignable, Closure};
use crate::core::TranslateResult;

impl JsEmitter<'_> {
    /// Write the JavaScript for `value`, declared with `type_name`.
    ///
    /// `indent` is the indentation of the line the value appears on; closure
    /// bodies are rendered one level deeper.
    pub fn emit_assignable(
        &mut self,
        out: &mut String,
        value: &Assignable,
        type_name: &str,
        indent: &str,
    ) -> TranslateResult<()> {
        match value {
            Assignable::Closure(closure) => self.emit_closure(out, closure, indent),
            Assignable::Call(call) => self.emit_call(out, call),
            Assignable::Variable(name) => {
                out.push_str(name);
                Ok(())
            }
            Assignable::Literal(token) => {
                out.push_str(token);
                if self.wants_bigint(token, type_name) {
                    out.push_str(&self.profile.bigint_suffix);
                    self.stats.bigint_literals += 1;
                }
                Ok(())
            }
        }
    }

    fn emit_closure(
        &mut self,
        out: &mut String,
        closure: &Closure,
        indent: &str,
    ) -> TranslateResult<()> {
        self.stats.closures_emitted += 1;

        let names: Vec<&str> = closure.args.names().collect();
        writeln!(out, "async ({}) => {{", names.join(", "))?;

        let inner = format!("{}{}", indent, INDENT);
        self.emit_function_body(out, &closure.body, &inner)?;
        write!(out, "{}}}", inner)?;
        Ok(())
    }

    /// Integer literals of the 64-bit type become BigInt literals.
    fn wants_bigint(&self, token: &str, type_name: &str) -> bool {
        if token.contains('"') || token == "true" || token == "false" || token.contains('.') {
            return false;
        }
        // Tokens that are not plain integers silently keep their text.
        is_decimal_integer(token) && type_name.trim() == self.profile.int64_type
    }
}

/// Whether `token` is a base-10 integer: an optional `-` followed by digits.
pub fn is_decimal_integer(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
