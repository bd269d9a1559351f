//! Statement list emission for handler and closure bodies.

use std::fmt::Write;

use super::{JsEmitter, INDENT};
use crate::amm::Statement;
use crate::core::TranslateResult;

impl JsEmitter<'_> {
    /// Write each statement on its own line at `indent` plus one level.
    ///
    /// Lines are appended to `out` as they are produced; callers that need
    /// all-or-nothing output render into a scratch buffer first.
    pub fn emit_function_body(
        &mut self,
        out: &mut String,
        body: &[Statement],
        indent: &str,
    ) -> TranslateResult<()> {
        for statement in body {
            out.push_str(indent);
            out.push_str(INDENT);
            self.emit_statement(out, statement, indent)?;
            out.push('\n');
            self.stats.statements_emitted += 1;
        }
        Ok(())
    }

    fn emit_statement(
        &mut self,
        out: &mut String,
        statement: &Statement,
        indent: &str,
    ) -> TranslateResult<()> {
        match statement {
            Statement::Declaration {
                kind,
                name,
                type_name,
                value,
            } => {
                write!(out, "{} {} = ", kind.keyword(), name)?;
                self.emit_assignable(out, value, type_name, indent)
            }
            Statement::Assignment {
                name,
                type_name,
                value,
            } => {
                write!(out, "{} = ", name)?;
                self.emit_assignable(out, value, type_name, indent)
            }
            Statement::Call(call) => self.emit_call(out, call),
            Statement::Emit { event, value } => {
                write!(
                    out,
                    "{}.emit('{}', {})",
                    self.profile.handle,
                    event,
                    value.as_deref().unwrap_or("undefined")
                )?;
                Ok(())
            }
            Statement::Exit(fragment) => {
                out.push_str(fragment.trim());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::{Assignable, Call, DeclKind};
    use crate::core::RuntimeProfile;

    fn render(body: &[Statement], indent: &str) -> String {
        let profile = RuntimeProfile::default();
        let mut emitter = JsEmitter::new(&profile);
        let mut out = String::new();
        emitter.emit_function_body(&mut out, body, indent).unwrap();
        out
    }

    fn declaration(kind: DeclKind, name: &str, type_name: &str, value: Assignable) -> Statement {
        Statement::Declaration {
            kind,
            name: name.to_string(),
            type_name: type_name.to_string(),
            value,
        }
    }

    #[test]
    fn test_declarations() {
        let body = vec![
            declaration(
                DeclKind::Const,
                "a",
                "int64",
                Assignable::Literal("1".to_string()),
            ),
            declaration(
                DeclKind::Let,
                "b",
                "string",
                Assignable::Literal("\"x\"".to_string()),
            ),
        ];

        assert_eq!(render(&body, ""), "  const a = 1n\n  let b = \"x\"\n");
    }

    #[test]
    fn test_assignment_has_no_keyword() {
        let body = vec![Statement::Assignment {
            name: "b".to_string(),
            type_name: "int64".to_string(),
            value: Assignable::Call(Call {
                op: "addi64".to_string(),
                args: vec!["b".to_string(), "one".to_string()],
            }),
        }];

        assert_eq!(render(&body, ""), "  b = r.addi64(b, one)\n");
    }

    #[test]
    fn test_call_statement_discards_result() {
        let body = vec![Statement::Call(Call {
            op: "waitop".to_string(),
            args: vec!["ms".to_string()],
        })];

        assert_eq!(render(&body, "  "), "    await r.waitop(ms)\n");
    }

    #[test]
    fn test_emits() {
        let body = vec![
            Statement::Emit {
                event: "greeted".to_string(),
                value: Some("name".to_string()),
            },
            Statement::Emit {
                event: "done".to_string(),
                value: None,
            },
        ];

        assert_eq!(
            render(&body, ""),
            "  r.emit('greeted', name)\n  r.emit('done', undefined)\n"
        );
    }

    #[test]
    fn test_exit_is_trimmed_verbatim() {
        let body = vec![Statement::Exit("  return out \n".to_string())];
        assert_eq!(render(&body, ""), "  return out\n");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(render(&[], "    "), "");
    }

    #[test]
    fn test_statement_count() {
        let profile = RuntimeProfile::default();
        let mut emitter = JsEmitter::new(&profile);
        let mut out = String::new();
        let body = vec![
            Statement::Exit("return".to_string()),
            Statement::Exit("return".to_string()),
        ];
        emitter.emit_function_body(&mut out, &body, "").unwrap();
        assert_eq!(emitter.stats().statements_emitted, 2);
    }
}
