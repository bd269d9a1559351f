//! Whole-program assembly.

use std::fmt::Write;

use log::{debug, trace};

use super::JsEmitter;
use crate::amm::{Handler, Program};
use crate::core::{TranslateError, TranslateResult};

/// Listeners the program needs started once `_start` fires.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Listeners {
    http: bool,
    tcp: bool,
}

impl JsEmitter<'_> {
    /// Translate a whole program.
    ///
    /// The output is assembled in a local buffer and only returned once every
    /// handler has been emitted; a control port handler aborts the
    /// translation with nothing returned.
    pub fn emit_program(&mut self, program: &Program) -> TranslateResult<String> {
        let mut out = String::new();

        writeln!(
            out,
            "const {} = require('{}')",
            self.profile.handle, self.profile.runtime_module
        )?;

        for constant in &program.constants {
            trace!("emitting global constant {}", constant.name);
            write!(out, "const {} = ", constant.name)?;
            self.emit_assignable(&mut out, &constant.value, &constant.type_name, "")?;
            out.push('\n');
            self.stats.constants_emitted += 1;
        }

        // Events are bound lazily by the runtime's emitter, nothing to declare.
        self.stats.events_skipped += program.events.len();

        let mut listeners = Listeners::default();
        for handler in &program.handlers {
            self.scan_handler(handler, &mut listeners)?;
            self.emit_handler(&mut out, handler)?;
        }

        if listeners.http {
            writeln!(
                out,
                "{h}.on('{}', () => {h}.{}())",
                self.profile.start_event,
                self.profile.http_listener_op,
                h = self.profile.handle
            )?;
        }
        if listeners.tcp {
            writeln!(
                out,
                "{h}.on('{}', () => {h}.{}())",
                self.profile.start_event,
                self.profile.tcp_listener_op,
                h = self.profile.handle
            )?;
        }
        self.stats.http_listener = listeners.http;
        self.stats.tcp_listener = listeners.tcp;

        writeln!(
            out,
            "{}.emit('{}', undefined)",
            self.profile.handle, self.profile.start_event
        )?;

        debug!(
            "translated {} constants and {} handlers ({} calls, {} awaited)",
            self.stats.constants_emitted,
            self.stats.handlers_emitted,
            self.stats.total_calls(),
            self.stats.suspending_calls
        );
        Ok(out)
    }

    /// Check the handler's event against the reserved names.
    fn scan_handler(&self, handler: &Handler, listeners: &mut Listeners) -> TranslateResult<()> {
        let event = handler.event.as_str();
        if event == self.profile.control_port_event {
            return Err(TranslateError::UnsupportedCapability {
                event: handler.event.clone(),
            });
        }
        if event == self.profile.connection_event {
            listeners.http = true;
        }
        if event == self.profile.tcp_connection_event {
            listeners.tcp = true;
        }
        Ok(())
    }

    fn emit_handler(&mut self, out: &mut String, handler: &Handler) -> TranslateResult<()> {
        let arg = handler.closure.args.event_arg().unwrap_or("");
        debug!(
            "emitting handler for '{}' ({} statements)",
            handler.event,
            handler.closure.body.len()
        );

        writeln!(
            out,
            "{}.on('{}', async ({}) => {{",
            self.profile.handle, handler.event, arg
        )?;
        self.emit_function_body(out, &handler.closure.body, "")?;
        out.push_str("})\n");
        self.stats.handlers_emitted += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::{Args, Assignable, Closure, ConstDecl, EventDecl, Param, Statement};
    use crate::core::RuntimeProfile;

    fn handler(event: &str, arg: Option<&str>, body: Vec<Statement>) -> Handler {
        Handler {
            event: event.to_string(),
            closure: Closure {
                args: Args {
                    ordinary: Vec::new(),
                    trailing: arg.map(|name| Param {
                        name: name.to_string(),
                        type_name: "string".to_string(),
                    }),
                },
                return_type: "void".to_string(),
                body,
            },
        }
    }

    fn emit(program: &Program) -> TranslateResult<String> {
        let profile = RuntimeProfile::default();
        JsEmitter::new(&profile).emit_program(program)
    }

    #[test]
    fn test_empty_program() {
        let out = emit(&Program::new()).unwrap();
        assert_eq!(
            out,
            "const r = require('alan-js-runtime')\nr.emit('_start', undefined)\n"
        );
    }

    #[test]
    fn test_int64_constant() {
        let program = Program {
            constants: vec![ConstDecl {
                name: "x".to_string(),
                type_name: "int64".to_string(),
                value: Assignable::Literal("5".to_string()),
            }],
            ..Program::new()
        };

        let out = emit(&program).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "const x = 5n");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_events_are_skipped() {
        let program = Program {
            events: vec![EventDecl {
                name: "greeted".to_string(),
                type_name: "string".to_string(),
            }],
            ..Program::new()
        };

        let profile = RuntimeProfile::default();
        let mut emitter = JsEmitter::new(&profile);
        let out = emitter.emit_program(&program).unwrap();
        assert!(!out.contains("greeted"));
        assert_eq!(emitter.stats().events_skipped, 1);
    }

    #[test]
    fn test_greet_handler() {
        let program = Program {
            handlers: vec![handler(
                "greet",
                Some("name"),
                vec![Statement::Emit {
                    event: "greeted".to_string(),
                    value: Some("name".to_string()),
                }],
            )],
            ..Program::new()
        };

        let out = emit(&program).unwrap();
        assert_eq!(
            out,
            "const r = require('alan-js-runtime')\n\
             r.on('greet', async (name) => {\n\
             \x20 r.emit('greeted', name)\n\
             })\n\
             r.emit('_start', undefined)\n"
        );
    }

    #[test]
    fn test_handler_arg_prefers_first_ordinary() {
        let mut h = handler("pair", Some("second"), Vec::new());
        h.closure.args.ordinary.push(Param {
            name: "first".to_string(),
            type_name: "int64".to_string(),
        });
        let program = Program {
            handlers: vec![h],
            ..Program::new()
        };

        let out = emit(&program).unwrap();
        assert!(out.contains("r.on('pair', async (first) => {"));
    }

    #[test]
    fn test_control_port_fails() {
        let program = Program {
            handlers: vec![
                handler("_start", None, Vec::new()),
                handler("__ctrl", Some("cmd"), Vec::new()),
                handler("__conn", Some("conn"), Vec::new()),
            ],
            ..Program::new()
        };

        match emit(&program) {
            Err(TranslateError::UnsupportedCapability { event }) => assert_eq!(event, "__ctrl"),
            other => panic!("expected control port failure, got {:?}", other),
        }
    }

    #[test]
    fn test_single_http_listener() {
        let program = Program {
            handlers: vec![
                handler("__conn", Some("conn"), Vec::new()),
                handler("__conn", Some("conn"), Vec::new()),
            ],
            ..Program::new()
        };

        let out = emit(&program).unwrap();
        assert_eq!(out.matches("r.on('__conn'").count(), 2);
        assert_eq!(out.matches("r.httplsn()").count(), 1);
        assert!(!out.contains("r.tcplsn()"));
    }

    #[test]
    fn test_both_listeners_before_start() {
        let program = Program {
            handlers: vec![
                handler("tcpConn", Some("sock"), Vec::new()),
                handler("__conn", Some("conn"), Vec::new()),
            ],
            ..Program::new()
        };

        let profile = RuntimeProfile::default();
        let mut emitter = JsEmitter::new(&profile);
        let out = emitter.emit_program(&program).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        let n = lines.len();

        assert_eq!(lines[n - 3], "r.on('_start', () => r.httplsn())");
        assert_eq!(lines[n - 2], "r.on('_start', () => r.tcplsn())");
        assert_eq!(lines[n - 1], "r.emit('_start', undefined)");
        assert!(emitter.stats().http_listener);
        assert!(emitter.stats().tcp_listener);
    }

    #[test]
    fn test_custom_handle_and_module() {
        let mut profile = RuntimeProfile::default().with_runtime_module("./runtime.js");
        profile.handle = "rt".to_string();

        let program = Program {
            handlers: vec![handler("__conn", Some("conn"), Vec::new())],
            ..Program::new()
        };
        let out = JsEmitter::new(&profile).emit_program(&program).unwrap();

        assert!(out.starts_with("const rt = require('./runtime.js')\n"));
        assert!(out.contains("rt.on('_start', () => rt.httplsn())"));
        assert!(out.ends_with("rt.emit('_start', undefined)\n"));
    }
}
