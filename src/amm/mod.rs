//! AMM program model and text parser.
//!
//! AMM is the mid-level representation the Alan frontend lowers programs to:
//! every expression has already been flattened into named temporaries, every
//! declaration carries its type, and all work happens inside event handlers.
//!
//! # AMM Format
//!
//! ```text
//! const greeting: string = "Hello, World!"
//! event greeted: string
//! on _start fn (): void {
//!   const msg: string = concat(greeting, greeting)
//!   stdoutp(msg)
//!   emit exit 0
//! }
//! ```

pub mod parser;

pub use parser::ParseError;

/// A parsed AMM program. Every list keeps source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub constants: Vec<ConstDecl>,
    pub events: Vec<EventDecl>,
    pub handlers: Vec<Handler>,
}

/// Global constant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    /// Full type name as written, e.g. `int64` or `Array<string>`.
    pub type_name: String,
    pub value: Assignable,
}

/// Event declaration. Has no runtime content in JS.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    pub event: String,
    pub closure: Closure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub args: Args,
    pub return_type: String,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_name: String,
}

/// Argument list of a closure.
///
/// AMM splits parameters into the ones followed by a comma (`ordinary`) and
/// the final one (`trailing`), so `fn (a: int64, b: int64)` has `a` as its
/// only ordinary parameter and `b` as the trailing one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    pub ordinary: Vec<Param>,
    pub trailing: Option<Param>,
}

impl Args {
    /// Parameter names in declaration order, trailing last.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ordinary
            .iter()
            .chain(self.trailing.iter())
            .map(|p| p.name.as_str())
    }

    /// Name a handler binds its event payload to.
    ///
    /// Handlers receive at most one value, taken from the first ordinary
    /// parameter and falling back to the trailing one.
    pub fn event_arg(&self) -> Option<&str> {
        match self.ordinary.first() {
            Some(param) => Some(param.name.as_str()),
            None => self.trailing.as_ref().map(|p| p.name.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
}

impl DeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Const => "const",
            DeclKind::Let => "let",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration {
        kind: DeclKind,
        name: String,
        type_name: String,
        value: Assignable,
    },
    /// Reassignment of an earlier `let`. The type is empty when the source omits it.
    Assignment {
        name: String,
        type_name: String,
        value: Assignable,
    },
    Call(Call),
    Emit {
        event: String,
        value: Option<String>,
    },
    /// Control-flow fragment (`return x`), copied through as written.
    Exit(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assignable {
    Closure(Closure),
    Call(Call),
    Variable(String),
    /// Raw literal token: `5`, `-3`, `1.5`, `"text"`, `true`.
    Literal(String),
}

/// Opcode invocation. Arguments are always plain variable names.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: String,
    pub args: Vec<String>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parser::parse_program(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str) -> Param {
        Param {
            name: name.to_string(),
            type_name: "int64".to_string(),
        }
    }

    #[test]
    fn test_event_arg_prefers_ordinary() {
        let args = Args {
            ordinary: vec![param("a"), param("b")],
            trailing: Some(param("c")),
        };
        assert_eq!(args.event_arg(), Some("a"));
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_event_arg_falls_back_to_trailing() {
        let args = Args {
            ordinary: Vec::new(),
            trailing: Some(param("payload")),
        };
        assert_eq!(args.event_arg(), Some("payload"));
        assert!(Args::default().event_arg().is_none());
    }
}
