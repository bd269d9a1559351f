// This module describes the runtime surface the generated JavaScript targets. A
// RuntimeProfile is an injected, read-only capability object: it names the runtime
// module and the handle the output binds it to, lists the opcodes that return promises
// (the suspending-opcode registry consulted by the call emitter), and carries the
// reserved event names the program assembler matches on. The default profile describes
// alan-js-runtime. Swapping the profile retargets the translator to another runtime
// without touching the emitters.

//! Runtime profile: suspending opcodes and reserved event names.

use hashbrown::HashSet;

/// Opcodes `alan-js-runtime` implements as async functions.
pub const ALAN_ASYNC_OPCODES: &[&str] = &[
    // control flow over closures
    "each", "eachl", "map", "mapl", "reducel", "filter", "filterl", "find", "findl",
    "every", "everyl", "some", "somel", "condfn", "seqeach", "seqwhile", "seqdo",
    "selfrec", "seqrec",
    // process and timers
    "waitop", "execop",
    // datastore
    "dssetf", "dssetv", "dshas", "dsdel", "dsgetf", "dsgetv", "dsrrun", "dsmrun",
    "dsrwith", "dsmwith", "dsmonly", "dswonly", "dsrclos", "dsmclos",
    // http
    "httpreq", "httpget", "httppost", "httplsn", "httpsend",
    // tcp
    "tcpconn", "tcpAddC", "tcpReady", "tcpRead", "tcpWrite", "tcpTerm", "tcplsn", "tcptun",
];

/// Description of the runtime the generated code runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeProfile {
    /// Module passed to `require`.
    pub runtime_module: String,
    /// Name the runtime object is bound to in the output.
    pub handle: String,
    /// Lifecycle event emitted once every handler is registered.
    pub start_event: String,
    /// Handlers on this event need the control port, which JS cannot offer.
    pub control_port_event: String,
    /// Handlers on this event need the HTTP listener started.
    pub connection_event: String,
    /// Handlers on this event need the TCP listener started.
    pub tcp_connection_event: String,
    pub http_listener_op: String,
    pub tcp_listener_op: String,
    /// Type label whose integer literals are emitted as BigInt.
    pub int64_type: String,
    pub bigint_suffix: String,
    suspending: HashSet<String>,
}

impl RuntimeProfile {
    /// Profile for `alan-js-runtime`.
    pub fn alan() -> Self {
        Self {
            runtime_module: "alan-js-runtime".to_string(),
            handle: "r".to_string(),
            start_event: "_start".to_string(),
            control_port_event: "__ctrl".to_string(),
            connection_event: "__conn".to_string(),
            tcp_connection_event: "tcpConn".to_string(),
            http_listener_op: "httplsn".to_string(),
            tcp_listener_op: "tcplsn".to_string(),
            int64_type: "int64".to_string(),
            bigint_suffix: "n".to_string(),
            suspending: ALAN_ASYNC_OPCODES.iter().map(|op| op.to_string()).collect(),
        }
    }

    /// Whether calls to `op` must be awaited.
    pub fn is_suspending(&self, op: &str) -> bool {
        self.suspending.contains(op)
    }

    /// Suspending opcodes in sorted order.
    pub fn suspending_opcodes(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.suspending.iter().map(String::as_str).collect();
        ops.sort_unstable();
        ops
    }

    pub fn with_runtime_module(mut self, module: impl Into<String>) -> Self {
        self.runtime_module = module.into();
        self
    }

    pub fn with_suspending_opcode(mut self, op: impl Into<String>) -> Self {
        self.suspending.insert(op.into());
        self
    }

    pub fn with_suspending_opcodes<I, S>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suspending.extend(ops.into_iter().map(Into::into));
        self
    }

    /// Drop every registered suspending opcode.
    pub fn without_suspending_opcodes(mut self) -> Self {
        self.suspending.clear();
        self
    }
}

impl Default for RuntimeProfile {
    fn default() -> Self {
        Self::alan()
    }
}

/// Parse an opcode list: one name per line, blank lines and `#` comments ignored.
pub fn parse_opcode_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
