pub mod ast;
pub mod error;
pub mod interpreter;
pub mod json;
pub mod normalize;
pub mod parser;

pub use interpreter::{interpret, OutputFormat};
pub use normalize::normalize;

// ── Core API ───────────────────────────────────────────────────────

/// Shown by [`Simulation::display`] when a snippet has no `echo`/`print`.
pub const NO_OUTPUT_NOTICE: &str = "[Simulation only: PHP execution not available here]";

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimOptions {
    pub format: OutputFormat,
}

/// The result of simulating one snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    /// Rendered output of every statement, in source order.
    pub output: String,
    /// Non-blank statements found after normalization.
    pub statements: usize,
    /// How many of those were `echo`/`print` statements.
    pub output_statements: usize,
}

impl Simulation {
    /// Text for an output panel: the rendered output, or
    /// [`NO_OUTPUT_NOTICE`] when nothing in the snippet was an output statement.
    pub fn display(&self) -> &str {
        if self.output_statements == 0 {
            NO_OUTPUT_NOTICE
        } else {
            &self.output
        }
    }
}

/// Normalize, parse and render a snippet. Pure and total: the snippet is
/// never executed and the same input always yields the same result.
pub fn simulate(snippet: &str, options: &SimOptions) -> Simulation {
    let normalized = normalize(snippet);
    let statements = parser::parse(&normalized);
    Simulation {
        output: interpreter::execute(&statements, options.format),
        statements: statements.len(),
        output_statements: statements.iter().filter(|s| s.is_output()).count(),
    }
}

// ── WASM FFI ────────────────────────────────────────────────────────

/// Allocate `len` bytes in WASM memory, returning a pointer.
/// The caller must free the returned pointer with `dealloc(ptr, len)`.
/// Returns null if `len` cannot describe a valid allocation.
#[no_mangle]
pub extern "C" fn alloc(len: usize) -> *mut u8 {
    match std::alloc::Layout::from_size_align(len.max(1), 1) {
        Ok(layout) => unsafe { std::alloc::alloc(layout) },
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a buffer previously returned by `alloc` or by any of the
/// `wasm_*` functions. For null-terminated strings returned by those
/// functions, pass `strlen(ptr) + 1` as `len`.
#[no_mangle]
pub unsafe extern "C" fn dealloc(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    if let Ok(layout) = std::alloc::Layout::from_size_align(len.max(1), 1) {
        unsafe { std::alloc::dealloc(ptr, layout) };
    }
}

/// Read a caller-provided buffer as text. Invalid UTF-8 is replaced rather
/// than rejected, since the simulator accepts any text.
unsafe fn input_from_raw(ptr: *const u8, len: usize) -> String {
    if ptr.is_null() || len == 0 {
        return String::new();
    }
    let slice = unsafe { std::slice::from_raw_parts(ptr, len) };
    String::from_utf8_lossy(slice).into_owned()
}

fn options_for(html: bool) -> SimOptions {
    SimOptions {
        format: if html {
            OutputFormat::Html
        } else {
            OutputFormat::Text
        },
    }
}

/// Simulate a snippet without a session.
/// Returns a pointer to a null-terminated JSON simulation result.
#[no_mangle]
pub unsafe extern "C" fn wasm_simulate(src_ptr: *const u8, src_len: usize, html: bool) -> *const u8 {
    let input = unsafe { input_from_raw(src_ptr, src_len) };
    let result = simulate(&input, &options_for(html));
    string_to_c_ptr(json::simulation_to_json(&result))
}

// ── Session-based WASM FFI ──────────────────────────────────────────

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Editor-side state for one live code box: the snippet being edited and
/// the last result shown. The simulator itself keeps nothing between runs.
struct Session {
    source: String,
    options: SimOptions,
    last: Option<Simulation>,
}

// WASM is single-threaded, so thread_local is just a convenient safe wrapper.
thread_local! {
    static SESSIONS: RefCell<HashMap<u32, Session>> = RefCell::new(HashMap::new());
    static NEXT_SESSION_ID: Cell<u32> = const { Cell::new(1) };
}

fn with_sessions<R>(f: impl FnOnce(&mut HashMap<u32, Session>) -> R) -> R {
    SESSIONS.with(|s| f(&mut s.borrow_mut()))
}

fn next_id() -> u32 {
    NEXT_SESSION_ID.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    })
}

/// Create a new session with an empty snippet and no output. Returns a session ID.
#[no_mangle]
pub extern "C" fn wasm_session_new() -> u32 {
    let id = next_id();
    with_sessions(|s| {
        s.insert(
            id,
            Session {
                source: String::new(),
                options: SimOptions::default(),
                last: None,
            },
        )
    });
    id
}

/// Replace the session's snippet. Does not run it; the last output is kept
/// until the next `wasm_session_run` or `wasm_session_clear`.
#[no_mangle]
pub unsafe extern "C" fn wasm_session_set_source(id: u32, src_ptr: *const u8, src_len: usize) {
    let input = unsafe { input_from_raw(src_ptr, src_len) };
    with_sessions(|s| {
        if let Some(session) = s.get_mut(&id) {
            session.source = input;
        }
    });
}

/// Choose markup-safe HTML output (`true`) or plain text (`false`).
#[no_mangle]
pub extern "C" fn wasm_session_set_html(id: u32, html: bool) {
    with_sessions(|s| {
        if let Some(session) = s.get_mut(&id) {
            session.options = options_for(html);
        }
    });
}

/// Simulate the session's current snippet and remember the result.
/// Returns a pointer to a null-terminated JSON simulation result,
/// or `{}` for an unknown session.
#[no_mangle]
pub extern "C" fn wasm_session_run(id: u32) -> *const u8 {
    with_sessions(|s| match s.get_mut(&id) {
        Some(session) => {
            let result = simulate(&session.source, &session.options);
            let json_str = json::simulation_to_json(&result);
            session.last = Some(result);
            string_to_c_ptr(json_str)
        }
        None => string_to_c_ptr("{}".to_string()),
    })
}

/// Forget the last result. The snippet is left untouched.
#[no_mangle]
pub extern "C" fn wasm_session_clear(id: u32) {
    with_sessions(|s| {
        if let Some(session) = s.get_mut(&id) {
            session.last = None;
        }
    });
}

/// The last result as a null-terminated JSON string, or `{}` if the session
/// has not been run since it was created or cleared.
#[no_mangle]
pub extern "C" fn wasm_session_get_output(id: u32) -> *const u8 {
    with_sessions(|s| match s.get(&id).and_then(|session| session.last.as_ref()) {
        Some(result) => string_to_c_ptr(json::simulation_to_json(result)),
        None => string_to_c_ptr("{}".to_string()),
    })
}

/// Free a session, dropping its snippet and output.
#[no_mangle]
pub extern "C" fn wasm_session_free(id: u32) {
    with_sessions(|s| s.remove(&id));
}

/// Convert a String to a null-terminated C pointer with exact allocation size.
/// The allocation size is exactly `s.len() + 1` bytes, so the caller can
/// free with `dealloc(ptr, strlen(ptr) + 1)`.
fn string_to_c_ptr(s: String) -> *const u8 {
    let mut bytes = s.into_bytes();
    bytes.push(0);
    // into_boxed_slice guarantees allocation size == bytes.len()
    let boxed = bytes.into_boxed_slice();
    Box::into_raw(boxed) as *mut u8
}

#[cfg(test)]
mod tests;
