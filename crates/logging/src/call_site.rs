//! crates/logging/src/call_site.rs
//! Source location captured for each record.

use std::fmt;

/// Placeholder used when the enclosing function cannot be determined.
pub const UNKNOWN_FUNCTION: &str = "?";

/// File, line and enclosing function of a logging call.
///
/// Usually produced by the [`call_site!`](crate::call_site) macro, which the
/// severity macros invoke implicitly. Callers that forward records from
/// elsewhere (for example a tracing bridge) construct one explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    function: &'static str,
}

impl CallSite {
    /// Creates a call site from its parts.
    #[must_use]
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Captures the caller's file and line.
    ///
    /// The enclosing function is not available through `#[track_caller]`, so
    /// it is reported as [`UNKNOWN_FUNCTION`]. Prefer the
    /// [`call_site!`](crate::call_site) macro where the function name matters.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line(), UNKNOWN_FUNCTION)
    }

    /// Source file path as reported by `file!()`.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// One-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Name of the enclosing function, without its module path.
    #[must_use]
    pub const fn function(&self) -> &'static str {
        self.function
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}()", self.file, self.line, self.function)
    }
}

/// Extracts the enclosing function name from the type name of a probe item.
///
/// The [`call_site!`](crate::call_site) macro declares a local `fn __probe()`
/// and passes its type name, which looks like
/// `crate::module::function::{{closure}}::__probe`. Closure segments are
/// skipped so records emitted from closures name the function that defines
/// them.
///
/// # Examples
///
/// ```
/// use logging::enclosing_function;
///
/// assert_eq!(enclosing_function("app::net::serve::__probe"), "serve");
/// assert_eq!(enclosing_function("app::main::{{closure}}::__probe"), "main");
/// ```
#[must_use]
pub fn enclosing_function(probe_type_name: &'static str) -> &'static str {
    let mut path = probe_type_name
        .strip_suffix("::__probe")
        .unwrap_or(probe_type_name);
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }

    let name = match path.rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    };

    if name.is_empty() {
        UNKNOWN_FUNCTION
    } else {
        name
    }
}
