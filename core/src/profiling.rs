//! Optional Tracy instrumentation.
//!
//! Enable the `profiling` feature to record loader spans in the
//! [Tracy profiler](https://github.com/wolfpld/tracy):
//!
//! ```toml
//! [dependencies]
//! wfobj-core = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! The parser opens one span per pass and plots the number of emitted
//! triangles. Without the feature every macro expands to nothing.
//!
//! ```ignore
//! use wfobj_core::profiling::{profile_function, profile_scope};
//!
//! fn load_level() {
//!     profile_function!();
//!     {
//!         profile_scope!("parse_props");
//!         // ...
//!     }
//! }
//! ```

#[cfg(feature = "profiling")]
pub use tracy_client::{self, Client, plot as tracy_plot, span};

/// Start the Tracy client. Call once, before any instrumented code runs.
#[cfg(feature = "profiling")]
pub fn start_profiling() {
    Client::start();
}

/// Start the Tracy client (no-op when profiling disabled).
#[cfg(not(feature = "profiling"))]
pub fn start_profiling() {}

/// Open a named span that closes at the end of the enclosing scope.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Open a named span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Open a span named after the enclosing function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Open a function span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Plot a numeric value.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value;
    };
}

pub use profile_function;
pub use profile_plot;
pub use profile_scope;
