//! Typed access to environment variables.
//!
//! Single variables are read through the accessor triples in [`accessor`]
//! (`try_get*`, `get*`, `must_get*`), which parse text into strings, integers,
//! floats, booleans, RFC3339 timestamps and compound durations.
//!
//! Whole structs are populated with [`load`]: declare the struct with
//! [`env_struct!`] (or implement [`EnvStruct`] by hand) and every tagged,
//! settable field is read from its variable, falling back to the field's
//! fallback literal when the variable is unset, empty or malformed.
//!
//! [`Loader`] does the same against an explicit [`EnvSource`], such as an
//! in-memory map, instead of the live process environment.

pub mod accessor;
mod env;
mod error;
mod loader;
mod macros;
mod model;
mod parser;

pub use accessor::{
    get, get_bool, get_duration, get_f32, get_f64, get_int, get_string, get_time, must_get,
    must_get_bool, must_get_duration, must_get_f32, must_get_f64, must_get_int,
    must_get_string, must_get_time, try_get, try_get_bool, try_get_duration, try_get_f32,
    try_get_f64, try_get_int, try_get_string, try_get_time,
};
pub use env::EnvSource;
pub use error::{DurationError, Error, ErrorKind, ParseError};
pub use loader::{Loader, load, load_opt};
pub use model::{EnvStruct, Field, LoadReport};
pub use parser::{
    FromEnvStr, parse_bool, parse_duration, parse_rfc3339, parse_signed_duration,
};

#[doc(hidden)]
pub mod __private {
    /// Whether a stringified visibility makes a field externally settable.
    pub fn is_public(vis: &str) -> bool {
        vis == "pub"
    }
}
