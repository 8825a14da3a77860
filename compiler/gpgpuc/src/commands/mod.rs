//! Command implementations for the `gpgpuc` binary.

mod debug;
mod pack;
mod translate;

pub use debug::{lex_file, parse_file};
pub use pack::pack_file;
pub use translate::translate_file;

use crate::DriverError;

pub(crate) fn read_file(path: &str) -> Result<String, DriverError> {
    std::fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_owned(),
        source,
    })
}
