//! Type model for the gpgpu kernel translator.
//!
//! - [`TypeInfo`]: the closed set of kernel-side types
//! - [`DeclarationTable`]: helper return types, variable scope and struct interning
//! - [`ObjectSerializer`]: host values to types plus little-endian byte payloads
//!
//! The serializer and the struct interner agree on one field order
//! (byte-lexicographic by name), so a packed payload is always a valid
//! instance of the struct generated for the same shape.

mod decl_table;
mod error;
mod flags;
mod interner;
mod serializer;
mod type_info;
mod value;

pub use decl_table::DeclarationTable;
pub use error::TypeError;
pub use flags::ObjectFlags;
pub use interner::SharedStructInterner;
pub use serializer::{is_c_identifier, Chunk, ObjectSerializer, Packed};
pub use type_info::{ObjectType, ScalarKind, TypeInfo};
pub use value::{Shape, Value};
