//! Driver for the gpgpu kernel translator.
//!
//! Loads JSON kernel manifests, translates them, packs call arguments and
//! hands both to a [`KernelRuntime`]. The `gpgpuc` binary exposes the same
//! steps on the command line.

pub mod commands;
mod error;
mod manifest;
mod pack;
mod runtime;

use std::sync::Once;

pub use error::DriverError;
pub use manifest::{
    value_from_json, EntryManifest, FunctionManifest, KernelManifest, ParamManifest,
};
pub use pack::{pack_arguments, ArgBuffer};
pub use runtime::{Gpgpu, Kernel, KernelRuntime};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
