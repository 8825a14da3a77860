use gpgpu_codegen::translate_function;

use super::read_file;
use crate::{DriverError, KernelManifest};

/// Translate a manifest, writing the kernel source to `output` or stdout.
pub fn translate_file(path: &str, output: Option<&str>) -> Result<(), DriverError> {
    let manifest = KernelManifest::from_json(&read_file(path)?)?;
    let artifact = translate_function(&manifest.descriptor()?)?;

    match output {
        Some(out) => std::fs::write(out, &artifact.source).map_err(|source| DriverError::Write {
            path: out.to_owned(),
            source,
        }),
        None => {
            println!("{}", artifact.source);
            Ok(())
        }
    }
}
