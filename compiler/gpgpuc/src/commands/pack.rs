use super::read_file;
use crate::{pack_arguments, value_from_json, DriverError, KernelManifest};

/// Pack a JSON argument list against a manifest's parameters and print the
/// buffers as hex.
pub fn pack_file(manifest_path: &str, args_path: &str) -> Result<(), DriverError> {
    let manifest = KernelManifest::from_json(&read_file(manifest_path)?)?;
    let args: Vec<serde_json::Value> = serde_json::from_str(&read_file(args_path)?)?;
    let args = args
        .iter()
        .map(value_from_json)
        .collect::<Result<Vec<_>, _>>()?;

    let buffers = pack_arguments(&manifest.params()?, &args)?;
    for (index, buffer) in buffers.iter().enumerate() {
        println!(
            "{index} {} {} ({} bytes) {}",
            buffer.kind,
            buffer.access,
            buffer.bytes.len(),
            buffer.hex()
        );
    }
    Ok(())
}
