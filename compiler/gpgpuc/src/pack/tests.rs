use super::*;
use pretty_assertions::assert_eq;

fn params(kinds: &[ParamKind]) -> Vec<KernelParam> {
    kinds
        .iter()
        .map(|&kind| KernelParam::new(kind, AccessMode::ReadWrite))
        .collect()
}

#[test]
fn typed_arrays_are_little_endian() {
    let buffers = pack_arguments(
        &params(&[ParamKind::Float32Array, ParamKind::Float64Array]),
        &[
            Value::Float32Array(vec![1.0, -2.0]),
            Value::Float64Array(vec![0.5]),
        ],
    )
    .unwrap();

    let mut expected = 1.0f32.to_le_bytes().to_vec();
    expected.extend_from_slice(&(-2.0f32).to_le_bytes());
    assert_eq!(buffers[0].bytes, expected);
    assert_eq!(buffers[1].bytes, 0.5f64.to_le_bytes().to_vec());
    assert_eq!(buffers[1].kind, ParamKind::Float64Array);
}

#[test]
fn objects_pack_in_field_order() {
    let point = Value::object([("y", Value::Number(2.0)), ("x", Value::Number(1.0))]);
    let buffers = pack_arguments(&params(&[ParamKind::Object]), &[point]).unwrap();

    let mut expected = 1.0f64.to_le_bytes().to_vec();
    expected.extend_from_slice(&2.0f64.to_le_bytes());
    assert_eq!(buffers[0].bytes, expected);
}

#[test]
fn object_arrays_pack_every_element() {
    let items = Value::Array(vec![
        Value::object([("on", Value::Bool(true))]),
        Value::object([("on", Value::Bool(false))]),
    ]);
    let buffers = pack_arguments(&params(&[ParamKind::ObjectArray]), &[items]).unwrap();
    assert_eq!(buffers[0].bytes, vec![1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(buffers[0].hex(), "0100000000000000");
}

#[test]
fn argument_errors() {
    assert!(matches!(
        pack_arguments(&params(&[ParamKind::Object]), &[]),
        Err(DriverError::ArgumentCount {
            expected: 1,
            found: 0
        })
    ));
    assert!(matches!(
        pack_arguments(&params(&[ParamKind::ObjectArray]), &[Value::Number(1.0)]),
        Err(DriverError::ObjectArrayExpected {
            index: 0,
            found: "number"
        })
    ));
    assert!(matches!(
        pack_arguments(
            &params(&[ParamKind::Float32Array, ParamKind::Float32Array]),
            &[Value::Float32Array(vec![]), Value::Float64Array(vec![])]
        ),
        Err(DriverError::ArgumentKindMismatch {
            index: 1,
            expected: ParamKind::Float32Array,
            found: "Float64Array"
        })
    ));
    assert!(matches!(
        pack_arguments(
            &params(&[ParamKind::Object]),
            &[Value::object([("s", Value::String("no".into()))])]
        ),
        Err(DriverError::Type(_))
    ));
}
