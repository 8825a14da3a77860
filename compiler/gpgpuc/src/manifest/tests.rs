use super::*;
use pretty_assertions::assert_eq;

const MANIFEST: &str = r#"{
    "entry": {
        "source": "function (a, xs, out) { out[0] = a.x; }",
        "params": [
            { "type": "Object", "readWrite": "read", "shapeObj": { "x": 0 } },
            { "type": "Object[]", "readWrite": "read", "shapeObj": [{ "y": true }] },
            { "type": "Float32Array", "readWrite": "write", "shapeObj": { "ignored": 1 } }
        ]
    },
    "functions": [
        { "source": "twice(v) { return v * 2; }", "returnObj": 0, "shapeObj": [null] }
    ]
}"#;

#[test]
fn descriptor_from_manifest() {
    let manifest = KernelManifest::from_json(MANIFEST).unwrap();
    let descriptor = manifest.descriptor().unwrap();

    assert_eq!(
        descriptor.params,
        vec![
            KernelParam::new(ParamKind::Object, AccessMode::Read),
            KernelParam::new(ParamKind::ObjectArray, AccessMode::Read),
            KernelParam::new(ParamKind::Float32Array, AccessMode::Write),
        ]
    );
    assert_eq!(
        descriptor.shapes,
        vec![
            Value::object([("x", Value::Number(0.0))]),
            Value::Array(vec![Value::object([("y", Value::Bool(true))])]),
        ]
    );

    let helper = &descriptor.helpers[0];
    assert_eq!(helper.name, None);
    assert_eq!(helper.return_shape, Some(Value::Number(0.0)));
    assert_eq!(helper.param_shapes, Some(vec![Value::Null]));
}

#[test]
fn access_defaults_to_readwrite() {
    let manifest = KernelManifest::from_json(
        r#"{ "entry": { "source": "function (o) {}", "params": [{ "type": "Float64Array" }] } }"#,
    )
    .unwrap();
    assert_eq!(
        manifest.params().unwrap(),
        vec![KernelParam::new(ParamKind::Float64Array, AccessMode::ReadWrite)]
    );
    assert!(manifest.functions.is_empty());
}

#[test]
fn unknown_kinds_and_modes() {
    let manifest = KernelManifest::from_json(
        r#"{ "entry": { "source": "", "params": [{ "type": "Int8Array" }] } }"#,
    )
    .unwrap();
    assert!(matches!(
        manifest.params(),
        Err(DriverError::UnknownParamKind(kind)) if kind == "Int8Array"
    ));

    let manifest = KernelManifest::from_json(
        r#"{ "entry": { "source": "", "params": [{ "type": "Object", "readWrite": "rw" }] } }"#,
    )
    .unwrap();
    assert!(matches!(
        manifest.descriptor(),
        Err(DriverError::UnknownAccessMode(mode)) if mode == "rw"
    ));

    assert!(matches!(
        KernelManifest::from_json(r#"{ "functions": [] }"#),
        Err(DriverError::Json(_))
    ));
}

#[test]
fn typed_array_tags() {
    let json: Json = serde_json::from_str(r#"{ "$float32": [1, 2.5] }"#).unwrap();
    assert_eq!(
        value_from_json(&json).unwrap(),
        Value::Float32Array(vec![1.0, 2.5])
    );

    let json: Json = serde_json::from_str(r#"{ "$float64": [] }"#).unwrap();
    assert_eq!(value_from_json(&json).unwrap(), Value::Float64Array(vec![]));

    let json: Json = serde_json::from_str(r#"{ "$float64": [1, "two"] }"#).unwrap();
    assert!(matches!(
        value_from_json(&json),
        Err(DriverError::MalformedTypedArray { tag: "$float64" })
    ));

    // A tag next to other keys is an ordinary field.
    let json: Json = serde_json::from_str(r#"{ "$float32": 1, "b": null }"#).unwrap();
    assert_eq!(
        value_from_json(&json).unwrap(),
        Value::object([("$float32", Value::Number(1.0)), ("b", Value::Null)])
    );
}

#[test]
fn plain_values() {
    let json: Json = serde_json::from_str(r#"[true, null, "s", { "n": -1 }]"#).unwrap();
    assert_eq!(
        value_from_json(&json).unwrap(),
        Value::Array(vec![
            Value::Bool(true),
            Value::Null,
            Value::String("s".into()),
            Value::object([("n", Value::Number(-1.0))]),
        ])
    );
}

#[test]
fn object_keys_keep_document_order() {
    let json: Json = serde_json::from_str(r#"{ "z": 1, "a": { "y": 2, "b": 3 } }"#).unwrap();
    assert_eq!(
        value_from_json(&json).unwrap(),
        Value::object([
            ("z", Value::Number(1.0)),
            (
                "a",
                Value::object([("y", Value::Number(2.0)), ("b", Value::Number(3.0))])
            ),
        ])
    );
}

#[test]
fn object_param_without_shape_is_named() {
    let manifest = KernelManifest::from_json(
        r#"{ "entry": { "source": "function (a, b) {}", "params": [
            { "type": "Object" },
            { "type": "Object[]", "shapeObj": [{ "x": 1 }] }
        ] } }"#,
    )
    .unwrap();
    let err = manifest.descriptor().unwrap_err();
    assert!(matches!(
        err,
        DriverError::MissingShape { index: 0, kind: ParamKind::Object }
    ));
    assert_eq!(err.to_string(), "parameter 0 (Object) has no shapeObj");

    // Typed arrays never need one.
    let manifest = KernelManifest::from_json(
        r#"{ "entry": { "source": "function (o) {}", "params": [{ "type": "Float32Array" }] } }"#,
    )
    .unwrap();
    assert_eq!(manifest.descriptor().unwrap().shapes, vec![]);
}
