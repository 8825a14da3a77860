use super::*;

fn object(name: &str, flags: ObjectFlags) -> TypeInfo {
    TypeInfo::Object(ObjectType {
        name: name.to_owned(),
        flags,
        properties: BTreeMap::from([("x".to_owned(), TypeInfo::Double)]),
    })
}

#[test]
fn scalars_render_by_name() {
    assert_eq!(TypeInfo::INT.c_type().as_deref(), Ok("int"));
    assert_eq!(
        TypeInfo::Scalar(ScalarKind::Ulong).c_type().as_deref(),
        Ok("ulong")
    );
    assert_eq!(TypeInfo::Double.c_type().as_deref(), Ok("double"));
}

#[test]
fn object_rendering_follows_flags() {
    assert_eq!(
        object("GenClass0", ObjectFlags::empty()).c_type().as_deref(),
        Ok("GenClass0")
    );
    assert_eq!(
        object("GenClass0", ObjectFlags::REFERENCE).c_type().as_deref(),
        Ok("GenClass0*")
    );
    assert_eq!(
        object("GenClass0", ObjectFlags::GLOBAL).c_type().as_deref(),
        Ok("GenClass0")
    );
}

#[test]
fn arrays_are_global_pointers() {
    let ty = TypeInfo::array(object("GenClass3", ObjectFlags::FRESH));
    assert_eq!(ty.c_type().as_deref(), Ok("global GenClass3*"));
    assert_eq!(
        TypeInfo::array(TypeInfo::Double).c_type().as_deref(),
        Ok("global double*")
    );
}

#[test]
fn functions_have_no_c_type() {
    assert_eq!(
        TypeInfo::function(TypeInfo::Double).c_type(),
        Err(TypeError::UnrenderableType("function"))
    );
    assert_eq!(
        TypeInfo::GenericFunctionMarker.c_type(),
        Err(TypeError::UnrenderableType("generic function"))
    );
}

#[test]
fn flag_helpers_ignore_non_objects() {
    assert_eq!(
        TypeInfo::Double.without_flags(ObjectFlags::GLOBAL),
        TypeInfo::Double
    );
    let ty = object("A", ObjectFlags::FRESH).without_flags(ObjectFlags::ORPHAN);
    assert!(ty.is_object_with(ObjectFlags::RVALUE));
    assert!(!ty.is_object_with(ObjectFlags::ORPHAN));
}

#[test]
fn display_falls_back_to_kind_name() {
    assert_eq!(TypeInfo::function(TypeInfo::INT).to_string(), "function");
    assert_eq!(object("G", ObjectFlags::REFERENCE).to_string(), "G*");
}
