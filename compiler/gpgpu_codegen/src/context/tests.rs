use super::*;
use gpgpu_types::{ObjectFlags, ObjectType};
use pretty_assertions::assert_eq;

fn point() -> TypeInfo {
    TypeInfo::Object(ObjectType {
        name: "GenClass0".into(),
        flags: ObjectFlags::FRESH,
        properties: [("x".to_owned(), TypeInfo::Double)].into_iter().collect(),
    })
}

#[test]
fn temp_names_are_unique_across_contexts() {
    let names = TempNames::new();
    let mut first = ExpressionContext::new(&names);
    let mut second = ExpressionContext::new(&names);
    assert_eq!(first.declare_temp(TypeInfo::Double, None), "___builtin_temp_0");
    assert_eq!(second.declare_temp(TypeInfo::Double, None), "___builtin_temp_1");
    assert_eq!(first.declare_temp(TypeInfo::Double, None), "___builtin_temp_2");
}

#[test]
fn render_declares_temporaries_in_order() {
    let names = TempNames::new();
    let mut ctx = ExpressionContext::new(&names);
    assert_eq!(ctx.render(), Ok(String::new()));
    ctx.declare_temp(point(), Some("(GenClass0){ .x = 1 }".into()));
    ctx.declare_temp(TypeInfo::INT, None);
    assert_eq!(
        ctx.render(),
        Ok("GenClass0 ___builtin_temp_0 = (GenClass0){ .x = 1 };\nint ___builtin_temp_1;\n".into())
    );
}

#[test]
fn unrenderable_temporary_is_an_error() {
    let names = TempNames::new();
    let mut ctx = ExpressionContext::new(&names);
    ctx.declare_temp(TypeInfo::function(TypeInfo::Double), None);
    assert_eq!(ctx.render(), Err(TypeError::UnrenderableType("function")));
}
