use super::*;
use pretty_assertions::assert_eq;

fn sig(fields: &[(&str, &str)]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(ty, name)| ((*ty).to_owned(), (*name).to_owned()))
        .collect()
}

#[test]
fn field_order_does_not_matter() {
    let interner = SharedStructInterner::new();
    let a = interner.intern(sig(&[("double", "y"), ("int", "x")]));
    let b = interner.intern(sig(&[("int", "x"), ("double", "y")]));
    assert_eq!(a, "GenClass0");
    assert_eq!(a, b);
    assert_eq!(interner.count(), 1);
}

#[test]
fn different_field_types_get_new_names() {
    let interner = SharedStructInterner::new();
    let a = interner.intern(sig(&[("double", "x")]));
    let b = interner.intern(sig(&[("int", "x")]));
    let c = interner.intern(sig(&[("double", "z")]));
    assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("GenClass0", "GenClass1", "GenClass2"));
}

#[test]
fn definitions_render_sorted_bodies() {
    let interner = SharedStructInterner::new();
    interner.intern(sig(&[("double", "x")]));
    interner.intern(sig(&[("GenClass0", "b"), ("int", "a")]));
    assert_eq!(
        interner.definitions(|_| true),
        "typedef struct {double x;} GenClass0;\n\ntypedef struct {int a;\nGenClass0 b;} GenClass1;"
    );
    assert_eq!(
        interner.definitions(|name| name == "GenClass1"),
        "typedef struct {int a;\nGenClass0 b;} GenClass1;"
    );
}

#[test]
fn clones_share_one_table() {
    let first = SharedStructInterner::new();
    let second = first.clone();
    let a = first.intern(sig(&[("double", "x")]));
    let b = second.intern(sig(&[("double", "x")]));
    assert_eq!(a, b);
    assert_eq!(second.count(), 1);
}

#[test]
fn fields_sort_bytewise() {
    let interner = SharedStructInterner::new();
    interner.intern(sig(&[("double", "b"), ("double", "B"), ("double", "a")]));
    assert_eq!(
        interner.definitions(|_| true),
        "typedef struct {double B;\ndouble a;\ndouble b;} GenClass0;"
    );
}
