use joos_core::{Modifiers, PrimitiveType, QualifiedName};
use joos_types::{
    is_assignable, is_castable, is_checked_exception, is_subclass, select_overload, ClassDef,
    ClassId, ClassKind, MethodResolution, Type, TypeEnv, TypeStore, TypeStoreBuilder,
};
use pretty_assertions::assert_eq;

struct Fixture {
    store: TypeStore,
}

fn add(
    builder: &mut TypeStoreBuilder,
    name: &str,
    kind: ClassKind,
    modifiers: Modifiers,
    super_class: Option<&str>,
    interfaces: &[&str],
) -> ClassId {
    let mut def = ClassDef::skeleton(QualifiedName::from_dotted(name), kind, modifiers);
    def.super_class = super_class.map(|s| {
        builder
            .lookup_class(&QualifiedName::from_dotted(s))
            .expect("superclass declared first")
    });
    def.interfaces = interfaces
        .iter()
        .map(|i| {
            builder
                .lookup_class(&QualifiedName::from_dotted(i))
                .expect("interface declared first")
        })
        .collect();
    builder.add_class(def)
}

fn fixture() -> Fixture {
    let mut b = TypeStore::builder();
    let public = Modifiers::PUBLIC;
    add(&mut b, "java.lang.Object", ClassKind::Class, public, None, &[]);
    add(&mut b, "java.lang.Cloneable", ClassKind::Interface, public, None, &[]);
    add(&mut b, "java.io.Serializable", ClassKind::Interface, public, None, &[]);
    add(&mut b, "java.lang.String", ClassKind::Class, public | Modifiers::FINAL, Some("java.lang.Object"), &[]);
    add(&mut b, "java.lang.Throwable", ClassKind::Class, public, Some("java.lang.Object"), &[]);
    add(&mut b, "java.lang.Exception", ClassKind::Class, public, Some("java.lang.Throwable"), &[]);
    add(&mut b, "java.lang.RuntimeException", ClassKind::Class, public, Some("java.lang.Exception"), &[]);
    add(&mut b, "java.lang.Error", ClassKind::Class, public, Some("java.lang.Throwable"), &[]);
    add(&mut b, "java.io.IOException", ClassKind::Class, public, Some("java.lang.Exception"), &[]);
    add(&mut b, "I", ClassKind::Interface, public, None, &[]);
    add(&mut b, "J", ClassKind::Interface, public, None, &["I"]);
    add(&mut b, "A", ClassKind::Class, public, Some("java.lang.Object"), &["J"]);
    add(&mut b, "B", ClassKind::Class, public, Some("A"), &[]);
    add(&mut b, "C", ClassKind::Class, public | Modifiers::FINAL, Some("java.lang.Object"), &[]);
    Fixture {
        store: b.finish().expect("well-known types present"),
    }
}

impl Fixture {
    fn id(&self, name: &str) -> ClassId {
        self.store
            .lookup_class(&QualifiedName::from_dotted(name))
            .unwrap()
    }

    fn ty(&self, name: &str) -> Type {
        Type::Class(self.id(name))
    }
}

#[test]
fn subclassing_follows_superclasses_and_interfaces() {
    let f = fixture();
    assert!(is_subclass(&f.store, f.id("B"), f.id("A")));
    assert!(is_subclass(&f.store, f.id("B"), f.id("I")));
    assert!(is_subclass(&f.store, f.id("J"), f.id("java.lang.Object")));
    assert!(!is_subclass(&f.store, f.id("A"), f.id("B")));
    assert!(!is_subclass(&f.store, f.id("C"), f.id("I")));
}

#[test]
fn assignability_rules() {
    let f = fixture();
    let s = &f.store;
    let byte = Type::Primitive(PrimitiveType::Byte);
    let short = Type::Primitive(PrimitiveType::Short);

    assert!(is_assignable(s, &byte, &Type::INT));
    assert!(is_assignable(s, &Type::CHAR, &Type::INT));
    assert!(!is_assignable(s, &Type::CHAR, &short));
    assert!(!is_assignable(s, &Type::INT, &byte));
    assert!(!is_assignable(s, &Type::BOOLEAN, &Type::INT));

    assert!(is_assignable(s, &Type::Null, &f.ty("A")));
    assert!(is_assignable(s, &Type::Null, &Type::array(Type::INT)));
    assert!(!is_assignable(s, &Type::Null, &Type::INT));

    assert!(is_assignable(s, &f.ty("B"), &f.ty("I")));
    assert!(is_assignable(s, &f.ty("I"), &f.ty("java.lang.Object")));

    let int_array = Type::array(Type::INT);
    assert!(is_assignable(s, &int_array, &f.ty("java.lang.Object")));
    assert!(is_assignable(s, &int_array, &f.ty("java.lang.Cloneable")));
    assert!(is_assignable(s, &int_array, &f.ty("java.io.Serializable")));
    assert!(!is_assignable(s, &int_array, &Type::array(Type::CHAR)));
    assert!(is_assignable(s, &Type::array(f.ty("B")), &Type::array(f.ty("A"))));
    assert!(!is_assignable(s, &Type::array(f.ty("A")), &Type::array(f.ty("B"))));

    // int[][] is not an int
    assert!(!is_assignable(s, &Type::array(int_array), &Type::INT));
}

#[test]
fn castability_rules() {
    let f = fixture();
    let s = &f.store;
    assert!(is_castable(s, &Type::INT, &Type::CHAR));
    assert!(!is_castable(s, &Type::INT, &Type::BOOLEAN));
    assert!(is_castable(s, &f.ty("A"), &f.ty("B")));
    assert!(is_castable(s, &f.ty("I"), &f.ty("A")));
    assert!(!is_castable(s, &f.ty("I"), &f.ty("C")));
    assert!(!is_castable(s, &f.ty("java.lang.String"), &f.ty("A")));
    assert!(!is_castable(s, &f.ty("A"), &Type::INT));
    assert!(is_castable(s, &f.ty("java.lang.Object"), &Type::array(Type::INT)));
}

#[test]
fn checked_exceptions() {
    let f = fixture();
    assert!(is_checked_exception(&f.store, f.id("java.io.IOException")));
    assert!(is_checked_exception(&f.store, f.id("java.lang.Throwable")));
    assert!(!is_checked_exception(&f.store, f.id("java.lang.RuntimeException")));
    assert!(!is_checked_exception(&f.store, f.id("java.lang.Error")));
    assert!(!is_checked_exception(&f.store, f.id("A")));
}

#[test]
fn missing_well_known_types_are_reported() {
    let mut b = TypeStore::builder();
    add(&mut b, "java.lang.Object", ClassKind::Class, Modifiers::PUBLIC, None, &[]);
    let missing = b.finish().unwrap_err();
    assert_eq!(missing.to_dotted(), "java.lang.String");
}

#[test]
fn overload_picks_most_specific() {
    let f = fixture();
    let object = [f.ty("java.lang.Object")];
    let a = [f.ty("A")];
    let b = [f.ty("B")];
    let candidates: Vec<(&str, &[Type])> = vec![("object", &object[..]), ("a", &a[..]), ("b", &b[..])];

    assert_eq!(
        select_overload(&f.store, &candidates, &[f.ty("B")]),
        MethodResolution::Found("b")
    );
    assert_eq!(
        select_overload(&f.store, &candidates, &[f.ty("A")]),
        MethodResolution::Found("a")
    );
    assert_eq!(
        select_overload(&f.store, &candidates, &[Type::INT]),
        MethodResolution::NotFound
    );

    let mut reversed = candidates.clone();
    reversed.reverse();
    assert_eq!(
        select_overload(&f.store, &reversed, &[f.ty("B")]),
        MethodResolution::Found("b")
    );
}

#[test]
fn overload_without_dominating_candidate_is_ambiguous() {
    let f = fixture();
    let first = [f.ty("A"), f.ty("java.lang.Object")];
    let second = [f.ty("java.lang.Object"), f.ty("A")];
    let candidates: Vec<(u8, &[Type])> = vec![(1, &first[..]), (2, &second[..])];
    let args = [f.ty("B"), f.ty("B")];
    assert_eq!(
        select_overload(&f.store, &candidates, &args),
        MethodResolution::Ambiguous(vec![1, 2])
    );
}

#[test]
fn primitive_widening_prefers_exact_match() {
    let f = fixture();
    let int = [Type::INT];
    let short = [Type::Primitive(PrimitiveType::Short)];
    let candidates: Vec<(&str, &[Type])> = vec![("int", &int[..]), ("short", &short[..])];
    assert_eq!(
        select_overload(&f.store, &candidates, &[Type::Primitive(PrimitiveType::Byte)]),
        MethodResolution::Found("short")
    );
    assert_eq!(
        select_overload(&f.store, &candidates, &[Type::CHAR]),
        MethodResolution::Found("int")
    );
}
