use joos_core::{ErrorKind, Modifiers, QualifiedName, SemanticError};
use joos_hierarchy::{check_hierarchy, Hierarchy, MethodKey};
use joos_hir::builder::{ty, CtorSpec, FieldSpec, MethodSpec, TypeBuilder, UnitBuilder};
use joos_hir::CompilationUnit;
use joos_jdk::library_units;
use joos_resolve::{link, DefMap};
use joos_types::{Type, TypeEnv, TypeStore};
use pretty_assertions::assert_eq;

fn unit(ty: TypeBuilder) -> CompilationUnit {
    UnitBuilder::new().decl(ty).build()
}

fn with_hierarchy<R>(program: Vec<TypeBuilder>, f: impl FnOnce(&TypeStore, &Hierarchy) -> R) -> R {
    let program: Vec<_> = program.into_iter().map(unit).collect();
    let library = library_units();
    let defs = DefMap::new(&program, &library).expect("symbol table");
    let linked = link(defs).expect("linking");
    let hierarchy = match check_hierarchy(&linked.store) {
        Ok(h) => h,
        Err(err) => panic!("unexpected hierarchy error: {err}"),
    };
    f(&linked.store, &hierarchy)
}

fn hierarchy_err(program: Vec<TypeBuilder>) -> SemanticError {
    let program: Vec<_> = program.into_iter().map(unit).collect();
    let library = library_units();
    let defs = DefMap::new(&program, &library).expect("symbol table");
    let linked = link(defs).expect("linking");
    check_hierarchy(&linked.store).expect_err("hierarchy should be rejected")
}

fn accept(program: Vec<TypeBuilder>) {
    with_hierarchy(program, |_, _| ());
}

fn class(name: &str) -> TypeBuilder {
    TypeBuilder::class(name).constructor(CtorSpec::new())
}

fn id(store: &TypeStore, name: &str) -> joos_types::ClassId {
    store
        .lookup_class(&QualifiedName::from_dotted(name))
        .unwrap_or_else(|| panic!("no class {name}"))
}

#[test]
fn library_hierarchy_is_well_formed() {
    with_hierarchy(Vec::new(), |store, hierarchy| {
        let string = id(store, "java.lang.String");
        assert_eq!(hierarchy.methods_named(string, "valueOf").count(), 7);
        assert!(hierarchy
            .methods_named(string, "valueOf")
            .all(|m| m.def(store).is_static() && m.owner == string));
    });
}

#[test]
fn cycles_of_any_length_are_rejected() {
    let err = hierarchy_err(vec![class("A").extends("B"), class("B").extends("A")]);
    assert_eq!(err.kind(), ErrorKind::CircularInheritance);

    let err = hierarchy_err(vec![class("A").extends("A")]);
    assert_eq!(err.kind(), ErrorKind::CircularInheritance);

    let err = hierarchy_err(vec![
        TypeBuilder::interface("I").extends("J"),
        TypeBuilder::interface("J").extends("K"),
        TypeBuilder::interface("K").extends("I"),
    ]);
    assert_eq!(err.kind(), ErrorKind::CircularInheritance);

    // A diamond is not a cycle.
    accept(vec![
        TypeBuilder::interface("Top"),
        TypeBuilder::interface("Left").extends("Top"),
        TypeBuilder::interface("Right").extends("Top"),
        class("Bottom").implements("Left").implements("Right"),
    ]);
}

#[test]
fn supertype_edges_must_have_the_right_kind() {
    let err = hierarchy_err(vec![class("A").extends("Runnable")]);
    assert_eq!(err.kind(), ErrorKind::ExtendsNonClass);

    let err = hierarchy_err(vec![class("A").extends("Integer")]);
    assert_eq!(err.kind(), ErrorKind::ExtendsFinalClass);

    let err = hierarchy_err(vec![class("A").implements("Object")]);
    assert_eq!(err.kind(), ErrorKind::ImplementsNonInterface);

    let err = hierarchy_err(vec![TypeBuilder::interface("I").extends("Object")]);
    assert_eq!(err.kind(), ErrorKind::ImplementsNonInterface);
}

#[test]
fn interfaces_are_named_once_per_clause() {
    let err = hierarchy_err(vec![class("A")
        .implements("Cloneable")
        .implements("Cloneable")]);
    assert_eq!(err.kind(), ErrorKind::RepeatedInterface);
}

#[test]
fn duplicate_members() {
    let err = hierarchy_err(vec![class("A")
        .field(FieldSpec::new(ty::int(), "x"))
        .field(FieldSpec::new(ty::boolean(), "x"))]);
    assert_eq!(err.kind(), ErrorKind::DuplicateField);

    // Return types do not distinguish methods.
    let err = hierarchy_err(vec![class("A")
        .method(MethodSpec::new("m").param(ty::int(), "a"))
        .method(MethodSpec::new("m").returns(ty::int()).param(ty::int(), "b"))]);
    assert_eq!(err.kind(), ErrorKind::DuplicateMember);

    let err = hierarchy_err(vec![TypeBuilder::class("A")
        .constructor(CtorSpec::new().param(ty::int(), "a"))
        .constructor(CtorSpec::new().param(ty::int(), "b"))]);
    assert_eq!(err.kind(), ErrorKind::DuplicateMember);

    // A method may share its signature with a constructor.
    accept(vec![class("A").method(MethodSpec::new("A"))]);
}

#[test]
fn replacing_requires_the_same_return_type() {
    let err = hierarchy_err(vec![
        class("A").method(MethodSpec::new("m").returns(ty::int())),
        class("B").extends("A").method(MethodSpec::new("m")),
    ]);
    assert_eq!(err.kind(), ErrorKind::DifferentReturnType);
}

#[test]
fn final_methods_cannot_be_replaced() {
    let err = hierarchy_err(vec![
        class("A").method(MethodSpec::new("m").with(Modifiers::FINAL)),
        class("B").extends("A").method(MethodSpec::new("m")),
    ]);
    assert_eq!(err.kind(), ErrorKind::ReplaceFinal);

    // Interfaces implicitly redeclare Object's public methods, getClass included.
    let err = hierarchy_err(vec![TypeBuilder::interface("I")
        .method(MethodSpec::new("getClass").returns(ty::named("Class")))]);
    assert_eq!(err.kind(), ErrorKind::ReplaceFinal);
}

#[test]
fn protected_cannot_replace_public() {
    let err = hierarchy_err(vec![
        class("A").method(MethodSpec::new("m")),
        class("B")
            .extends("A")
            .method(MethodSpec::new("m").modifiers(Modifiers::PROTECTED)),
    ]);
    assert_eq!(err.kind(), ErrorKind::ProtectedReplacePublic);

    // Inherited protected implementation of a public interface method.
    let err = hierarchy_err(vec![
        TypeBuilder::interface("I").method(MethodSpec::new("m")),
        class("A").method(MethodSpec::new("m").modifiers(Modifiers::PROTECTED)),
        class("B").extends("A").implements("I"),
    ]);
    assert_eq!(err.kind(), ErrorKind::ProtectedReplacePublic);

    // The other way round is fine.
    accept(vec![
        class("A").method(MethodSpec::new("m").modifiers(Modifiers::PROTECTED)),
        class("B").extends("A").method(MethodSpec::new("m")),
    ]);
}

#[test]
fn static_ness_must_match() {
    let err = hierarchy_err(vec![
        class("A").method(MethodSpec::new("m").with(Modifiers::STATIC)),
        class("B").extends("A").method(MethodSpec::new("m")),
    ]);
    assert_eq!(err.kind(), ErrorKind::NonstaticReplaceStatic);

    let err = hierarchy_err(vec![
        class("A").method(MethodSpec::new("m")),
        class("B")
            .extends("A")
            .method(MethodSpec::new("m").with(Modifiers::STATIC)),
    ]);
    assert_eq!(err.kind(), ErrorKind::StaticReplaceNonstatic);

    accept(vec![
        class("A").method(MethodSpec::new("m").with(Modifiers::STATIC)),
        class("B")
            .extends("A")
            .method(MethodSpec::new("m").with(Modifiers::STATIC)),
    ]);
}

#[test]
fn replacements_only_throw_covered_checked_exceptions() {
    let err = hierarchy_err(vec![
        class("A").method(MethodSpec::new("m")),
        class("B")
            .extends("A")
            .method(MethodSpec::new("m").throws("Exception")),
    ]);
    assert_eq!(err.kind(), ErrorKind::IllegalThrowsInReplace);

    accept(vec![
        class("A").method(MethodSpec::new("m").throws("java.io.IOException")),
        class("B")
            .extends("A")
            .method(
                MethodSpec::new("m")
                    .throws("java.io.FileNotFoundException")
                    .throws("RuntimeException"),
            ),
    ]);
}

#[test]
fn concrete_classes_implement_every_abstract_method() {
    let err = hierarchy_err(vec![class("A").implements("Runnable")]);
    assert_eq!(err.kind(), ErrorKind::ClassMustBeAbstract);

    let err = hierarchy_err(vec![
        class("A")
            .with(Modifiers::ABSTRACT)
            .method(MethodSpec::new("m").with(Modifiers::ABSTRACT)),
        class("B").extends("A"),
    ]);
    assert_eq!(err.kind(), ErrorKind::ClassMustBeAbstract);

    accept(vec![class("A").implements("Runnable").method(MethodSpec::new("run"))]);
    accept(vec![class("A")
        .with(Modifiers::ABSTRACT)
        .implements("Runnable")]);
}

#[test]
fn object_methods_satisfy_interface_redeclarations() {
    let compare = || {
        MethodSpec::new("compare")
            .returns(ty::int())
            .param(ty::named("Object"), "a")
            .param(ty::named("Object"), "b")
    };
    // `equals` comes from Object.
    accept(vec![class("ByLength")
        .implements("java.util.Comparator")
        .method(compare())]);

    let err = hierarchy_err(vec![class("ByLength")
        .implements("java.util.Comparator")
        .method(
            MethodSpec::new("equals")
                .returns(ty::boolean())
                .param(ty::named("Object"), "o"),
        )]);
    assert_eq!(err.kind(), ErrorKind::ClassMustBeAbstract);
}

#[test]
fn abstract_methods_sharing_a_signature_agree_on_return_type() {
    let err = hierarchy_err(vec![
        TypeBuilder::interface("I").method(MethodSpec::new("m").returns(ty::int())),
        TypeBuilder::interface("J").method(MethodSpec::new("m").returns(ty::boolean())),
        class("A")
            .with(Modifiers::ABSTRACT)
            .implements("I")
            .implements("J"),
    ]);
    assert_eq!(err.kind(), ErrorKind::DifferentReturnType);

    let err = hierarchy_err(vec![
        TypeBuilder::interface("I").method(MethodSpec::new("hashCode")),
    ]);
    assert_eq!(err.kind(), ErrorKind::DifferentReturnType);
}

#[test]
fn member_sets_combine_declared_and_inherited_members() {
    with_hierarchy(
        vec![
            class("A")
                .field(FieldSpec::new(ty::int(), "x"))
                .field(FieldSpec::new(ty::int(), "y"))
                .method(MethodSpec::new("m")),
            class("B")
                .extends("A")
                .field(FieldSpec::new(ty::boolean(), "x"))
                .method(MethodSpec::new("toString").returns(ty::named("String"))),
        ],
        |store, hierarchy| {
            let a = id(store, "A");
            let b = id(store, "B");
            let set = hierarchy.members(b);

            assert_eq!(set.field("x").map(|f| f.owner), Some(b));
            assert_eq!(set.field("y").map(|f| f.owner), Some(a));
            assert_eq!(set.field("x").map(|f| f.def(store).ty.clone()), Some(Type::BOOLEAN));

            let m = MethodKey {
                name: "m".into(),
                params: Vec::new(),
            };
            assert_eq!(set.method(&m).map(|member| member.method.owner), Some(a));

            let to_string = MethodKey {
                name: "toString".into(),
                params: Vec::new(),
            };
            assert_eq!(set.method(&to_string).map(|member| member.method.owner), Some(b));

            let equals = MethodKey {
                name: "equals".into(),
                params: vec![Type::Class(store.well_known().object)],
            };
            assert_eq!(
                set.method(&equals).map(|member| member.method.owner),
                Some(store.well_known().object)
            );
            assert_eq!(set.abstract_methods().count(), 0);
        },
    );
}

#[test]
fn interfaces_see_object_members_as_abstract() {
    with_hierarchy(vec![TypeBuilder::interface("I")], |store, hierarchy| {
        let i = id(store, "I");
        let set = hierarchy.members(i);
        let names: Vec<String> = set
            .abstract_methods()
            .map(|m| m.def(store).name.to_string())
            .collect();
        assert_eq!(names, vec!["equals", "getClass", "hashCode", "toString"]);
        assert!(hierarchy.methods_named(i, "clone").next().is_none());
    });
}
