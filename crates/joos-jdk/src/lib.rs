//! Built-in library declarations.
//!
//! The analyzer only needs signatures, so library methods carry no bodies and
//! constructors have empty ones. The units go through the same pipeline as the
//! program (symbol table, linker, hierarchy checker); only body checking is
//! skipped for them.
//!
//! `java.util.ArrayList` and `java.util.LinkedList` are deliberately absent:
//! test programs routinely ship their own copies, which would otherwise be
//! duplicate declarations.

use joos_core::Modifiers;
use joos_hir::builder::{ty, CtorSpec, FieldSpec, MethodSpec, TypeBuilder, UnitBuilder};
use joos_hir::CompilationUnit;

/// Packages that contain library declarations.
pub const LIBRARY_PACKAGES: [&str; 3] = ["java.lang", "java.io", "java.util"];

/// Every library compilation unit, `java.lang` first.
pub fn library_units() -> Vec<CompilationUnit> {
    let mut units = Vec::new();
    units.extend(java_lang().into_iter().map(|t| unit("java.lang", t)));
    units.extend(java_io().into_iter().map(|t| unit("java.io", t)));
    units.extend(java_util().into_iter().map(|t| unit("java.util", t)));
    units
}

fn unit(package: &str, decl: TypeBuilder) -> CompilationUnit {
    UnitBuilder::new()
        .file("<jdk>")
        .package(package)
        .decl(decl)
        .build()
}

fn method(name: &str) -> MethodSpec {
    MethodSpec::new(name)
}

fn static_method(name: &str) -> MethodSpec {
    MethodSpec::new(name).with(Modifiers::STATIC)
}

fn abstract_method(name: &str) -> MethodSpec {
    MethodSpec::new(name).with(Modifiers::ABSTRACT)
}

fn ctor() -> CtorSpec {
    CtorSpec::new()
}

/// A throwable class with the usual `()` and `(String)` constructors.
fn throwable(name: &str, parent: &str) -> TypeBuilder {
    TypeBuilder::class(name)
        .extends(parent)
        .constructor(ctor())
        .constructor(ctor().param(ty::named("String"), "message"))
}

/// A boxed wrapper around a single primitive `value` field.
fn wrapper(name: &str, prim: joos_hir::TypeSyntax) -> TypeBuilder {
    TypeBuilder::class(name)
        .with(Modifiers::FINAL)
        .field(FieldSpec::new(prim.clone(), "value"))
        .constructor(ctor())
        .constructor(ctor().param(prim, "value"))
        .method(method("toString").returns(ty::named("String")))
}

fn java_lang() -> Vec<TypeBuilder> {
    let string = || ty::named("String");
    let object = || ty::named("Object");
    vec![
        TypeBuilder::class("Object")
            .constructor(ctor())
            .method(method("equals").returns(ty::boolean()).param(object(), "other"))
            .method(method("toString").returns(string()))
            .method(method("hashCode").returns(ty::int()))
            .method(
                method("clone")
                    .modifiers(Modifiers::PROTECTED)
                    .returns(object()),
            )
            .method(
                method("getClass")
                    .with(Modifiers::FINAL)
                    .returns(ty::named("Class")),
            ),
        TypeBuilder::class("String")
            .field(FieldSpec::new(ty::array(ty::char()), "chars"))
            .constructor(ctor())
            .constructor(ctor().param(ty::array(ty::char()), "chars"))
            .constructor(ctor().param(string(), "other"))
            .method(method("length").returns(ty::int()))
            .method(method("charAt").returns(ty::char()).param(ty::int(), "i"))
            .method(method("concat").returns(string()).param(string(), "other"))
            .method(static_method("valueOf").returns(string()).param(ty::char(), "c"))
            .method(static_method("valueOf").returns(string()).param(ty::int(), "i"))
            .method(static_method("valueOf").returns(string()).param(ty::short(), "s"))
            .method(static_method("valueOf").returns(string()).param(ty::byte(), "b"))
            .method(static_method("valueOf").returns(string()).param(ty::boolean(), "b"))
            .method(static_method("valueOf").returns(string()).param(object(), "o"))
            .method(static_method("valueOf").returns(string()).param(string(), "s"))
            .method(method("equals").returns(ty::boolean()).param(object(), "other"))
            .method(
                method("substring")
                    .returns(string())
                    .param(ty::int(), "begin")
                    .param(ty::int(), "end"),
            )
            .method(method("trim").returns(string()))
            .method(method("hashCode").returns(ty::int()))
            .method(method("toString").returns(string()))
            .method(method("compareTo").returns(ty::int()).param(object(), "other"))
            .method(method("compareTo").returns(ty::int()).param(string(), "other"))
            .method(method("toCharArray").returns(ty::array(ty::char())))
            .method(method("indexOf").returns(ty::int()).param(string(), "needle")),
        TypeBuilder::class("Number")
            .with(Modifiers::ABSTRACT)
            .constructor(ctor())
            .method(abstract_method("intValue").returns(ty::int())),
        TypeBuilder::class("Integer")
            .with(Modifiers::FINAL)
            .extends("Number")
            .field(FieldSpec::new(ty::int(), "value"))
            .field(FieldSpec::new(ty::int(), "MAX_VALUE").with(Modifiers::STATIC))
            .constructor(ctor())
            .constructor(ctor().param(ty::int(), "i"))
            .constructor(ctor().param(string(), "s"))
            .method(method("intValue").returns(ty::int()))
            .method(static_method("parseInt").returns(ty::int()).param(string(), "s"))
            .method(method("toString").returns(string())),
        wrapper("Boolean", ty::boolean()),
        wrapper("Character", ty::char()),
        wrapper("Byte", ty::byte()),
        wrapper("Short", ty::short()),
        TypeBuilder::class("Class")
            .with(Modifiers::FINAL)
            .constructor(ctor()),
        TypeBuilder::interface("Cloneable"),
        TypeBuilder::interface("Comparable")
            .method(abstract_method("compareTo").returns(ty::int()).param(object(), "other")),
        TypeBuilder::interface("Runnable").method(abstract_method("run")),
        TypeBuilder::class("Thread")
            .implements("Runnable")
            .constructor(ctor())
            .constructor(ctor().param(ty::named("Runnable"), "target"))
            .method(method("run"))
            .method(method("start"))
            .method(method("interrupt"))
            .method(static_method("activeCount").returns(ty::int())),
        TypeBuilder::class("System")
            .constructor(ctor())
            .field(FieldSpec::new(ty::named("java.io.PrintStream"), "out").with(Modifiers::STATIC))
            .method(static_method("gc"))
            .method(static_method("exit").param(ty::int(), "status")),
        throwable("Throwable", "Object")
            .method(method("getMessage").returns(string())),
        throwable("Exception", "Throwable"),
        throwable("RuntimeException", "Exception"),
        throwable("Error", "Throwable"),
        throwable("CloneNotSupportedException", "Exception"),
        throwable("InterruptedException", "Exception"),
        throwable("ArithmeticException", "RuntimeException"),
        throwable("ClassCastException", "RuntimeException"),
        throwable("NullPointerException", "RuntimeException"),
        throwable("IllegalArgumentException", "RuntimeException"),
        throwable("ArrayIndexOutOfBoundsException", "RuntimeException"),
    ]
}

fn java_io() -> Vec<TypeBuilder> {
    let print = |name: &str, param: Option<joos_hir::TypeSyntax>| {
        let spec = method(name);
        match param {
            Some(ty) => spec.param(ty, "value"),
            None => spec,
        }
    };
    let mut print_stream = TypeBuilder::class("PrintStream")
        .extends("OutputStream")
        .constructor(ctor());
    for name in ["print", "println"] {
        for param in [
            ty::named("String"),
            ty::named("Object"),
            ty::int(),
            ty::char(),
            ty::boolean(),
            ty::byte(),
            ty::short(),
        ] {
            print_stream = print_stream.method(print(name, Some(param)));
        }
    }
    print_stream = print_stream.method(print("println", None));

    vec![
        TypeBuilder::interface("Serializable"),
        TypeBuilder::class("OutputStream")
            .constructor(ctor())
            .method(method("write").param(ty::char(), "c"))
            .method(method("flush")),
        print_stream,
        throwable("IOException", "Exception"),
        throwable("FileNotFoundException", "IOException"),
    ]
}

fn java_util() -> Vec<TypeBuilder> {
    let object = || ty::named("Object");
    let collection = || ty::named("Collection");
    let sorted_set = || ty::named("SortedSet");
    vec![
        TypeBuilder::class("Arrays")
            .constructor(ctor())
            .method(
                static_method("equals")
                    .returns(ty::boolean())
                    .param(ty::array(ty::boolean()), "a1")
                    .param(ty::array(ty::boolean()), "a2"),
            )
            .method(
                static_method("equals")
                    .returns(ty::boolean())
                    .param(ty::array(ty::char()), "a1")
                    .param(ty::array(ty::char()), "a2"),
            ),
        TypeBuilder::interface("Comparator")
            .method(
                abstract_method("compare")
                    .returns(ty::int())
                    .param(object(), "o1")
                    .param(object(), "o2"),
            )
            .method(abstract_method("equals").returns(ty::boolean()).param(object(), "other")),
        TypeBuilder::interface("Iterator")
            .method(abstract_method("hasNext").returns(ty::boolean()))
            .method(abstract_method("next").returns(object()))
            .method(abstract_method("remove")),
        // Only what program-supplied list implementations agree on.
        TypeBuilder::interface("List")
            .method(abstract_method("size").returns(ty::int()))
            .method(abstract_method("add").returns(ty::boolean()).param(object(), "o")),
        TypeBuilder::interface("Collection")
            .method(abstract_method("add").returns(ty::boolean()).param(object(), "o"))
            .method(abstract_method("addAll").returns(ty::boolean()).param(collection(), "c"))
            .method(abstract_method("clear"))
            .method(abstract_method("contains").returns(ty::boolean()).param(object(), "o"))
            .method(
                abstract_method("containsAll")
                    .returns(ty::boolean())
                    .param(collection(), "c"),
            )
            .method(abstract_method("isEmpty").returns(ty::boolean()))
            .method(abstract_method("iterator").returns(ty::named("Iterator")))
            .method(abstract_method("remove").returns(ty::boolean()).param(object(), "o"))
            .method(abstract_method("removeAll").returns(ty::boolean()).param(collection(), "c"))
            .method(abstract_method("retainAll").returns(ty::boolean()).param(collection(), "c"))
            .method(abstract_method("size").returns(ty::int()))
            .method(abstract_method("toArray").returns(ty::array(object()))),
        TypeBuilder::interface("Set").extends("Collection"),
        TypeBuilder::interface("SortedSet")
            .extends("Set")
            .method(abstract_method("comparator").returns(ty::named("Comparator")))
            .method(abstract_method("first").returns(object()))
            .method(abstract_method("headSet").returns(sorted_set()).param(object(), "to"))
            .method(abstract_method("last").returns(object()))
            .method(
                abstract_method("subSet")
                    .returns(sorted_set())
                    .param(object(), "from")
                    .param(object(), "to"),
            )
            .method(abstract_method("tailSet").returns(sorted_set()).param(object(), "from")),
    ]
}
