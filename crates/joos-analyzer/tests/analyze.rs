use joos_analyzer::{analyze, AnalysisError, AnalyzerConfig, ConfigError, LoggingConfig};
use joos_core::{ErrorKind, Modifiers, Phase, Span};
use joos_hir::builder::{expr, stmt, ty, CtorSpec, FieldSpec, MethodSpec, TypeBuilder, UnitBuilder};
use joos_hir::{BinaryOp, CompilationUnit, Program, Stmt};
use pretty_assertions::assert_eq;

fn unit(package: &str, decl: TypeBuilder) -> CompilationUnit {
    UnitBuilder::new().package(package).decl(decl).build()
}

fn default_unit(decl: TypeBuilder) -> CompilationUnit {
    UnitBuilder::new().decl(decl).build()
}

fn program(units: Vec<CompilationUnit>) -> Program {
    Program { units }
}

fn kinds(program: &Program) -> Vec<ErrorKind> {
    match analyze(program, &AnalyzerConfig::default()) {
        Ok(_) => Vec::new(),
        Err(err) => err.errors().iter().map(|e| e.kind()).collect(),
    }
}

fn main_class() -> TypeBuilder {
    TypeBuilder::class("Main").constructor(CtorSpec::new())
}

#[test]
fn valid_programs_are_accepted_repeatedly() {
    let program = program(vec![
        unit(
            "shapes",
            TypeBuilder::interface("Shape").method(
                MethodSpec::new("area")
                    .with(Modifiers::ABSTRACT)
                    .returns(ty::int()),
            ),
        ),
        unit(
            "shapes",
            TypeBuilder::class("Square")
                .implements("Shape")
                .field(FieldSpec::new(ty::int(), "side").modifiers(Modifiers::PROTECTED))
                .constructor(CtorSpec::new().param(ty::int(), "side").body(vec![stmt::expr(
                    expr::assign(expr::field(expr::this(), "side"), expr::name("side")),
                )]))
                .method(MethodSpec::new("area").returns(ty::int()).body(vec![stmt::ret(
                    expr::binary(
                        BinaryOp::Mul,
                        expr::name("side"),
                        expr::name("side"),
                    ),
                )])),
        ),
        default_unit(
            main_class().method(
                MethodSpec::new("test")
                    .with(Modifiers::STATIC)
                    .returns(ty::int())
                    .body(vec![
                        stmt::local(
                            ty::named("shapes.Shape"),
                            "s",
                            Some(expr::new_object("shapes.Square", vec![expr::int(3)])),
                        ),
                        stmt::ret(expr::call_on(expr::name("s"), "area", Vec::new())),
                    ]),
            ),
        ),
    ]);

    let first = analyze(&program, &AnalyzerConfig::default()).expect("accepted");
    let second = analyze(&program, &AnalyzerConfig::default()).expect("accepted");
    assert_eq!(first.program_types().len(), 3);
    assert_eq!(first.program_types(), second.program_types());
    assert_eq!(first.store().len(), second.store().len());

    let square = first.lookup("shapes.Square").expect("Square");
    assert!(first.program_types().contains(&square));
    assert!(first.typeck().class(square).is_some());
}

#[test]
fn duplicate_type_is_the_only_error() {
    let program = program(vec![
        unit("p", TypeBuilder::class("A").constructor(CtorSpec::new())),
        unit(
            "p",
            TypeBuilder::class("A")
                .extends("Missing")
                .constructor(CtorSpec::new()),
        ),
    ]);
    assert_eq!(kinds(&program), vec![ErrorKind::DuplicateType]);
}

#[test]
fn earlier_stages_stop_the_pipeline() {
    // A hierarchy cycle and an ill-typed body: only the cycle is reported.
    let program = program(vec![
        default_unit(
            TypeBuilder::class("A")
                .extends("B")
                .constructor(CtorSpec::new())
                .method(MethodSpec::new("m").body(vec![stmt::ret(expr::int(1))])),
        ),
        default_unit(TypeBuilder::class("B").extends("A").constructor(CtorSpec::new())),
    ]);
    let errors = kinds(&program);
    assert_eq!(errors, vec![ErrorKind::CircularInheritance]);
    assert_eq!(errors[0].phase(), Phase::Hierarchy);
}

#[test]
fn corpus_examples() {
    // C() { this(100); }  C(int i) { this(); }
    let cycle = program(vec![default_unit(
        TypeBuilder::class("C")
            .constructor(CtorSpec::new().body(vec![stmt::this_call(vec![expr::int(100)])]))
            .constructor(
                CtorSpec::new()
                    .param(ty::int(), "i")
                    .body(vec![stmt::this_call(Vec::new())]),
            ),
    )]);
    assert_eq!(kinds(&cycle), vec![ErrorKind::CircularConstructorInvocation]);

    let undeclared = program(vec![default_unit(
        main_class().method(
            MethodSpec::new("m")
                .throws("CloneNotSupportedException")
                .body(vec![stmt::throw(expr::new_object(
                    "java.io.FileNotFoundException",
                    Vec::new(),
                ))]),
        ),
    )]);
    assert_eq!(kinds(&undeclared), vec![ErrorKind::UndeclaredCheckedException]);

    let array = program(vec![default_unit(main_class().method(
        MethodSpec::new("m").body(vec![stmt::local(
            ty::int(),
            "a",
            Some(expr::new_array(ty::int(), vec![expr::int(5), expr::int(2)])),
        )]),
    ))]);
    assert_eq!(kinds(&array), vec![ErrorKind::TypeMismatch]);

    let after_throw = program(vec![default_unit(main_class().method(
        MethodSpec::new("m").body(vec![
            stmt::throw(expr::new_object("RuntimeException", Vec::new())),
            stmt::empty(),
        ]),
    ))]);
    assert_eq!(kinds(&after_throw), vec![ErrorKind::UnreachableStatement]);
}

/// A Comparator implementation may omit `equals`: the abstract interface
/// method is satisfied by the one inherited from Object, as in the Joos
/// conformance fixture `J1_4_AbstractMethod_InheritedFromInterface`.
#[test]
fn comparator_implementations() {
    let compare = || {
        MethodSpec::new("compare")
            .returns(ty::int())
            .param(ty::named("Object"), "a")
            .param(ty::named("Object"), "b")
            .body(vec![stmt::ret(expr::int(0))])
    };
    let equals = || {
        MethodSpec::new("equals")
            .returns(ty::boolean())
            .param(ty::named("Object"), "o")
            .body(vec![stmt::ret(expr::boolean(false))])
    };
    let comparator = |method: MethodSpec| {
        program(vec![UnitBuilder::new()
            .import("java.util.Comparator")
            .decl(
                TypeBuilder::class("Cmp")
                    .implements("Comparator")
                    .constructor(CtorSpec::new())
                    .method(method),
            )
            .build()])
    };

    assert_eq!(kinds(&comparator(compare())), Vec::<ErrorKind>::new());
    assert_eq!(kinds(&comparator(equals())), vec![ErrorKind::ClassMustBeAbstract]);
}

#[test]
fn errors_are_collected_unless_disabled() {
    let program = program(vec![default_unit(
        main_class()
            .method(MethodSpec::new("a").body(vec![stmt::ret(expr::int(1))]))
            .method(MethodSpec::new("b").body(vec![stmt::ret(expr::int(2))])),
    )]);
    assert_eq!(kinds(&program).len(), 2);

    let config = AnalyzerConfig {
        collect_all: false,
        ..AnalyzerConfig::default()
    };
    let err = analyze(&program, &config).expect_err("rejected");
    assert_eq!(err.errors().len(), 1);
}

#[test]
fn stdlib_can_be_left_out() {
    let program = program(vec![default_unit(main_class())]);
    let config = AnalyzerConfig {
        include_stdlib: false,
        ..AnalyzerConfig::default()
    };
    let err = analyze(&program, &config).expect_err("Object is missing");
    let kinds: Vec<_> = err.errors().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![ErrorKind::TypeNotFound]);
}

#[test]
fn malformed_units_are_not_analyzed() {
    let mut unit = default_unit(main_class().method(MethodSpec::new("m").body(Vec::new())));
    unit.decl.bodies = Default::default();
    let err = analyze(&program(vec![unit]), &AnalyzerConfig::default()).expect_err("malformed");
    assert!(matches!(err, AnalysisError::MalformedUnit { ref ty } if ty == "Main"));
    assert!(err.errors().is_empty());

    // A constructor body reaching the same statement twice.
    let mut unit = default_unit(main_class());
    let body = unit.decl.constructors[0].body;
    let shared = unit.decl.bodies.alloc_stmt(Stmt::Block {
        stmts: vec![body, body],
        range: Span::default(),
    });
    unit.decl.constructors[0].body = shared;
    let err = analyze(&program(vec![unit]), &AnalyzerConfig::default()).expect_err("malformed");
    assert!(matches!(err, AnalysisError::MalformedUnit { ref ty } if ty == "Main"));
}

#[test]
fn config_defaults_and_overrides() {
    let config = AnalyzerConfig::load_from_str("").expect("empty config");
    assert_eq!(config, AnalyzerConfig::default());
    assert!(config.include_stdlib);
    assert!(config.collect_all);
    assert_eq!(config.logging.level, "warn");

    let config = AnalyzerConfig::load_from_str(
        r#"
collect_all = false

[logging]
level = "debug"
json = true
"#,
    )
    .expect("config");
    assert_eq!(
        config,
        AnalyzerConfig {
            include_stdlib: true,
            collect_all: false,
            logging: LoggingConfig {
                level: "debug".to_owned(),
                json: true,
            },
        }
    );
}

#[test]
fn config_rejects_unknown_keys() {
    let err = AnalyzerConfig::load_from_str("include_stdlibs = false").expect_err("unknown key");
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");

    let err = AnalyzerConfig::load_from_str("[logging]\ncolor = true").expect_err("unknown key");
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn config_is_loaded_from_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("joos.toml");
    std::fs::write(&path, "include_stdlib = false\n").expect("write config");
    let config = AnalyzerConfig::load_from_path(&path).expect("config");
    assert!(!config.include_stdlib);

    let err = AnalyzerConfig::load_from_path(dir.path().join("missing.toml")).expect_err("missing");
    assert!(matches!(err, ConfigError::Io { .. }));
}
