use expect_test::expect;
use pretty_assertions::assert_eq;
use protocol_mirror::{
    AccessMode, Accessor, AccessorBlock, DeclKind, Effects, FunctionParam, FunctionType,
    Initializer, InputDeclaration, LiteralKind, RawMember, RenderOptions, Severity, Span, Storage,
    TypeExpr, Visibility, expand, render_interface,
};

fn named(text: &str) -> TypeExpr {
    TypeExpr::named(text)
}

fn closure(params: Vec<FunctionParam>, effects: Effects, returns: &str) -> TypeExpr {
    TypeExpr::function(FunctionType::new(params, effects, named(returns)))
}

fn render(decl: &InputDeclaration) -> String {
    let expansion = expand(decl);
    assert!(expansion.diagnostics.is_empty(), "{:?}", expansion.diagnostics);
    expansion
        .interface
        .map(|spec| render_interface(&spec, &RenderOptions::default()))
        .unwrap_or_default()
}

#[test_log::test]
fn api_client_closures_without_labels() {
    let decl = InputDeclaration::record("APIClient").with_members([
        RawMember::variable("fetchUser").with_type(closure(
            vec![FunctionParam::unnamed(named("Int"))],
            Effects::async_throws(),
            "User",
        )),
        RawMember::variable("saveUser").with_type(closure(
            vec![FunctionParam::unnamed(named("User"))],
            Effects::async_throws(),
            "Void",
        )),
        RawMember::variable("config").with_type(named("Config")),
    ]);

    expect![[r#"
        extension APIClient {
            protocol `Protocol` {
                var fetchUser: (Int) async throws -> User { get }
                var saveUser: (User) async throws -> Void { get }
                var config: Config { get set }
            }
        }
    "#]]
    .assert_eq(&render(&decl));
}

#[test_log::test]
fn labeled_closure_generates_method() {
    let fetch = TypeExpr::function_with_text(
        "(_ id: Int, _ includeDetails: Bool) async throws -> User",
        FunctionType::new(
            vec![
                FunctionParam::with_names("_", "id", named("Int")),
                FunctionParam::with_names("_", "includeDetails", named("Bool")),
            ],
            Effects::async_throws(),
            named("User"),
        ),
    );
    let decl =
        InputDeclaration::record("Client").with_member(RawMember::constant("fetch").with_type(fetch));

    expect![[r#"
        extension Client {
            protocol `Protocol` {
                var fetch: (_ id: Int, _ includeDetails: Bool) async throws -> User { get }
                func fetch(id: Int, includeDetails: Bool) async throws -> User
            }
        }
    "#]]
    .assert_eq(&render(&decl));
}

#[test]
fn private_properties_excluded() {
    let decl = InputDeclaration::record("Client").with_members([
        RawMember::variable("publicProp").with_type(named("String")),
        RawMember::variable("privateProp")
            .with_type(named("Int"))
            .with_visibility(Visibility::Private),
    ]);

    let spec = expand(&decl).interface.unwrap();
    assert_eq!(spec.requirements.len(), 1);
    let prop = spec.property("publicProp").unwrap();
    assert_eq!(prop.access, AccessMode::ReadWrite);
}

#[test]
fn empty_record_emits_nothing() {
    let expansion = expand(&InputDeclaration::record("EmptyStruct"));
    assert_eq!(expansion.interface, None);
    assert!(expansion.diagnostics.is_empty());
}

#[test]
fn only_static_or_private_members_emit_nothing() {
    let static_only = InputDeclaration::record("StaticOnly").with_members([
        RawMember::constant("shared")
            .with_initializer(Initializer::expression("StaticOnly()"))
            .into_static(),
        RawMember::variable("config")
            .with_initializer(Initializer::literal(LiteralKind::String, "\"default\""))
            .into_static(),
    ]);
    let private_only = InputDeclaration::record("PrivateOnly").with_members([
        RawMember::variable("secret")
            .with_type(named("String"))
            .with_visibility(Visibility::Private),
        RawMember::constant("hidden")
            .with_type(named("Int"))
            .with_visibility(Visibility::FilePrivate),
    ]);

    for decl in [static_only, private_only] {
        let expansion = expand(&decl);
        assert_eq!(expansion.interface, None, "{}", decl.name);
        assert!(expansion.diagnostics.is_empty());
    }
}

#[test]
fn reference_type_is_rejected() {
    let decl = InputDeclaration::new("MyClass", DeclKind::ReferenceType)
        .with_member(RawMember::variable("property").with_type(named("String")))
        .with_span(Span::new(0, 48));

    let expansion = expand(&decl);
    assert!(expansion.interface.is_none());
    assert!(expansion.has_errors());
    assert_eq!(expansion.diagnostics.len(), 1);

    let diagnostic = &expansion.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.span, Span::new(0, 48));
    assert!(diagnostic.message.contains("reference-type"));
}

#[test]
fn sum_type_and_isolation_unit_are_rejected() {
    for (kind, keyword) in [
        (DeclKind::SumType, "enum"),
        (DeclKind::IsolationUnit, "actor"),
        (DeclKind::Other("extension".to_string()), "extension"),
    ] {
        let expansion = expand(&InputDeclaration::new("Target", kind.clone()));
        assert_eq!(expansion.diagnostics.len(), 1);
        let message = &expansion.diagnostics[0].message;
        assert!(
            message.contains(&format!("applied to {keyword} ({})", kind.name())),
            "{message}"
        );
    }
}

#[test]
fn mutability_rules() {
    let decl = InputDeclaration::record("Config").with_members([
        RawMember::constant("constantValue").with_type(named("String")),
        RawMember::variable("mutableValue").with_type(named("Int")),
        RawMember::new("computed", Storage::Computed(AccessorBlock::Getter))
            .with_type(named("String")),
        RawMember::new(
            "proxied",
            Storage::Computed(AccessorBlock::Accessors(vec![Accessor::Get, Accessor::Set])),
        )
        .with_type(named("Int")),
        RawMember::variable("counter")
            .with_type(named("Int"))
            .with_visibility(Visibility::Public)
            .with_setter_visibility(Visibility::Private),
    ]);

    let spec = expand(&decl).interface.unwrap();
    let modes: Vec<_> = spec.properties().map(|p| (p.name.as_str(), p.access)).collect();
    assert_eq!(
        modes,
        vec![
            ("constantValue", AccessMode::ReadOnly),
            ("mutableValue", AccessMode::ReadWrite),
            ("computed", AccessMode::ReadOnly),
            ("proxied", AccessMode::ReadWrite),
            ("counter", AccessMode::ReadOnly),
        ]
    );
}

#[test]
fn literal_initializers_are_typed_and_others_dropped() {
    let decl = InputDeclaration::record("Defaults").with_members([
        RawMember::variable("enabled").with_initializer(Initializer::literal(LiteralKind::Boolean, "true")),
        RawMember::variable("ratio").with_initializer(Initializer::literal(LiteralKind::Float, "0.5")),
        RawMember::variable("retries").with_initializer(Initializer::literal(LiteralKind::Integer, "3")),
        RawMember::constant("name").with_initializer(Initializer::literal(LiteralKind::String, "\"n\"")),
        RawMember::variable("service").with_initializer(Initializer::expression("Service()")),
    ]);

    expect![[r#"
        extension Defaults {
            protocol `Protocol` {
                var enabled: Bool { get set }
                var ratio: Double { get set }
                var retries: Int { get set }
                var name: String { get }
            }
        }
    "#]]
    .assert_eq(&render(&decl));
}

#[test]
fn visibility_is_copied_from_the_record() {
    let decl = InputDeclaration::record("PackageClient")
        .with_visibility(Visibility::Package)
        .with_member(
            RawMember::variable("endpoint")
                .with_type(named("String"))
                .with_visibility(Visibility::Public),
        );

    let spec = expand(&decl).interface.unwrap();
    assert_eq!(spec.visibility, Visibility::Package);
    expect![[r#"
        package extension PackageClient {
            package protocol `Protocol` {
                var endpoint: String { get set }
            }
        }
    "#]]
    .assert_eq(&render(&decl));
}

#[test]
fn typed_throws_and_sync_methods() {
    let decl = InputDeclaration::record("Store").with_members([
        RawMember::variable("load").with_type(closure(
            vec![FunctionParam::labeled("key", named("String"))],
            Effects {
                is_async: false,
                throws: true,
                thrown_type: Some("StoreError".to_string()),
            },
            "Data",
        )),
        RawMember::variable("clear").with_type(closure(
            vec![FunctionParam::with_names("all", "flag", named("Bool"))],
            Effects::none(),
            "Void",
        )),
    ]);

    let spec = expand(&decl).interface.unwrap();
    let methods: Vec<_> = spec.methods().map(ToString::to_string).collect();
    assert_eq!(
        methods,
        vec![
            "func load(key: String) throws(StoreError) -> Data",
            "func clear(all: Bool) -> Void",
        ]
    );
}

#[test]
fn expansion_serializes_to_json() {
    let decl = InputDeclaration::record("Client")
        .with_member(RawMember::constant("id").with_type(named("UUID")));
    let json = serde_json_value(&expand(&decl));
    assert_eq!(json["interface"]["origin"], "Client");
    assert_eq!(json["interface"]["requirements"][0]["requirement"], "property");
    assert_eq!(json["interface"]["requirements"][0]["type"], "UUID");
    assert_eq!(json["interface"]["requirements"][0]["access"], "read-only");
}

fn serde_json_value(expansion: &protocol_mirror::Expansion) -> serde_json::Value {
    serde_json::to_value(expansion).expect("serializable")
}
