//! End-to-end generation scenarios: annotated source text in, generated
//! registration text out.

use wireup_codegen::{GeneratorOptions, SourceSet, generate};

fn run(content: &str) -> wireup_codegen::Generation {
    let sources = SourceSet::new().with_source("lib.rs", content);
    generate(&sources, &GeneratorOptions::default()).unwrap()
}

#[test]
fn test_implementation_only_singleton() {
    let generation = run(
        r"
        #[singleton]
        pub struct ImplementationOnly;
        ",
    );
    assert!(!generation.has_errors());
    assert!(
        generation
            .code
            .contains("self.add_singleton_self::<crate::ImplementationOnly>();")
    );
}

#[test]
fn test_keyed_transient_implementation_only() {
    let generation = run(
        r#"
        #[transient(key = "ImplOnly")]
        pub struct KeyedImplementationOnly;
        "#,
    );
    assert!(generation.code.contains(
        "self.add_keyed_transient_self::<crate::KeyedImplementationOnly>(\"ImplOnly\");"
    ));
}

#[test]
fn test_multiple_interfaces_share_one_implementation() {
    let generation = run(
        r"
        pub trait IStandardInterface {}
        pub trait IStandardInterface2 {}
        #[singleton]
        pub struct MultipleImplementation;
        impl IStandardInterface for MultipleImplementation {}
        impl IStandardInterface2 for MultipleImplementation {}
        ",
    );
    assert!(generation.code.contains(
        "::wireup::register_shared!(*self, singleton, crate::MultipleImplementation => \
         [dyn crate::IStandardInterface, dyn crate::IStandardInterface2]);"
    ));
}

#[test]
fn test_explicit_contract_narrows_to_exactly_one_registration() {
    let generation = run(
        r"
        pub trait IStandardInterface {}
        pub trait IStandardInterface2 {}
        #[singleton(contract = IStandardInterface2)]
        pub struct Narrowed;
        impl IStandardInterface for Narrowed {}
        impl IStandardInterface2 for Narrowed {}
        ",
    );
    assert!(
        generation
            .code
            .contains("self.add_singleton::<dyn crate::IStandardInterface2, crate::Narrowed>();")
    );
    assert!(!generation.code.contains("dyn crate::IStandardInterface,"));
    assert!(!generation.code.contains("register_shared!"));
}

#[test]
fn test_conflicting_directives_exclude_the_type_and_report_once() {
    let generation = run(
        r"
        pub trait Api {}
        #[singleton(as_self, contract = Api)]
        pub struct Conflicted;
        impl Api for Conflicted {}
        ",
    );
    assert!(generation.has_errors());
    assert_eq!(generation.diagnostics.len(), 1);
    let diagnostic = &generation.diagnostics[0];
    assert_eq!(diagnostic.code, "WG0001");
    assert!(diagnostic.message.contains("Conflicted"));
    assert!(!generation.code.contains("Conflicted"));
}

#[test]
fn test_as_self_ignores_every_declared_interface() {
    let generation = run(
        r"
        pub trait A {}
        pub trait B {}
        #[scoped(as_self)]
        pub struct SelfOnly;
        impl A for SelfOnly {}
        impl B for SelfOnly {}
        ",
    );
    assert!(
        generation
            .code
            .contains("self.add_scoped_self::<crate::SelfOnly>();")
    );
    assert!(!generation.code.contains("dyn crate::A"));
}

#[test]
fn test_open_generic_pair_stays_open() {
    let generation = run(
        r"
        pub trait IBar<T> {}
        #[scoped]
        pub struct Foo<T>(T);
        impl<T> IBar<T> for Foo<T> {}
        ",
    );
    assert!(generation.code.contains(
        "self.add_open_scoped(::wireup::TypeRef::new(\"crate::IBar\", 1), \
         ::wireup::TypeRef::new(\"crate::Foo\", 1));"
    ));
}

#[test]
fn test_category_gate_wraps_without_changing_the_call() {
    let generation = run(
        r#"
        pub trait Api {}
        #[scoped(category = "Web")]
        pub struct WebApi;
        impl Api for WebApi {}
        "#,
    );
    let gated = generation.code;
    let gate_pos = gated
        .find("if categories.iter().any(|c| c.eq_ignore_ascii_case(\"Web\")) {")
        .expect("gate missing");
    let call_pos = gated
        .find("self.add_scoped::<dyn crate::Api, crate::WebApi>();")
        .expect("call missing");
    assert!(call_pos > gate_pos);
}

#[test]
fn test_dedup_keeps_the_first_seen_configuration_for_a_type() {
    // two scanned declarations of the same qualified type (re-scanned or
    // duplicated input); first seen wins, the later one is dropped
    let sources = SourceSet::new()
        .with_source("lib.rs", "#[scoped]\npub struct Svc;")
        .with_source("lib.rs", "#[transient]\npub struct Svc;");
    let generation = generate(&sources, &GeneratorOptions::default()).unwrap();
    assert!(generation.code.contains("self.add_scoped_self::<crate::Svc>();"));
    assert!(!generation.code.contains("add_transient_self::<crate::Svc>"));
}

#[test]
fn test_emitted_paths_carry_file_derived_modules() {
    let sources = SourceSet::new()
        .with_source("contracts.rs", "pub trait Api {}")
        .with_source(
            "services.rs",
            r"
            use crate::contracts::Api;
            #[singleton]
            pub struct Svc;
            impl Api for Svc {}
            ",
        );
    let generation = generate(&sources, &GeneratorOptions::default()).unwrap();
    assert!(
        generation
            .code
            .contains("self.add_singleton::<dyn crate::contracts::Api, crate::services::Svc>();")
    );
}

#[test]
fn test_try_add_emits_the_idempotent_form() {
    let generation = run(
        r"
        pub trait Api {}
        #[singleton(try_add)]
        pub struct Careful;
        impl Api for Careful {}
        ",
    );
    assert!(
        generation
            .code
            .contains("self.try_add_singleton::<dyn crate::Api, crate::Careful>();")
    );
}

#[test]
fn test_legacy_service_form_still_registers() {
    let generation = run(
        r#"
        pub trait Api {}
        #[service(Lifetime::Transient, "legacy")]
        pub struct Old;
        impl Api for Old {}
        "#,
    );
    assert!(
        generation
            .code
            .contains("self.add_keyed_transient::<dyn crate::Api, crate::Old>(\"legacy\");")
    );
}

#[test]
fn test_namespace_and_method_options_shape_the_artifact() {
    let sources = SourceSet::new()
        .with_source("lib.rs", "#[singleton]\npub struct Svc;")
        .with_crate_name("billing");
    let options = GeneratorOptions {
        method_name: Some("install_services".into()),
        ..Default::default()
    };
    let generation = generate(&sources, &options).unwrap();
    assert!(generation.code.contains("pub mod billing {"));
    assert!(generation.code.contains("pub trait InstallServices {"));
    assert!(
        generation
            .code
            .contains("fn install_services(&mut self, categories: &[&str]) -> &mut Self;")
    );
}

#[test]
fn test_byte_identical_output_across_repeated_runs() {
    let content = r#"
        pub trait Api {}
        pub trait Audit {}
        #[singleton]
        pub struct A;
        impl Api for A {}
        #[scoped(category = "Ops")]
        pub struct B;
        impl Audit for B {}
        #[transient(key = "x")]
        pub struct C;
        "#;
    let first = run(content).code;
    for _ in 0..3 {
        assert_eq!(run(content).code, first);
    }
}
