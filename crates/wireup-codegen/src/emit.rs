//! Artifact emission.
//!
//! Renders a [`Plan`] into the single generated source artifact: one module
//! wrapping one extension trait and its impl on `::wireup::ServiceCollection`.
//! Emission is plain string building over already ordered input; identical
//! plans produce byte-identical text.

use heck::ToUpperCamelCase;

use crate::model::{ContractRef, ServiceDescriptor};
use crate::plan::{Plan, PlannedRegistration, Shape};

/// Resolved settings for one emission.
#[derive(Debug, Clone)]
pub struct EmitSettings {
    /// Module the artifact is wrapped in.
    pub namespace: String,
    /// Extension method name; the trait name is its PascalCase form.
    pub method_name: String,
    /// `pub(crate)` surface instead of `pub`.
    pub internal: bool,
}

impl EmitSettings {
    fn visibility(&self) -> &'static str {
        if self.internal { "pub(crate)" } else { "pub" }
    }

    fn trait_name(&self) -> String {
        self.method_name.to_upper_camel_case()
    }
}

/// Renders the generated registration artifact.
pub fn emit(plan: &Plan, settings: &EmitSettings) -> String {
    let vis = settings.visibility();
    let trait_name = settings.trait_name();
    let method = &settings.method_name;

    let mut out = String::new();
    out.push_str("// @generated by wiregen. Do not edit.\n\n");
    out.push_str(&format!("{vis} mod {} {{\n", settings.namespace));
    out.push_str(&format!(
        "    /// Registration extension generated from service marker attributes.\n\
         \x20   {vis} trait {trait_name} {{\n\
         \x20       /// Performs every planned registration, skipping category-gated\n\
         \x20       /// entries whose category is not in `categories`.\n\
         \x20       fn {method}(&mut self, categories: &[&str]) -> &mut Self;\n\
         \x20   }}\n\n"
    ));
    out.push_str(&format!(
        "    impl {trait_name} for ::wireup::ServiceCollection {{\n\
         \x20       fn {method}(&mut self, categories: &[&str]) -> &mut Self {{\n"
    ));

    let any_gated = plan
        .registrations
        .iter()
        .any(|p| p.descriptor.category.is_some());
    if !any_gated {
        out.push_str("            let _ = categories;\n");
    }

    for planned in &plan.registrations {
        push_registration(&mut out, planned);
    }

    out.push_str("            self\n        }\n    }\n}\n");
    out
}

fn push_registration(out: &mut String, planned: &PlannedRegistration) {
    let lines = registration_lines(planned);
    match &planned.descriptor.category {
        Some(category) => {
            out.push_str(&format!(
                "            if categories.iter().any(|c| c.eq_ignore_ascii_case({})) {{\n",
                quoted(category)
            ));
            for line in &lines {
                out.push_str("                ");
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("            }\n");
        }
        None => {
            for line in &lines {
                out.push_str("            ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
}

/// The registration statements for one planned descriptor, unindented.
/// Category gating changes whether these run, never what they say.
fn registration_lines(planned: &PlannedRegistration) -> Vec<String> {
    let descriptor = &planned.descriptor;
    match &planned.shape {
        Shape::ClosedSelf => vec![closed_call(descriptor, None)],
        Shape::ClosedPair(contract) => vec![closed_call(descriptor, Some(contract))],
        Shape::SharedFanOut(contracts) => vec![shared_call(descriptor, contracts)],
        Shape::TransientFanOut(contracts) => contracts
            .iter()
            .map(|contract| closed_call(descriptor, Some(contract)))
            .collect(),
        Shape::OpenSelf => vec![open_self_call(descriptor)],
        Shape::OpenPair(contract) => vec![open_pair_call(descriptor, contract)],
        Shape::OpenFanOut(contracts) => contracts
            .iter()
            .map(|contract| open_pair_call(descriptor, contract))
            .collect(),
    }
}

fn closed_call(descriptor: &ServiceDescriptor, contract: Option<&ContractRef>) -> String {
    let method = call_name(descriptor, contract.is_none(), false);
    let impl_path = descriptor.identity.emit_path();
    let generics = match contract {
        Some(contract) => format!("dyn {}, {impl_path}", contract.rendered()),
        None => impl_path,
    };
    let args = match &descriptor.key {
        Some(key) => quoted(key),
        None => String::new(),
    };
    format!("self.{method}::<{generics}>({args});")
}

fn shared_call(descriptor: &ServiceDescriptor, contracts: &[ContractRef]) -> String {
    let rendered: Vec<String> = contracts
        .iter()
        .map(|c| format!("dyn {}", c.rendered()))
        .collect();
    let key_clause = match &descriptor.key {
        Some(key) => format!("key = {}, ", quoted(key)),
        None => String::new(),
    };
    format!(
        "::wireup::register_shared!(*self, {}, {key_clause}{} => [{}]);",
        descriptor.lifetime.method_suffix(),
        descriptor.identity.emit_path(),
        rendered.join(", ")
    )
}

fn open_self_call(descriptor: &ServiceDescriptor) -> String {
    let method = call_name(descriptor, true, true);
    let type_ref = type_ref(&descriptor.identity.emit_path(), descriptor.identity.arity);
    match &descriptor.key {
        Some(key) => format!("self.{method}({type_ref}, {});", quoted(key)),
        None => format!("self.{method}({type_ref});"),
    }
}

fn open_pair_call(descriptor: &ServiceDescriptor, contract: &ContractRef) -> String {
    let method = call_name(descriptor, false, true);
    let contract_ref = type_ref(&contract.path, contract.arity());
    let impl_ref = type_ref(&descriptor.identity.emit_path(), descriptor.identity.arity);
    match &descriptor.key {
        Some(key) => format!("self.{method}({contract_ref}, {impl_ref}, {});", quoted(key)),
        None => format!("self.{method}({contract_ref}, {impl_ref});"),
    }
}

/// Composes a collection method name: `{try_}add{_keyed}{_open}_{lifetime}{_self}`.
fn call_name(descriptor: &ServiceDescriptor, self_form: bool, open: bool) -> String {
    let mut name = String::from(if descriptor.try_add { "try_add" } else { "add" });
    if descriptor.key.is_some() {
        name.push_str("_keyed");
    }
    if open {
        name.push_str("_open");
    }
    name.push('_');
    name.push_str(descriptor.lifetime.method_suffix());
    if self_form {
        name.push_str("_self");
    }
    name
}

fn type_ref(path: &str, arity: usize) -> String {
    format!("::wireup::TypeRef::new({}, {arity})", quoted(path))
}

fn quoted(value: &str) -> String {
    format!("{value:?}")
}
