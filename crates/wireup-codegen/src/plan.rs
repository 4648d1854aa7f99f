//! Registration planning.
//!
//! Takes the resolved descriptors in scan order, deduplicates them by type
//! identity (first seen wins), files one diagnostic per conflicted
//! descriptor while excluding it, and decides the registration shape each
//! surviving descriptor is emitted with.

use std::collections::HashSet;

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::model::{ContractRef, Lifetime, ServiceDescriptor};

/// How one descriptor is rendered into registration calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Closed type, no contracts: implementation-only registration.
    ClosedSelf,
    /// Closed type, exactly one contract: one pair registration.
    ClosedPair(ContractRef),
    /// Closed type, several contracts, singleton or scoped: one
    /// implementation registration plus per-contract aliases sharing the
    /// instance.
    SharedFanOut(Vec<ContractRef>),
    /// Closed transient with several contracts: independent pair
    /// registrations, one fresh instance per contract per resolution.
    TransientFanOut(Vec<ContractRef>),
    /// Open generic, no contracts: the open type registered by reference.
    OpenSelf,
    /// Open generic with one contract: open pair by type reference.
    OpenPair(ContractRef),
    /// Open generic, several contracts, unkeyed: one open pair per
    /// contract.
    OpenFanOut(Vec<ContractRef>),
}

/// One descriptor with its decided shape.
#[derive(Debug)]
pub struct PlannedRegistration {
    /// The descriptor being registered.
    pub descriptor: ServiceDescriptor,
    /// The registration shape the emitter renders.
    pub shape: Shape,
}

/// Output of planning: what to emit and what to report.
#[derive(Debug, Default)]
pub struct Plan {
    /// Registrations in first-seen scan order.
    pub registrations: Vec<PlannedRegistration>,
    /// Diagnostics for excluded descriptors.
    pub diagnostics: Vec<Diagnostic>,
}

/// Plans every descriptor: dedup, conflict filtering, shape decision.
pub fn plan(descriptors: Vec<ServiceDescriptor>) -> Plan {
    let mut plan = Plan::default();
    let mut seen = HashSet::new();

    for descriptor in descriptors {
        if !seen.insert(descriptor.identity.qualified()) {
            debug!(
                type_name = %descriptor.identity,
                "duplicate marker for an already planned type; first wins"
            );
            continue;
        }
        if descriptor.has_conflict() {
            plan.diagnostics
                .push(Diagnostic::conflicting_configuration(&descriptor));
            continue;
        }
        let shape = decide_shape(&descriptor);
        plan.registrations.push(PlannedRegistration { descriptor, shape });
    }
    plan
}

fn decide_shape(descriptor: &ServiceDescriptor) -> Shape {
    let mut contracts = descriptor.contracts.clone();
    if descriptor.is_open_generic() {
        match contracts.len() {
            0 => Shape::OpenSelf,
            1 => Shape::OpenPair(contracts.remove(0)),
            // keyed registration has no multi-contract form; the open type
            // goes in alone under the key
            _ if descriptor.key.is_some() => Shape::OpenSelf,
            _ => Shape::OpenFanOut(contracts),
        }
    } else {
        match contracts.len() {
            0 => Shape::ClosedSelf,
            1 => Shape::ClosedPair(contracts.remove(0)),
            _ if descriptor.lifetime == Lifetime::Transient => Shape::TransientFanOut(contracts),
            _ => Shape::SharedFanOut(contracts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourceLocation, TypeIdentity};

    fn descriptor(name: &str, arity: usize) -> ServiceDescriptor {
        ServiceDescriptor {
            identity: TypeIdentity {
                name: name.into(),
                module: String::new(),
                arity,
            },
            lifetime: Lifetime::Singleton,
            key: None,
            category: None,
            try_add: false,
            as_self: false,
            explicit_contract: None,
            contracts: Vec::new(),
            location: SourceLocation {
                file: "lib.rs".into(),
                line: 1,
                column: 0,
            },
        }
    }

    fn contracts(names: &[&str]) -> Vec<ContractRef> {
        names.iter().map(|n| ContractRef::plain(*n)).collect()
    }

    #[test]
    fn test_first_seen_configuration_wins() {
        let mut first = descriptor("Svc", 0);
        first.lifetime = Lifetime::Scoped;
        let mut second = descriptor("Svc", 0);
        second.lifetime = Lifetime::Transient;

        let plan = plan(vec![first, second]);
        assert_eq!(plan.registrations.len(), 1);
        assert_eq!(plan.registrations[0].descriptor.lifetime, Lifetime::Scoped);
    }

    #[test]
    fn test_conflicted_descriptors_are_excluded_with_one_diagnostic() {
        let mut conflicted = descriptor("Bad", 0);
        conflicted.as_self = true;
        conflicted.explicit_contract = Some(ContractRef::plain("crate::Api"));
        let clean = descriptor("Good", 0);

        let plan = plan(vec![conflicted, clean]);
        assert_eq!(plan.registrations.len(), 1);
        assert_eq!(plan.registrations[0].descriptor.identity.name, "Good");
        assert_eq!(plan.diagnostics.len(), 1);
        assert!(plan.diagnostics[0].message.contains("Bad"));
    }

    #[test]
    fn test_closed_shapes_follow_contract_count_and_lifetime() {
        let alone = descriptor("Alone", 0);
        let mut single = descriptor("Single", 0);
        single.contracts = contracts(&["crate::A"]);
        let mut shared = descriptor("Shared", 0);
        shared.contracts = contracts(&["crate::A", "crate::B"]);
        let mut transient = descriptor("Indep", 0);
        transient.lifetime = Lifetime::Transient;
        transient.contracts = contracts(&["crate::A", "crate::B"]);

        let plan = plan(vec![alone, single, shared, transient]);
        assert_eq!(plan.registrations[0].shape, Shape::ClosedSelf);
        assert_eq!(
            plan.registrations[1].shape,
            Shape::ClosedPair(ContractRef::plain("crate::A"))
        );
        assert!(matches!(plan.registrations[2].shape, Shape::SharedFanOut(ref c) if c.len() == 2));
        assert!(
            matches!(plan.registrations[3].shape, Shape::TransientFanOut(ref c) if c.len() == 2)
        );
    }

    #[test]
    fn test_open_shapes_and_the_keyed_multi_contract_limitation() {
        let open_alone = descriptor("Repo", 1);
        let mut open_pair = descriptor("Pair", 1);
        open_pair.contracts = contracts(&["crate::A"]);
        let mut open_fan = descriptor("Fan", 1);
        open_fan.contracts = contracts(&["crate::A", "crate::B"]);
        let mut open_keyed = descriptor("Keyed", 1);
        open_keyed.key = Some("k".into());
        open_keyed.contracts = contracts(&["crate::A", "crate::B"]);

        let plan = plan(vec![open_alone, open_pair, open_fan, open_keyed]);
        assert_eq!(plan.registrations[0].shape, Shape::OpenSelf);
        assert_eq!(
            plan.registrations[1].shape,
            Shape::OpenPair(ContractRef::plain("crate::A"))
        );
        assert!(matches!(plan.registrations[2].shape, Shape::OpenFanOut(ref c) if c.len() == 2));
        // keyed multi-contract open generics degrade to self registration
        assert_eq!(plan.registrations[3].shape, Shape::OpenSelf);
    }
}
