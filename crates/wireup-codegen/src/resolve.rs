//! Contract resolution.
//!
//! Completes a [`DescriptorSeed`] into a [`ServiceDescriptor`] by deciding
//! the contract list. Exactly one source determines it: `as_self` clears
//! it, a verified explicit override narrows it to one contract, and
//! otherwise the type's full filtered trait list applies. An override that
//! cannot be tied to the type falls back to the full list rather than
//! dropping the registration; misconfiguration degrades, it never erases.

use tracing::debug;

use crate::extract::DescriptorSeed;
use crate::model::ServiceDescriptor;
use crate::symbols::{ContractVerdict, Scope, SymbolGraph};

/// Resolves the contract list for one extracted seed.
///
/// Open-generic arity is carried as declared on each side; a mismatch
/// between implementation and contract arity is left undefined and emitted
/// as resolved, without a diagnostic.
pub fn resolve(seed: DescriptorSeed, graph: &SymbolGraph) -> ServiceDescriptor {
    let scope = Scope {
        file: &seed.file,
        module: &seed.identity.module,
    };

    let mut explicit_contract = None;
    let contracts = if seed.as_self {
        Vec::new()
    } else if let Some(written) = &seed.explicit_contract {
        match graph.verify_contract(written, &seed.identity, scope) {
            ContractVerdict::SelfType => {
                explicit_contract = Some(crate::model::ContractRef::plain(
                    seed.identity.emit_path(),
                ));
                Vec::new()
            }
            ContractVerdict::Implemented(contract) => {
                explicit_contract = Some(contract.clone());
                vec![contract]
            }
            ContractVerdict::Unverified(contract) => {
                debug!(
                    type_name = %seed.identity,
                    contract = %contract,
                    "explicit contract not implemented by the type; \
                     falling back to the full contract list"
                );
                explicit_contract = Some(contract);
                graph.contracts_of(&seed.identity)
            }
        }
    } else {
        graph.contracts_of(&seed.identity)
    };

    // conflict detection needs the override's presence even when as_self
    // already cleared the contract list
    if explicit_contract.is_none() {
        explicit_contract = seed
            .explicit_contract
            .map(crate::model::ContractRef::plain);
    }

    ServiceDescriptor {
        identity: seed.identity,
        lifetime: seed.lifetime,
        key: seed.key,
        category: seed.category,
        try_add: seed.try_add,
        as_self: seed.as_self,
        explicit_contract,
        contracts,
        location: seed.location,
    }
}
