//! Runtime registration surface for wireup-generated code.
//!
//! The code emitted by `wireup-codegen` registers services into a
//! [`ServiceCollection`]: an ordered recorder of registrations covering the
//! three lifetimes, keyed and unkeyed forms, idempotent try-add forms, and
//! open-generic registrations by type reference. Resolving registrations
//! into instances is a container concern and lives outside this crate.
//!
//! ## Registering generated modules
//!
//! Every crate that runs the generator produces one registration extension.
//! Crates can contribute their extension to the process-wide module slice
//! and have the host drain all of them once while assembling its container:
//!
//! ```ignore
//! #[linkme::distributed_slice(wireup::GENERATED_MODULES)]
//! static MODULE: wireup::ModuleEntry = wireup::ModuleEntry {
//!     name: "billing",
//!     install: |services, categories| {
//!         use crate::generated::AddGeneratedServices;
//!         services.add_generated_services(categories);
//!     },
//! };
//!
//! // host side, exactly once per composition phase:
//! let queue = wireup::ModuleQueue::from_linked();
//! let mut services = wireup::ServiceCollection::new();
//! queue.drain_into(&mut services, &["Web"]);
//! ```

mod collection;
mod lifetime;
mod modules;
mod shared;
mod type_ref;

pub use collection::{ImplTarget, Registration, ServiceCollection, ServiceKey};
pub use lifetime::Lifetime;
pub use modules::{GENERATED_MODULES, InstallFn, ModuleEntry, ModuleQueue};
pub use type_ref::TypeRef;
