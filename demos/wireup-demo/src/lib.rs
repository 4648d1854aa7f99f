//! wireup end-to-end sample.
//!
//! `build.rs` runs the generator over this crate's sources and writes the
//! registration artifact into `OUT_DIR`; the include below pulls it in as
//! the `generated` module. The module entry at the bottom contributes the
//! generated install function to the process-wide slice so a host can
//! assemble every module with one [`wireup::ModuleQueue`] drain.

pub mod contracts;
pub mod services;

include!(concat!(env!("OUT_DIR"), "/wireup_generated.rs"));

pub use generated::AddGeneratedServices;

#[linkme::distributed_slice(wireup::GENERATED_MODULES)]
static MODULE: wireup::ModuleEntry = wireup::ModuleEntry {
    name: "wireup-demo",
    install: |services, categories| {
        services.add_generated_services(categories);
    },
};
