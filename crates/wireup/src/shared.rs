//! Shared-instance fan-out registration.
//!
//! When one implementation serves several contracts and every contract must
//! observe the same instance, the implementation is registered once as
//! itself and each contract becomes an alias forwarding to it. The
//! [`register_shared!`](crate::register_shared) macro stamps that shape out.
//!
//! Only singleton and scoped lifetimes are supported here: a transient
//! produces a fresh instance per resolution, so there is no shared instance
//! to fan out and per-contract registrations express it directly.

/// Registers `$impl` once and aliases each listed contract to it.
///
/// ```
/// trait Greeter {}
/// trait Farewell {}
/// struct Console;
/// impl Greeter for Console {}
/// impl Farewell for Console {}
///
/// let mut services = wireup::ServiceCollection::new();
/// wireup::register_shared!(services, singleton, Console => [dyn Greeter, dyn Farewell]);
/// wireup::register_shared!(services, scoped, key = "aux", Console => [dyn Greeter]);
///
/// assert_eq!(services.len(), 5);
/// assert!(services.contains::<dyn Greeter>());
/// assert!(services.has_implementation::<Console>());
/// ```
#[macro_export]
macro_rules! register_shared {
    ($services:expr, singleton, $impl:ty => [$($contract:ty),+ $(,)?]) => {
        $crate::register_shared!(@unkeyed $services, add_singleton_self, add_singleton_alias, $impl, $($contract),+)
    };
    ($services:expr, scoped, $impl:ty => [$($contract:ty),+ $(,)?]) => {
        $crate::register_shared!(@unkeyed $services, add_scoped_self, add_scoped_alias, $impl, $($contract),+)
    };
    ($services:expr, singleton, key = $key:expr, $impl:ty => [$($contract:ty),+ $(,)?]) => {
        $crate::register_shared!(@keyed $services, $key, add_keyed_singleton_self, add_keyed_singleton_alias, $impl, $($contract),+)
    };
    ($services:expr, scoped, key = $key:expr, $impl:ty => [$($contract:ty),+ $(,)?]) => {
        $crate::register_shared!(@keyed $services, $key, add_keyed_scoped_self, add_keyed_scoped_alias, $impl, $($contract),+)
    };
    (@unkeyed $services:expr, $self_method:ident, $alias_method:ident, $impl:ty, $($contract:ty),+) => {{
        let services = &mut $services;
        services.$self_method::<$impl>();
        $( services.$alias_method::<$contract, $impl>(); )+
    }};
    (@keyed $services:expr, $key:expr, $self_method:ident, $alias_method:ident, $impl:ty, $($contract:ty),+) => {{
        let services = &mut $services;
        let key: ::std::string::String = ::std::convert::Into::into($key);
        services.$self_method::<$impl>(key.as_str());
        $( services.$alias_method::<$contract, $impl>(key.as_str()); )+
    }};
}

#[cfg(test)]
mod tests {
    use crate::{ImplTarget, Lifetime, ServiceCollection};

    trait Reader {}
    trait Writer {}
    struct Store;
    impl Reader for Store {}
    impl Writer for Store {}

    #[test]
    fn test_fan_out_registers_self_then_one_alias_per_contract() {
        let mut services = ServiceCollection::new();
        register_shared!(services, singleton, Store => [dyn Reader, dyn Writer]);

        assert_eq!(services.len(), 3);
        assert!(services.has_implementation::<Store>());
        assert!(services.contains::<dyn Reader>());
        assert!(services.contains::<dyn Writer>());

        let kinds: Vec<bool> = services
            .iter()
            .map(|r| matches!(r.implementation, ImplTarget::Alias { .. }))
            .collect();
        assert_eq!(kinds, vec![false, true, true]);
    }

    #[test]
    fn test_keyed_fan_out_keeps_key_and_lifetime_on_every_record() {
        let mut services = ServiceCollection::new();
        register_shared!(services, scoped, key = "main", Store => [dyn Reader, dyn Writer]);

        assert_eq!(services.len(), 3);
        for registration in &services {
            assert_eq!(registration.lifetime, Lifetime::Scoped);
            assert_eq!(registration.key.as_deref(), Some("main"));
        }
        assert!(services.contains_keyed::<dyn Reader>("main"));
        assert!(!services.contains_keyed::<dyn Reader>("other"));
    }

    #[test]
    fn test_works_through_a_mutable_reference() {
        fn install(services: &mut ServiceCollection) {
            register_shared!(*services, singleton, Store => [dyn Reader]);
        }

        let mut services = ServiceCollection::new();
        install(&mut services);
        assert_eq!(services.len(), 2);
    }
}
