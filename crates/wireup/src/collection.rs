//! Ordered recorder of service registrations.
//!
//! [`ServiceCollection`] is the surface generated code writes into. It keeps
//! every registration in insertion order and never resolves anything; a
//! container built on top of it decides how to construct and cache
//! instances. The method grid mirrors the three lifetimes crossed with
//! keyed, self, idempotent and open-generic forms.

use std::any::{TypeId, type_name};
use std::fmt;
use std::slice;

use crate::lifetime::Lifetime;
use crate::type_ref::TypeRef;

/// Identity of the contract a registration satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKey {
    /// A fully applied type, identified by its [`TypeId`].
    Closed {
        /// Runtime identity of the contract type.
        id: TypeId,
        /// Human-readable name, for logs and diagnostics only.
        name: &'static str,
    },
    /// An open generic, identified symbolically by path and arity.
    Open(TypeRef),
}

impl ServiceKey {
    /// Key for a fully applied contract type.
    pub fn closed<C: ?Sized + 'static>() -> Self {
        Self::Closed {
            id: TypeId::of::<C>(),
            name: type_name::<C>(),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { name, .. } => f.write_str(name),
            Self::Open(type_ref) => type_ref.fmt(f),
        }
    }
}

/// What a registration maps its contract to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImplTarget {
    /// A concrete implementation type the container should construct.
    Ty {
        /// Runtime identity of the implementation type.
        id: TypeId,
        /// Human-readable name, for logs and diagnostics only.
        name: &'static str,
    },
    /// An open generic implementation, recorded symbolically.
    Open(TypeRef),
    /// Forward to the implementation's own registration instead of
    /// constructing a fresh instance. Used when one implementation serves
    /// several contracts and all of them must observe the same instance.
    Alias {
        /// Runtime identity of the aliased implementation type.
        id: TypeId,
        /// Human-readable name, for logs and diagnostics only.
        name: &'static str,
    },
}

impl ImplTarget {
    /// Target constructing the concrete type `T`.
    pub fn ty<T: 'static>() -> Self {
        Self::Ty {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Target forwarding to the registration of `T`.
    pub fn alias<T: 'static>() -> Self {
        Self::Alias {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl fmt::Display for ImplTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ty { name, .. } => f.write_str(name),
            Self::Open(type_ref) => type_ref.fmt(f),
            Self::Alias { name, .. } => write!(f, "alias -> {name}"),
        }
    }
}

/// One recorded service registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The contract this registration satisfies.
    pub contract: ServiceKey,
    /// The implementation backing the contract.
    pub implementation: ImplTarget,
    /// Caching behavior the container should apply.
    pub lifetime: Lifetime,
    /// Optional service key for keyed resolution.
    pub key: Option<String>,
}

/// Ordered collection of service registrations.
///
/// Insertion order is preserved exactly; nothing is merged or reordered.
/// `try_add_*` methods skip the insert when a registration for the same
/// contract and key already exists, everything else appends
/// unconditionally.
#[derive(Debug, Default)]
pub struct ServiceCollection {
    items: Vec<Registration>,
}

macro_rules! lifetime_methods {
    (
        $lifetime:ident, $name:literal:
        $add:ident, $add_self:ident, $add_keyed:ident, $add_keyed_self:ident,
        $try_add:ident, $try_add_self:ident, $try_add_keyed:ident, $try_add_keyed_self:ident,
        $add_open:ident, $add_open_self:ident, $add_keyed_open:ident, $add_keyed_open_self:ident,
        $try_add_open:ident, $try_add_open_self:ident,
        $try_add_keyed_open:ident, $try_add_keyed_open_self:ident,
        $add_alias:ident, $add_keyed_alias:ident $(,)?
    ) => {
        #[doc = concat!("Registers `T` as the ", $name, " implementation of contract `C`.")]
        pub fn $add<C: ?Sized + 'static, T: 'static>(&mut self) -> &mut Self {
            self.push(
                ServiceKey::closed::<C>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Registers `T` as a ", $name, " resolvable as itself.")]
        pub fn $add_self<T: 'static>(&mut self) -> &mut Self {
            self.push(
                ServiceKey::closed::<T>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Registers `T` as the ", $name, " implementation of contract `C` under `key`.")]
        pub fn $add_keyed<C: ?Sized + 'static, T: 'static>(
            &mut self,
            key: impl Into<String>,
        ) -> &mut Self {
            self.push(
                ServiceKey::closed::<C>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Registers `T` as a ", $name, " resolvable as itself under `key`.")]
        pub fn $add_keyed_self<T: 'static>(&mut self, key: impl Into<String>) -> &mut Self {
            self.push(
                ServiceKey::closed::<T>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Like the plain ", $name, " registration, but skipped when contract `C` is already registered without a key.")]
        pub fn $try_add<C: ?Sized + 'static, T: 'static>(&mut self) -> &mut Self {
            self.try_push(
                ServiceKey::closed::<C>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Like the ", $name, " self registration, but skipped when `T` is already registered without a key.")]
        pub fn $try_add_self<T: 'static>(&mut self) -> &mut Self {
            self.try_push(
                ServiceKey::closed::<T>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Like the keyed ", $name, " registration, but skipped when contract `C` is already registered under `key`.")]
        pub fn $try_add_keyed<C: ?Sized + 'static, T: 'static>(
            &mut self,
            key: impl Into<String>,
        ) -> &mut Self {
            self.try_push(
                ServiceKey::closed::<C>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Like the keyed ", $name, " self registration, but skipped when `T` is already registered under `key`.")]
        pub fn $try_add_keyed_self<T: 'static>(&mut self, key: impl Into<String>) -> &mut Self {
            self.try_push(
                ServiceKey::closed::<T>(),
                ImplTarget::ty::<T>(),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Registers an open generic `implementation` as the ", $name, " implementation of the open `contract`.")]
        pub fn $add_open(&mut self, contract: TypeRef, implementation: TypeRef) -> &mut Self {
            self.push(
                ServiceKey::Open(contract),
                ImplTarget::Open(implementation),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Registers an open generic type as a ", $name, " resolvable as itself.")]
        pub fn $add_open_self(&mut self, ty: TypeRef) -> &mut Self {
            self.push(
                ServiceKey::Open(ty),
                ImplTarget::Open(ty),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Registers an open generic ", $name, " pair under `key`.")]
        pub fn $add_keyed_open(
            &mut self,
            contract: TypeRef,
            implementation: TypeRef,
            key: impl Into<String>,
        ) -> &mut Self {
            self.push(
                ServiceKey::Open(contract),
                ImplTarget::Open(implementation),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Registers an open generic type as a ", $name, " resolvable as itself under `key`.")]
        pub fn $add_keyed_open_self(&mut self, ty: TypeRef, key: impl Into<String>) -> &mut Self {
            self.push(
                ServiceKey::Open(ty),
                ImplTarget::Open(ty),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Like the open ", $name, " registration, but skipped when the open contract is already registered without a key.")]
        pub fn $try_add_open(&mut self, contract: TypeRef, implementation: TypeRef) -> &mut Self {
            self.try_push(
                ServiceKey::Open(contract),
                ImplTarget::Open(implementation),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Like the open ", $name, " self registration, but skipped when the type is already registered without a key.")]
        pub fn $try_add_open_self(&mut self, ty: TypeRef) -> &mut Self {
            self.try_push(
                ServiceKey::Open(ty),
                ImplTarget::Open(ty),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Like the keyed open ", $name, " registration, but skipped when the open contract is already registered under `key`.")]
        pub fn $try_add_keyed_open(
            &mut self,
            contract: TypeRef,
            implementation: TypeRef,
            key: impl Into<String>,
        ) -> &mut Self {
            self.try_push(
                ServiceKey::Open(contract),
                ImplTarget::Open(implementation),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Like the keyed open ", $name, " self registration, but skipped when the type is already registered under `key`.")]
        pub fn $try_add_keyed_open_self(
            &mut self,
            ty: TypeRef,
            key: impl Into<String>,
        ) -> &mut Self {
            self.try_push(
                ServiceKey::Open(ty),
                ImplTarget::Open(ty),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }

        #[doc = concat!("Registers contract `C` as a ", $name, " forwarding to the existing registration of `T`.")]
        pub fn $add_alias<C: ?Sized + 'static, T: 'static>(&mut self) -> &mut Self {
            self.push(
                ServiceKey::closed::<C>(),
                ImplTarget::alias::<T>(),
                Lifetime::$lifetime,
                None,
            )
        }

        #[doc = concat!("Registers contract `C` under `key` as a ", $name, " forwarding to the existing registration of `T`.")]
        pub fn $add_keyed_alias<C: ?Sized + 'static, T: 'static>(
            &mut self,
            key: impl Into<String>,
        ) -> &mut Self {
            self.push(
                ServiceKey::closed::<C>(),
                ImplTarget::alias::<T>(),
                Lifetime::$lifetime,
                Some(key.into()),
            )
        }
    };
}

impl ServiceCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    lifetime_methods!(
        Singleton, "singleton":
        add_singleton, add_singleton_self, add_keyed_singleton, add_keyed_singleton_self,
        try_add_singleton, try_add_singleton_self,
        try_add_keyed_singleton, try_add_keyed_singleton_self,
        add_open_singleton, add_open_singleton_self,
        add_keyed_open_singleton, add_keyed_open_singleton_self,
        try_add_open_singleton, try_add_open_singleton_self,
        try_add_keyed_open_singleton, try_add_keyed_open_singleton_self,
        add_singleton_alias, add_keyed_singleton_alias,
    );

    lifetime_methods!(
        Scoped, "scoped":
        add_scoped, add_scoped_self, add_keyed_scoped, add_keyed_scoped_self,
        try_add_scoped, try_add_scoped_self,
        try_add_keyed_scoped, try_add_keyed_scoped_self,
        add_open_scoped, add_open_scoped_self,
        add_keyed_open_scoped, add_keyed_open_scoped_self,
        try_add_open_scoped, try_add_open_scoped_self,
        try_add_keyed_open_scoped, try_add_keyed_open_scoped_self,
        add_scoped_alias, add_keyed_scoped_alias,
    );

    lifetime_methods!(
        Transient, "transient":
        add_transient, add_transient_self, add_keyed_transient, add_keyed_transient_self,
        try_add_transient, try_add_transient_self,
        try_add_keyed_transient, try_add_keyed_transient_self,
        add_open_transient, add_open_transient_self,
        add_keyed_open_transient, add_keyed_open_transient_self,
        try_add_open_transient, try_add_open_transient_self,
        try_add_keyed_open_transient, try_add_keyed_open_transient_self,
        add_transient_alias, add_keyed_transient_alias,
    );

    /// Whether any registration satisfies contract `C`, keyed or not.
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        let id = TypeId::of::<C>();
        self.items
            .iter()
            .any(|r| matches!(r.contract, ServiceKey::Closed { id: c, .. } if c == id))
    }

    /// Whether a registration satisfies contract `C` under exactly `key`.
    pub fn contains_keyed<C: ?Sized + 'static>(&self, key: &str) -> bool {
        let id = TypeId::of::<C>();
        self.items.iter().any(|r| {
            matches!(r.contract, ServiceKey::Closed { id: c, .. } if c == id)
                && r.key.as_deref() == Some(key)
        })
    }

    /// Whether `T` backs any unkeyed registration as a constructed
    /// implementation. Aliases and keyed registrations do not count.
    pub fn has_implementation<T: 'static>(&self) -> bool {
        let id = TypeId::of::<T>();
        self.items.iter().any(|r| {
            r.key.is_none()
                && matches!(r.implementation, ImplTarget::Ty { id: t, .. } if t == id)
        })
    }

    /// Number of recorded registrations.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no registrations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates registrations in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Registration> {
        self.items.iter()
    }

    fn push(
        &mut self,
        contract: ServiceKey,
        implementation: ImplTarget,
        lifetime: Lifetime,
        key: Option<String>,
    ) -> &mut Self {
        self.items.push(Registration {
            contract,
            implementation,
            lifetime,
            key,
        });
        self
    }

    fn try_push(
        &mut self,
        contract: ServiceKey,
        implementation: ImplTarget,
        lifetime: Lifetime,
        key: Option<String>,
    ) -> &mut Self {
        let present = self
            .items
            .iter()
            .any(|r| r.contract == contract && r.key == key);
        if present {
            return self;
        }
        self.push(contract, implementation, lifetime, key)
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a Registration;
    type IntoIter = slice::Iter<'a, Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
