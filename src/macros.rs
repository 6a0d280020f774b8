//! Compile-time generation of view types.
//!
//! [`immutable_view!`](crate::immutable_view) is invoked once per original
//! type, in the module that defines it. It emits:
//!
//! - the [`Viewable`](crate::Viewable) impl: the field model built from the
//!   declared fields, and a raw allocation that fills every field with its
//!   `Default` value through a struct literal, so private fields and private
//!   constructors are no obstacle;
//! - the view struct, a thin wrapper over [`View`](crate::View) that derefs
//!   to it and carries one method per declared accessor and mutator.
//!
//! Every field of the original struct must be listed. Terminal fields must be
//! [`Terminal`](crate::Terminal) and `Default`; complex fields are declared
//! with the nested type `U` and stored as `Option<Obj<U>>`.
//!
//! ```
//! use immutable_view::{immutable_view, strict_view_of, Obj};
//!
//! pub struct Account {
//!     owner: String,
//!     balance: i64,
//!     parent: Option<Obj<Account>>,
//! }
//!
//! immutable_view! {
//!     pub struct AccountView for Account {
//!         terminal owner: String => owner;
//!         terminal balance: i64 => balance, set_balance;
//!         complex parent: Account => parent, set_parent;
//!     }
//!     mutators { close, deposit -> i64 = balance }
//! }
//!
//! let root = Obj::new(Account { owner: "bank".into(), balance: 0, parent: None });
//! let child = Obj::new(Account { owner: "ada".into(), balance: 10, parent: Some(root) });
//! let view = strict_view_of(&child).unwrap();
//! assert_eq!(view.parent().unwrap().unwrap().owner(), "bank");
//! assert!(view.deposit().is_err());
//! assert!(view.close().is_err());
//! ```

/// Generates the view type of a struct. See the [module docs](crate::macros).
#[macro_export]
macro_rules! immutable_view {
    (@setter_name) => {
        ::core::option::Option::None
    };
    (@setter_name $setter:ident) => {
        ::core::option::Option::Some(::core::stringify!($setter))
    };

    (@field $builder:ident, $ty:ident, terminal $field:ident : $fty:ty => $getter:ident $(, $setter:ident)?) => {
        $builder.terminal::<$fty>(
            ::core::stringify!($field),
            ::core::stringify!($getter),
            $crate::immutable_view!(@setter_name $($setter)?),
            |this: &$ty| &this.$field,
            |this: &mut $ty, value: $fty| this.$field = value,
        )
    };
    (@field $builder:ident, $ty:ident, complex $field:ident : $fty:ty => $getter:ident $(, $setter:ident)?) => {
        $builder.complex::<$fty>(
            ::core::stringify!($field),
            ::core::stringify!($getter),
            $crate::immutable_view!(@setter_name $($setter)?),
            |this: &$ty| this.$field.as_ref(),
        )
    };

    (@accessor $ty:ident, terminal $field:ident : $fty:ty => $getter:ident $(, $setter:ident)?) => {
        pub fn $getter(&self) -> &$fty {
            self.0.read(|this: &$ty| &this.$field)
        }

        $(
            pub fn $setter(&self, _value: $fty) -> ::core::result::Result<(), $crate::ViewError> {
                self.0.intercept(::core::stringify!($setter))
            }
        )?
    };
    (@accessor $ty:ident, complex $field:ident : $fty:ty => $getter:ident $(, $setter:ident)?) => {
        pub fn $getter(
            &self,
        ) -> ::core::result::Result<
            ::core::option::Option<<$fty as $crate::Viewable>::View>,
            $crate::ViewError,
        > {
            ::core::result::Result::Ok(
                self.0
                    .nested::<$fty>(::core::stringify!($field))?
                    .map(::core::convert::Into::into),
            )
        }

        $(
            pub fn $setter(
                &self,
                _value: ::core::option::Option<$crate::Obj<$fty>>,
            ) -> ::core::result::Result<(), $crate::ViewError> {
                self.0.intercept(::core::stringify!($setter))
            }
        )?
    };

    (@mutator $ty:ident, $name:ident) => {
        pub fn $name(&self) -> ::core::result::Result<(), $crate::ViewError> {
            self.0.intercept(::core::stringify!($name))
        }
    };
    (@mutator $ty:ident, $name:ident -> $ret:ty = $source:ident) => {
        pub fn $name(&self) -> ::core::result::Result<$ret, $crate::ViewError> {
            self.0
                .intercept_returning(::core::stringify!($name), |this: &$ty| &this.$source)
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $view:ident for $ty:ident {
            $( $kind:ident $field:ident : $fty:ty => $getter:ident $(, $setter:ident)? ; )*
        }
        $( mutators { $( $name:ident $(-> $ret:ty = $source:ident)? ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        $vis struct $view($crate::View<$ty>);

        impl ::core::convert::From<$crate::View<$ty>> for $view {
            fn from(view: $crate::View<$ty>) -> Self {
                Self(view)
            }
        }

        impl ::core::ops::Deref for $view {
            type Target = $crate::View<$ty>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl $crate::Viewable for $ty {
            type View = $view;

            fn schema() -> ::core::result::Result<$crate::Schema<Self>, $crate::SchemaError> {
                let builder = $crate::Schema::<$ty>::builder(::core::stringify!($ty));
                $(
                    let builder = $crate::immutable_view!(
                        @field builder, $ty, $kind $field : $fty => $getter $(, $setter)?
                    );
                )*
                $( $(
                    let builder = builder.mutator(::core::stringify!($name));
                )* )?
                builder.build()
            }

            fn allocate() -> Self {
                $ty {
                    $( $field: ::core::default::Default::default(), )*
                }
            }
        }

        #[allow(dead_code)]
        impl $view {
            $(
                $crate::immutable_view!(@accessor $ty, $kind $field : $fty => $getter $(, $setter)?);
            )*
            $( $(
                $crate::immutable_view!(@mutator $ty, $name $(-> $ret = $source)?);
            )* )?
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::operations::{silent_view_of, strict_view_of};
    use crate::policy::Policy;
    use crate::schema::{FieldKind, Viewable};
    use crate::test_domain::{Counter, Person};
    use crate::cache::ViewTypeCache;
    use crate::Obj;

    #[test]
    fn generated_schema_lists_declared_fields() {
        let schema = Person::schema().unwrap();
        assert_eq!(schema.type_name(), "Person");
        let fields: Vec<_> = schema
            .fields()
            .map(|f| (f.name, f.accessor, f.mutator, f.kind))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("name", "get_name", Some("set_name"), FieldKind::Terminal),
                ("age", "get_age", Some("set_age"), FieldKind::Terminal),
                ("address", "get_address", Some("set_address"), FieldKind::Complex),
            ]
        );
    }

    #[test]
    fn allocation_starts_from_defaults() {
        let blank = Person::allocate();
        assert_eq!(blank.name, "");
        assert_eq!(blank.age, 0);
        assert!(blank.address.is_none());
    }

    #[test]
    fn standalone_mutators_are_declared() {
        assert_eq!(Counter::schema().unwrap().standalone_mutators(), &["increment", "reset"]);
        let view_type = ViewTypeCache::new().resolve::<Counter>(Policy::Strict).unwrap();
        assert_eq!(view_type.mutators().count(), 2);
    }

    #[test]
    fn unit_mutator_follows_policy() {
        let counter = Obj::new(Counter::starting_at(3));
        assert!(strict_view_of(&counter).unwrap().reset().unwrap_err().is_modification_rejected());
        assert_eq!(silent_view_of(&counter).unwrap().reset(), Ok(()));
        assert_eq!(counter.read().count, 3);
    }
}
