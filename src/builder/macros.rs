//! Macros for declaring machines with minimal boilerplate.

/// Generate a state enum together with its static declaration table.
///
/// Each variant carries its transition code. Declaration order is the
/// variant order, so the empty code means "the next variant".
///
/// # Example
///
/// ```
/// use flowstate::declare_states;
///
/// declare_states! {
///     pub enum Search {
///         Init = "",
///         Check = "F->I",
///         Done = "0",
///     }
/// }
///
/// assert_eq!(Search::Check.name(), "Check");
/// assert_eq!(Search::Check.code(), "F->I");
/// assert_eq!(Search::DECLARATIONS[2], ("Done", "0"));
/// ```
#[macro_export]
macro_rules! declare_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $code:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every state, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// `(name, code)` pairs, in declaration order.
            pub const DECLARATIONS: &'static [(&'static str, &'static str)] =
                &[$((stringify!($variant), $code)),*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            pub fn code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code),*
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.name()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// Register handlers that are methods on the instance data.
///
/// The method for state `NextQueryInCache` is `next_query_in_cache`.
/// Actions take `&mut self`; decisions take `&self` and return `bool`.
/// The `try_` forms return `Result<_, HandlerError>`.
///
/// # Example
///
/// ```
/// use flowstate::builder::MachineTypeBuilder;
/// use flowstate::bind_methods;
///
/// struct Counter { value: u32 }
///
/// impl Counter {
///     fn bump_value(&mut self) { self.value += 1; }
///     fn is_large(&self) -> bool { self.value >= 3 }
/// }
///
/// let builder = MachineTypeBuilder::<Counter>::new()
///     .state("BumpValue", "")
///     .state("IsLarge", "F->BV")
///     .state("CountComplete", "0");
///
/// let machine = bind_methods!(builder, Counter {
///     action BumpValue,
///     decision IsLarge,
/// })
/// .build()
/// .unwrap();
///
/// assert_eq!(machine.states().len(), 3);
/// ```
#[macro_export]
macro_rules! bind_methods {
    ($builder:expr, $data:ty { $($kind:ident $state:ident),* $(,)? }) => {{
        let builder = $builder;
        $(let builder = $crate::bind_methods!(@bind builder, $data, $kind, $state);)*
        builder
    }};
    (@bind $b:ident, $data:ty, action, $state:ident) => {
        $crate::paste::paste! {
            $b.action(stringify!($state), |data: &mut $data| data.[<$state:snake>]())
        }
    };
    (@bind $b:ident, $data:ty, try_action, $state:ident) => {
        $crate::paste::paste! {
            $b.try_action(stringify!($state), |data: &mut $data| data.[<$state:snake>]())
        }
    };
    (@bind $b:ident, $data:ty, decision, $state:ident) => {
        $crate::paste::paste! {
            $b.decision(stringify!($state), |data: &$data| data.[<$state:snake>]())
        }
    };
    (@bind $b:ident, $data:ty, try_decision, $state:ident) => {
        $crate::paste::paste! {
            $b.try_decision(stringify!($state), |data: &$data| data.[<$state:snake>]())
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::builder::MachineTypeBuilder;
    use crate::core::{HandlerError, StateKind};

    declare_states! {
        enum Probe {
            Init = "",
            Check = "F->I",
            Done = "0",
        }
    }

    #[test]
    fn declare_states_generates_table() {
        assert_eq!(Probe::ALL.len(), 3);
        assert_eq!(
            Probe::DECLARATIONS,
            &[("Init", ""), ("Check", "F->I"), ("Done", "0")]
        );
        assert_eq!(Probe::Check.name(), "Check");
        assert_eq!(Probe::Init.code(), "");
        assert_eq!(Probe::Done.to_string(), "Done");
        assert_eq!(Probe::Check.as_ref(), "Check");
    }

    #[test]
    fn declare_states_supports_visibility() {
        declare_states! {
            pub enum PublicState {
                StartUp = "",
                ShutdownComplete = "0",
            }
        }

        assert_eq!(PublicState::ALL[1], PublicState::ShutdownComplete);
    }

    struct Tally {
        count: u32,
    }

    impl Tally {
        fn init(&mut self) {
            self.count += 1;
        }

        fn check(&self) -> Result<bool, HandlerError> {
            Ok(self.count >= 2)
        }
    }

    #[test]
    fn bind_methods_uses_snake_case_methods() {
        let builder = MachineTypeBuilder::<Tally>::new().states(Probe::DECLARATIONS);
        let machine = bind_methods!(builder, Tally {
            action Init,
            try_decision Check,
        })
        .build()
        .unwrap();

        assert_eq!(machine.kind_of("Check"), Some(StateKind::Decision));
    }
}
