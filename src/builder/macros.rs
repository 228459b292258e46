//! Macros for ergonomic state machine construction.

/// Generate a state enum with its `State` implementation.
///
/// Besides the trait, the enum gets `from_name`, the inverse of
/// `State::name`, which is the decoder expected by schema import and
/// checkpoint restore, and `all`, every variant in declaration order.
///
/// # Example
///
/// ```
/// use switchyard::core::State;
/// use switchyard::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Open,
///         Ajar,
///         Closed,
///     }
/// }
///
/// assert_eq!(Door::Ajar.name(), "Ajar");
/// assert_eq!(Door::from_name("Closed"), Some(Door::Closed));
/// assert_eq!(Door::all().len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Look a variant up by its state name.
            #[allow(dead_code)]
            pub fn from_name(name: &str) -> ::core::option::Option<Self> {
                $(
                    if name == stringify!($variant) {
                        return ::core::option::Option::Some(Self::$variant);
                    }
                )*
                ::core::option::Option::None
            }

            /// Every variant in declaration order.
            #[allow(dead_code)]
            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),*]
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a typed facade around a `StateMachine`.
///
/// The facade owns the machine, dereferences to it, and adds one method per
/// listed transition so callers write `door.open()` instead of
/// `door.transition("open")`. It implements `From<MachineParts>`, so it can
/// be produced directly by a builder through
/// [`factory`](crate::builder::StateMachineBuilder::factory).
///
/// # Example
///
/// ```
/// use switchyard::builder::StateMachineBuilder;
/// use switchyard::{state_enum, typed_machine};
///
/// state_enum! {
///     pub enum Lamp {
///         Off,
///         On,
///     }
/// }
///
/// typed_machine! {
///     pub struct LampMachine(Lamp, u32) {
///         fn switch_on => "switchOn";
///         fn switch_off => "switchOff";
///     }
/// }
///
/// let mut lamp = StateMachineBuilder::new()
///     .add_transition("switchOn", Lamp::Off, Lamp::On)
///     .add_transition("switchOff", Lamp::On, Lamp::Off)
///     .context(0u32)
///     .factory(LampMachine::from)
///     .build()
///     .unwrap();
///
/// lamp.switch_on().unwrap();
/// assert_eq!(lamp.state(), &Lamp::On);
/// ```
#[macro_export]
macro_rules! typed_machine {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($state:ty, $context:ty) {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident => $transition:literal;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name($crate::machine::StateMachine<$state, $context>);

        impl $name {
            $(
                $(#[$method_meta])*
                #[allow(dead_code)]
                pub fn $method(
                    &mut self,
                ) -> ::core::result::Result<(), $crate::core::TransitionError> {
                    self.0.transition($transition)
                }
            )*

            /// Give up the facade and return the underlying machine.
            #[allow(dead_code)]
            pub fn into_inner(self) -> $crate::machine::StateMachine<$state, $context> {
                self.0
            }
        }

        impl ::core::convert::From<$crate::machine::MachineParts<$state, $context>> for $name {
            fn from(parts: $crate::machine::MachineParts<$state, $context>) -> Self {
                Self($crate::machine::StateMachine::new(parts))
            }
        }

        impl ::core::ops::Deref for $name {
            type Target = $crate::machine::StateMachine<$state, $context>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::core::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::builder::StateMachineBuilder;
    use crate::core::{State, TransitionError};

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
            Failed,
        }
    }

    typed_machine! {
        struct Job(TestState, u32) {
            /// Begin processing.
            fn start => "start";
            fn finish => "finish";
        }
    }

    fn job() -> Job {
        StateMachineBuilder::new()
            .add_transition("start", TestState::Initial, TestState::Processing)
            .add_transition("finish", TestState::Processing, TestState::Complete)
            .set_transition_guard("finish", |done: &u32| *done >= 10)
            .context(0)
            .factory(Job::from)
            .build()
            .unwrap()
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Failed.name(), "Failed");
    }

    #[test]
    fn state_enum_names_round_trip() {
        for state in TestState::all() {
            assert_eq!(TestState::from_name(state.name()), Some(*state));
        }
        assert_eq!(TestState::from_name("initial"), None);
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        assert_eq!(PublicState::all(), &[PublicState::A, PublicState::B]);
    }

    #[test]
    fn typed_machine_methods_fire_named_transitions() {
        let mut job = job();

        job.start().unwrap();

        assert_eq!(job.state(), &TestState::Processing);
    }

    #[test]
    fn typed_machine_methods_surface_errors() {
        let mut job = job();

        assert!(matches!(
            job.finish(),
            Err(TransitionError::StateMismatch { .. })
        ));

        job.start().unwrap();
        assert!(matches!(
            job.finish(),
            Err(TransitionError::ConditionFailed { .. })
        ));
    }

    #[test]
    fn typed_machine_derefs_to_machine() {
        let mut job = job();

        job.transition("start").unwrap();
        let machine = job.into_inner();

        assert_eq!(machine.state(), &TestState::Processing);
    }
}
