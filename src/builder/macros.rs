//! `state_enum!`, the shortest way to get a [`State`](crate::core::State).

/// Declare a unit enum usable as machine state.
///
/// Variant identifiers double as state names. Variants listed under
/// `final:` report [`is_final`](crate::core::State::is_final), those under
/// `error:` report [`is_error`](crate::core::State::is_error). The enum is
/// `Copy`, so states can be passed around and used as keys freely.
///
/// # Example
///
/// ```
/// use aid_fsm::{state_enum, InstructionSet, State, StateMachine};
/// use std::sync::Arc;
///
/// state_enum! {
///     /// Lifecycle of a spawned enemy.
///     pub enum Enemy {
///         Idle,
///         Chase,
///         Dead,
///         Glitched,
///     }
///     final: [Dead, Glitched]
///     error: [Glitched]
/// }
///
/// assert_eq!(Enemy::Chase.name(), "Chase");
/// assert!(Enemy::Glitched.is_error());
///
/// let mut enemy = StateMachine::new(Arc::new(InstructionSet::new()), Enemy::Idle);
/// let _ = enemy.transit(Enemy::Dead);
/// assert!(enemy.is_final());
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

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
