//! Atoms: units of replayable work

use crate::builder::Builder;
use crate::error::ReplayError;
use crate::state::State;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closure run by a custom atom when it reaches the execution target
type CustomFn = Box<dyn FnOnce(&mut State, &mut dyn Builder) -> Result<(), ReplayError> + Send>;

/// A unit of replayable work
///
/// Ownership moves from producer to writer on forward; an atom is applied
/// at most once.
#[derive(Debug)]
pub enum Atom {
    /// A call captured from the traced application
    Recorded(Recorded),
    /// Synthetic work injected by a transform
    Custom(Custom),
}

impl Atom {
    /// Create a recorded atom
    #[inline]
    pub fn recorded(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Recorded(Recorded::new(name, args))
    }

    /// Create a custom atom running `f` against the state and builder
    pub fn custom<F>(label: &'static str, f: F) -> Self
    where
        F: FnOnce(&mut State, &mut dyn Builder) -> Result<(), ReplayError> + Send + 'static,
    {
        Self::Custom(Custom {
            label,
            f: Box::new(f),
        })
    }

    /// Short name for logging
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Atom::Recorded(r) => &r.name,
            Atom::Custom(c) => c.label(),
        }
    }

    /// True for custom atoms
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Atom::Custom(_))
    }

    /// Recorded payload, if this is a recorded atom
    #[inline]
    #[must_use]
    pub fn as_recorded(&self) -> Option<&Recorded> {
        match self {
            Atom::Recorded(r) => Some(r),
            Atom::Custom(_) => None,
        }
    }

    /// Apply the atom's effect
    ///
    /// Recorded atoms push their arguments; custom atoms run their closure.
    ///
    /// # Errors
    /// Propagates failures of a custom closure.
    pub fn mutate(self, state: &mut State, builder: &mut dyn Builder) -> Result<(), ReplayError> {
        match self {
            Atom::Recorded(r) => {
                for value in r.args {
                    builder.push(value);
                }
                Ok(())
            }
            Atom::Custom(c) => (c.f)(state, builder),
        }
    }
}

impl From<Recorded> for Atom {
    fn from(recorded: Recorded) -> Self {
        Self::Recorded(recorded)
    }
}

/// Payload of a captured call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recorded {
    /// Command name
    pub name: String,
    /// Arguments in call order
    pub args: Vec<Value>,
}

impl Recorded {
    /// Create a recorded payload
    #[inline]
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Synthetic atom carrying a closure
pub struct Custom {
    label: &'static str,
    f: CustomFn,
}

impl Custom {
    /// Label given at creation
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom").field("label", &self.label).finish_non_exhaustive()
    }
}
