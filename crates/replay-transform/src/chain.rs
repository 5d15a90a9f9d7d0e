//! Ordered list of transforms feeding a terminal writer

use crate::error::TransformError;
use crate::transform::{Transform, Writer};
use replay_core::{Atom, AtomId};

/// Runs atoms through transforms in order
///
/// Atoms written by transform `i` are processed by transform `i + 1`; the
/// output of the last transform goes to the terminal writer. At end of
/// stream each transform is flushed once, in order, with its output flowing
/// through the transforms after it.
#[derive(Default)]
pub struct Chain {
    transforms: Vec<Box<dyn Transform>>,
}

impl Chain {
    /// Create an empty chain
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform
    #[must_use]
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.push(transform);
        self
    }

    /// Append a transform
    pub fn push(&mut self, transform: impl Transform + 'static) {
        self.transforms.push(Box::new(transform));
    }

    /// Number of transforms
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True if the chain has no transforms
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run `atoms` through the chain into `out`, then flush every transform
    ///
    /// Consumes the chain: transforms are not reused after flush.
    ///
    /// # Errors
    /// Stops at the first failing atom or flush.
    pub fn run<I>(mut self, atoms: I, out: &mut dyn Writer) -> Result<(), TransformError>
    where
        I: IntoIterator<Item = (AtomId, Atom)>,
    {
        let mut forwarded = 0u64;
        {
            let mut link = Link {
                rest: &mut self.transforms,
                out: &mut *out,
            };
            for (id, atom) in atoms {
                link.mutate_and_write(id, atom)?;
                forwarded += 1;
            }
        }
        tracing::debug!(atoms = forwarded, transforms = self.transforms.len(), "flushing chain");

        let mut remaining: &mut [Box<dyn Transform>] = &mut self.transforms;
        while let Some((head, rest)) = std::mem::take(&mut remaining).split_first_mut() {
            tracing::trace!(transform = head.name(), "flush");
            head.flush(&mut Link {
                rest: &mut *rest,
                out: &mut *out,
            })?;
            remaining = rest;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.transforms.iter().map(|t| t.name()))
            .finish()
    }
}

/// Writer handing atoms to the next transform in the chain
struct Link<'a, 'w> {
    rest: &'a mut [Box<dyn Transform>],
    out: &'a mut (dyn Writer + 'w),
}

impl Writer for Link<'_, '_> {
    fn mutate_and_write(&mut self, id: AtomId, atom: Atom) -> Result<(), TransformError> {
        match self.rest.split_first_mut() {
            Some((head, rest)) => head.transform(
                id,
                atom,
                &mut Link {
                    rest,
                    out: &mut *self.out,
                },
            ),
            None => self.out.mutate_and_write(id, atom),
        }
    }
}
