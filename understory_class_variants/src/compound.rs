// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Predicate-gated compound variants.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::class_value::ClassValue;
use crate::error::MissingSlot;
use crate::owner::Slotted;
use crate::slots::{SlotClasses, SlotCollection, Slots};

type Predicate<O> = Box<dyn Fn(&O) -> bool + Send + Sync>;

/// Slot classes applied additively when a predicate over the owner holds.
///
/// # Example
///
/// ```rust
/// # use understory_class_variants::{Accessor, CompoundVariant, Slots, Slotted};
/// # struct S;
/// # impl Slots for S {
/// #     type Slot = ();
/// #     const BASE: () = ();
/// #     fn name(_: ()) -> &'static str { "base" }
/// #     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> { core::iter::empty() }
/// # }
/// struct Button {
///     primary: bool,
///     disabled: bool,
/// }
/// # impl Slotted for Button {
/// #     type Slots = S;
/// #     fn class(&self) -> Option<&str> { None }
/// #     fn classes(&self) -> Option<&S> { None }
/// #     fn accessor(_: &str) -> Option<Accessor<Self>> { None }
/// # }
///
/// let muted = CompoundVariant::new(|b: &Button| b.primary && b.disabled)
///     .with_class("bg-blue-300");
///
/// assert_eq!(muted.get(()).unwrap().to_string(), "bg-blue-300");
/// let compiled = muted.compile();
/// assert!(compiled.matches(&Button { primary: true, disabled: true }));
/// assert!(!compiled.matches(&Button { primary: true, disabled: false }));
/// ```
pub struct CompoundVariant<O: Slotted> {
    predicate: Predicate<O>,
    slots: SlotCollection<O::Slots>,
}

impl<O: Slotted> CompoundVariant<O> {
    /// Creates a compound variant gated by `predicate`, with no classes yet.
    pub fn new(predicate: impl Fn(&O) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
            slots: SlotCollection::new(),
        }
    }

    /// Sets the classes applied to the base slot.
    pub fn class(&mut self, classes: &str) {
        self.slots.insert(<O::Slots as Slots>::BASE, classes);
    }

    /// Sets the base slot classes and returns `self`.
    #[must_use]
    pub fn with_class(mut self, classes: &str) -> Self {
        self.class(classes);
        self
    }

    /// Replaces the classes of `slot`.
    pub fn insert(&mut self, slot: <O::Slots as Slots>::Slot, value: impl Into<ClassValue>) {
        self.slots.insert(slot, value);
    }

    /// Replaces the classes of `slot` and returns `self`.
    #[must_use]
    pub fn with(mut self, slot: <O::Slots as Slots>::Slot, value: impl Into<ClassValue>) -> Self {
        self.insert(slot, value);
        self
    }

    /// Appends a fragment to the classes of `slot`.
    pub fn add(&mut self, slot: <O::Slots as Slots>::Slot, fragment: &str) {
        self.slots.add(slot, fragment);
    }

    /// Returns the classes declared for `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`MissingSlot`] if this compound variant declares nothing for
    /// `slot`.
    pub fn get(&self, slot: <O::Slots as Slots>::Slot) -> Result<&ClassValue, MissingSlot> {
        self.slots.get(slot).ok_or(MissingSlot {
            slot: <O::Slots as Slots>::name(slot),
        })
    }

    /// Returns the declared slot classes.
    #[must_use]
    pub fn slots(&self) -> &SlotCollection<O::Slots> {
        &self.slots
    }

    /// Erases the owner type, producing the form stored by descriptors.
    #[must_use]
    pub fn compile(self) -> CompiledCompoundVariant {
        CompiledCompoundVariant {
            inner: Arc::new(self),
        }
    }
}

impl<O: Slotted> fmt::Debug for CompoundVariant<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundVariant")
            .field("owner", &core::any::type_name::<O>())
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

/// Object-safe view of a compound variant with its owner type erased.
trait ErasedCompound: Send + Sync {
    fn matches(&self, owner: &dyn Any) -> bool;
    fn classes(&self) -> &SlotClasses;
}

impl<O: Slotted> ErasedCompound for CompoundVariant<O> {
    fn matches(&self, owner: &dyn Any) -> bool {
        owner
            .downcast_ref::<O>()
            .is_some_and(|owner| (self.predicate)(owner))
    }

    fn classes(&self) -> &SlotClasses {
        self.slots.classes()
    }
}

/// A compound variant with its owner type erased.
///
/// The predicate accepts any owner; it is false whenever the owner is not of
/// the type the compound variant was declared for.
#[derive(Clone)]
pub struct CompiledCompoundVariant {
    inner: Arc<dyn ErasedCompound>,
}

impl CompiledCompoundVariant {
    /// Evaluates the predicate against an opaque owner.
    #[must_use]
    pub fn matches(&self, owner: &dyn Any) -> bool {
        self.inner.matches(owner)
    }

    /// Returns the slot classes applied when the predicate holds.
    #[must_use]
    pub fn classes(&self) -> &SlotClasses {
        self.inner.classes()
    }
}

impl fmt::Debug for CompiledCompoundVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledCompoundVariant")
            .field("classes", self.inner.classes())
            .finish_non_exhaustive()
    }
}

/// The compound variants declared by one descriptor level, in order.
pub struct CompoundVariantCollection<O: Slotted> {
    variants: Vec<CompoundVariant<O>>,
}

impl<O: Slotted> CompoundVariantCollection<O> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            variants: Vec::new(),
        }
    }

    /// Appends a compound variant.
    pub fn push(&mut self, variant: CompoundVariant<O>) {
        self.variants.push(variant);
    }

    /// Appends a compound variant and returns `self`.
    #[must_use]
    pub fn with(mut self, variant: CompoundVariant<O>) -> Self {
        self.push(variant);
        self
    }

    /// Returns the number of compound variants.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns `true` if the collection is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub(crate) fn compile(self) -> Vec<CompiledCompoundVariant> {
        self.variants
            .into_iter()
            .map(CompoundVariant::compile)
            .collect()
    }
}

impl<O: Slotted> Default for CompoundVariantCollection<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Slotted> fmt::Debug for CompoundVariantCollection<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.variants).finish()
    }
}

impl<O: Slotted> FromIterator<CompoundVariant<O>> for CompoundVariantCollection<O> {
    fn from_iter<I: IntoIterator<Item = CompoundVariant<O>>>(iter: I) -> Self {
        Self {
            variants: iter.into_iter().collect(),
        }
    }
}
