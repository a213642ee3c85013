// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-time resolution of a compiled descriptor against an owner.
//!
//! Classes are accumulated per slot in a fixed order, later sources appended
//! after earlier ones:
//!
//! **Compiled slots → Variants → Compound variants → Slot overrides → Class override**
//!
//! Each accumulated string is then handed to a [`ClassMerger`], which is
//! expected to let the last utility of a conflict group win.

use alloc::string::String;
use core::fmt;
use core::marker::PhantomData;

use hashbrown::HashMap;

use crate::class_value::push_class;
use crate::descriptor::Descriptor;
use crate::owner::Slotted;
use crate::slots::{SlotClasses, Slots};

/// Resolves conflicting utility classes in one slot's candidate string.
///
/// Any `Fn(&str) -> String` is a merger.
pub trait ClassMerger {
    /// Returns the final class string for a space-joined candidate string.
    fn merge(&self, classes: &str) -> String;
}

impl<F> ClassMerger for F
where
    F: Fn(&str) -> String,
{
    fn merge(&self, classes: &str) -> String {
        self(classes)
    }
}

/// A merger that keeps every candidate class, in order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Concat;

impl ClassMerger for Concat {
    fn merge(&self, classes: &str) -> String {
        String::from(classes)
    }
}

/// Final per-slot class strings produced by [`Resolver::resolve`].
pub struct SlotsMap<S: Slots> {
    slots: HashMap<&'static str, String>,
    _marker: PhantomData<fn() -> S>,
}

impl<S: Slots> SlotsMap<S> {
    /// Returns the classes of `slot`, or `None` if nothing applied to it.
    #[must_use]
    pub fn get(&self, slot: S::Slot) -> Option<&str> {
        self.get_by_name(S::name(slot))
    }

    /// Returns the classes of the base slot.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.get(S::BASE)
    }

    /// Returns the classes of the slot with canonical name `name`.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    /// Returns the canonical name of `slot`.
    #[must_use]
    #[inline]
    pub fn name(&self, slot: S::Slot) -> &'static str {
        S::name(slot)
    }

    /// Returns the number of slots with classes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot has classes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns an iterator over `(slot name, classes)` pairs.
    ///
    /// Iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.slots
            .iter()
            .map(|(name, classes)| (*name, classes.as_str()))
    }
}

impl<S: Slots> Clone for SlotsMap<S> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S: Slots> PartialEq for SlotsMap<S> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<S: Slots> Eq for SlotsMap<S> {}

impl<S: Slots> fmt::Debug for SlotsMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.slots.iter()).finish()
    }
}

/// Turns an owner and its compiled descriptor into final slot classes.
///
/// The resolver holds no state besides its merger; resolution never mutates
/// the descriptor, so one descriptor can serve any number of concurrent
/// resolutions.
///
/// # Example
///
/// ```rust
/// # use understory_class_variants::{Accessor, Slots, Slotted};
/// use understory_class_variants::{Concat, Descriptor, Resolver};
/// # struct S;
/// # impl Slots for S {
/// #     type Slot = ();
/// #     const BASE: () = ();
/// #     fn name(_: ()) -> &'static str { "base" }
/// #     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> { core::iter::empty() }
/// # }
/// struct Panel {
///     class: Option<String>,
/// }
/// # impl Slotted for Panel {
/// #     type Slots = S;
/// #     fn class(&self) -> Option<&str> { self.class.as_deref() }
/// #     fn classes(&self) -> Option<&S> { None }
/// #     fn accessor(_: &str) -> Option<Accessor<Self>> { None }
/// # }
///
/// let descriptor = Descriptor::<Panel>::builder().base("container").build().unwrap();
/// let resolver = Resolver::new(Concat);
///
/// let plain = resolver.resolve(&Panel { class: None }, &descriptor);
/// assert_eq!(plain.base(), Some("container"));
///
/// let custom = resolver.resolve(&Panel { class: Some("mx-auto".into()) }, &descriptor);
/// assert_eq!(custom.base(), Some("container mx-auto"));
/// ```
#[derive(Clone, Debug)]
pub struct Resolver<M = Concat> {
    merger: M,
}

impl Default for Resolver<Concat> {
    fn default() -> Self {
        Self::new(Concat)
    }
}

impl<M: ClassMerger> Resolver<M> {
    /// Creates a resolver using `merger` for the final per-slot pass.
    pub fn new(merger: M) -> Self {
        Self { merger }
    }

    /// Returns the merger.
    #[must_use]
    pub fn merger(&self) -> &M {
        &self.merger
    }

    /// Resolves the final classes of every slot for `owner`.
    ///
    /// Resolution is deterministic for a given owner state and never fails:
    /// unset properties, unmatched values and empty classes contribute
    /// nothing.
    #[must_use]
    pub fn resolve<O: Slotted>(&self, owner: &O, descriptor: &Descriptor<O>) -> SlotsMap<O::Slots> {
        let mut builders: HashMap<&'static str, String> = descriptor
            .compiled_slots()
            .map(|(name, classes)| {
                let mut builder = String::with_capacity(classes.len() + 64);
                builder.push_str(classes);
                (name, builder)
            })
            .collect();

        for variant in descriptor.compiled_variants() {
            let Some(selected) = variant.select(owner) else {
                continue;
            };
            if let Some(classes) = variant.variant().try_slots(selected) {
                append_classes(&mut builders, classes);
            }
        }

        for compound in descriptor.compiled_compound_variants() {
            if compound.matches(owner) {
                append_classes(&mut builders, compound.classes());
            }
        }

        if let Some(overrides) = owner.classes() {
            for (slot, classes) in overrides.overrides() {
                append(&mut builders, slot, classes);
            }
        }

        if let Some(class) = owner.class() {
            let base = <O::Slots as Slots>::name(<O::Slots as Slots>::BASE);
            append(&mut builders, base, class);
        }

        let slots = builders
            .into_iter()
            .map(|(name, classes)| (name, self.merger.merge(&classes)))
            .collect();

        SlotsMap {
            slots,
            _marker: PhantomData,
        }
    }
}

fn append_classes(builders: &mut HashMap<&'static str, String>, classes: &SlotClasses) {
    for (name, value) in classes.iter() {
        if value.is_empty() {
            continue;
        }
        value.append_to(builders.entry(name).or_default());
    }
}

fn append(builders: &mut HashMap<&'static str, String>, name: &'static str, classes: &str) {
    if classes.trim().is_empty() {
        return;
    }
    push_class(builders.entry(name).or_default(), classes);
}
