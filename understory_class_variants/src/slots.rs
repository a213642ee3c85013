// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot naming and per-slot class collections.
//!
//! A component's slots type implements [`Slots`]: it names each slot and
//! enumerates per-instance overrides. Class collections are keyed by the
//! canonical slot name, so two slot identifiers sharing a name address the
//! same entry.

use core::fmt;
use core::marker::PhantomData;

use hashbrown::HashMap;

use crate::class_value::ClassValue;

/// The slots-type capability of a component.
///
/// Implementations are usually generated alongside the component. A slot is
/// identified by [`Slots::Slot`] (typically a fieldless enum) and addressed by
/// its canonical [`name`](Slots::name), which may differ from the identifier.
///
/// # Example
///
/// ```rust
/// use understory_class_variants::Slots;
///
/// #[derive(Default)]
/// struct ButtonSlots {
///     base: Option<String>,
///     icon: Option<String>,
/// }
///
/// #[derive(Copy, Clone, Debug)]
/// enum ButtonSlot {
///     Base,
///     Icon,
/// }
///
/// impl Slots for ButtonSlots {
///     type Slot = ButtonSlot;
///     const BASE: ButtonSlot = ButtonSlot::Base;
///
///     fn name(slot: ButtonSlot) -> &'static str {
///         match slot {
///             ButtonSlot::Base => "root",
///             ButtonSlot::Icon => "icon",
///         }
///     }
///
///     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> {
///         [
///             (Self::name(ButtonSlot::Base), self.base.as_deref()),
///             (Self::name(ButtonSlot::Icon), self.icon.as_deref()),
///         ]
///         .into_iter()
///         .filter_map(|(slot, value)| Some((slot, value?)))
///         .filter(|(_, value)| !value.trim().is_empty())
///     }
/// }
///
/// let slots = ButtonSlots { icon: Some("size-4".into()), ..Default::default() };
/// let overrides: Vec<_> = slots.overrides().collect();
/// assert_eq!(overrides, [("icon", "size-4")]);
/// ```
pub trait Slots: 'static {
    /// Identifier of a single slot.
    type Slot: Copy;

    /// The base slot, usually the component's root element.
    const BASE: Self::Slot;

    /// Returns the canonical name of `slot`.
    ///
    /// Names must be stable for the lifetime of the process.
    fn name(slot: Self::Slot) -> &'static str;

    /// Enumerates every locally set, non-empty slot override.
    ///
    /// Overrides declared by a base slots type come first, followed by the
    /// ones the most-derived type declares.
    fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)>;
}

/// Untyped mapping from canonical slot name to [`ClassValue`].
///
/// This is the view compiled descriptors work with; [`SlotCollection`] is the
/// typed way of building one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SlotClasses {
    entries: HashMap<&'static str, ClassValue>,
}

impl SlotClasses {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of slots with classes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no slot has classes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the classes stored for a slot name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassValue> {
        self.entries.get(name)
    }

    /// Returns an iterator over `(slot name, classes)` pairs.
    ///
    /// Iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ClassValue)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// Replaces the classes of `name`; an empty value clears the slot.
    pub fn insert(&mut self, name: &'static str, value: ClassValue) {
        if value.is_empty() {
            self.entries.remove(name);
        } else {
            self.entries.insert(name, value);
        }
    }

    /// Appends a fragment to the classes of `name`.
    pub fn add(&mut self, name: &'static str, fragment: &str) {
        if fragment.trim().is_empty() {
            return;
        }
        self.entries.entry(name).or_default().add(fragment);
    }
}

impl fmt::Debug for SlotClasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// A typed collection of per-slot classes for the slots type `S`.
///
/// Slot identifiers are resolved through [`Slots::name`] before storing or
/// looking up, so distinct identifiers mapping to the same canonical name
/// collapse into one entry. Direct assignment replaces (last write wins).
///
/// A collection can also be created from plain class strings, which are
/// applied to the base slot.
pub struct SlotCollection<S: Slots> {
    classes: SlotClasses,
    _marker: PhantomData<fn() -> S>,
}

impl<S: Slots> SlotCollection<S> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: SlotClasses::new(),
            _marker: PhantomData,
        }
    }

    /// Returns the classes stored for `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: S::Slot) -> Option<&ClassValue> {
        self.classes.get(S::name(slot))
    }

    /// Returns `true` if `slot` has classes.
    #[must_use]
    pub fn contains(&self, slot: S::Slot) -> bool {
        self.get(slot).is_some()
    }

    /// Replaces the classes of `slot`.
    ///
    /// Assigning an empty value clears the slot.
    pub fn insert(&mut self, slot: S::Slot, value: impl Into<ClassValue>) {
        self.classes.insert(S::name(slot), value.into());
    }

    /// Appends a fragment to the classes of `slot`.
    pub fn add(&mut self, slot: S::Slot, fragment: &str) {
        self.classes.add(S::name(slot), fragment);
    }

    /// Appends a fragment to the base slot.
    pub fn add_base(&mut self, fragment: &str) {
        self.add(S::BASE, fragment);
    }

    /// Replaces the classes of `slot` and returns `self`.
    #[must_use]
    pub fn with(mut self, slot: S::Slot, value: impl Into<ClassValue>) -> Self {
        self.insert(slot, value);
        self
    }

    /// Appends a fragment to the base slot and returns `self`.
    #[must_use]
    pub fn with_base(mut self, fragment: &str) -> Self {
        self.add_base(fragment);
        self
    }

    /// Returns the number of slots with classes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no slot has classes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns an iterator over `(slot name, classes)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ClassValue)> + '_ {
        self.classes.iter()
    }

    /// Returns the untyped view of this collection.
    #[must_use]
    #[inline]
    pub fn classes(&self) -> &SlotClasses {
        &self.classes
    }

    /// Consumes the collection, returning the untyped view.
    #[must_use]
    pub fn into_classes(self) -> SlotClasses {
        self.classes
    }
}

impl<S: Slots> Default for SlotCollection<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Slots> Clone for SlotCollection<S> {
    fn clone(&self) -> Self {
        Self {
            classes: self.classes.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S: Slots> fmt::Debug for SlotCollection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotCollection")
            .field("slots", &core::any::type_name::<S>())
            .field("classes", &self.classes)
            .finish()
    }
}

impl<S: Slots> From<&str> for SlotCollection<S> {
    fn from(classes: &str) -> Self {
        Self::new().with_base(classes)
    }
}

impl<S: Slots, const N: usize> From<[&str; N]> for SlotCollection<S> {
    fn from(values: [&str; N]) -> Self {
        let mut slots = Self::new();
        for value in values {
            slots.add_base(value);
        }
        slots
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    #[derive(Default)]
    pub(crate) struct CardSlots {
        pub(crate) base: Option<String>,
        pub(crate) body: Option<String>,
        pub(crate) title: Option<String>,
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) enum CardSlot {
        Base,
        Body,
        Title,
        /// Shares the canonical name of `Body`.
        Content,
    }

    impl Slots for CardSlots {
        type Slot = CardSlot;
        const BASE: CardSlot = CardSlot::Base;

        fn name(slot: CardSlot) -> &'static str {
            match slot {
                CardSlot::Base => "root",
                CardSlot::Body | CardSlot::Content => "body",
                CardSlot::Title => "title",
            }
        }

        fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> {
            [
                (Self::name(CardSlot::Base), self.base.as_deref()),
                (Self::name(CardSlot::Body), self.body.as_deref()),
                (Self::name(CardSlot::Title), self.title.as_deref()),
            ]
            .into_iter()
            .filter_map(|(slot, value)| Some((slot, value?)))
            .filter(|(_, value)| !value.trim().is_empty())
        }
    }

    #[test]
    fn insert_and_get_by_slot() {
        let mut slots = SlotCollection::<CardSlots>::new();
        slots.insert(CardSlot::Body, "p-4");

        assert_eq!(slots.get(CardSlot::Body).map(ToString::to_string).as_deref(), Some("p-4"));
        assert!(slots.get(CardSlot::Title).is_none());
        assert_eq!(slots.classes().get("body").map(ClassValue::len), Some(1));
    }

    #[test]
    fn shared_canonical_name_collapses_entries() {
        let slots = SlotCollection::<CardSlots>::new()
            .with(CardSlot::Body, "p-4")
            .with(CardSlot::Content, "p-6");

        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get(CardSlot::Body).unwrap().to_string(), "p-6");
    }

    #[test]
    fn empty_assignment_clears_slot() {
        let mut slots = SlotCollection::<CardSlots>::new().with(CardSlot::Title, "font-bold");
        slots.insert(CardSlot::Title, "  ");
        assert!(slots.is_empty());
        assert!(!slots.contains(CardSlot::Title));
    }

    #[test]
    fn strings_target_base_slot() {
        let slots = SlotCollection::<CardSlots>::from("flex items-center");
        assert_eq!(slots.get(CardSlot::Base).unwrap().to_string(), "flex items-center");

        let slots = SlotCollection::<CardSlots>::from(["flex", "", "gap-2"]);
        let base = slots.get(CardSlot::Base).unwrap();
        assert_eq!(base.len(), 2);
        assert_eq!(base.to_string(), "flex gap-2");
    }

    #[test]
    fn add_appends_to_existing_slot() {
        let mut slots = SlotCollection::<CardSlots>::new().with(CardSlot::Body, "p-4");
        slots.add(CardSlot::Content, "text-sm");
        slots.add(CardSlot::Body, " ");
        assert_eq!(slots.get(CardSlot::Body).unwrap().to_string(), "p-4 text-sm");
    }

    #[test]
    fn overrides_skip_unset_and_blank_slots() {
        let slots = CardSlots {
            base: Some("shadow".into()),
            body: Some("   ".into()),
            title: None,
        };
        let overrides: Vec<_> = slots.overrides().collect();
        assert_eq!(overrides, [("root", "shadow")]);
    }
}
