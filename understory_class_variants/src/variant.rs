// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value-keyed variants.
//!
//! A [`Variant`] maps the possible values of one owner property to the slot
//! classes applied when that value is selected. Variants of different value
//! types are stored side by side in a [`VariantCollection`] behind the
//! object-safe [`ErasedVariant`] capability.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::owner::Slotted;
use crate::slots::{SlotClasses, SlotCollection, Slots};

/// A stable variant key: the name of the owner property backing a variant.
///
/// The phantom value type ties the key to the [`Variant`] value type at
/// declaration time. At compilation the key is looked up on the most-derived
/// owner through [`Slotted::accessor`].
///
/// # Example
///
/// ```rust
/// use understory_class_variants::VariantKey;
///
/// const SIZE: VariantKey<&'static str> = VariantKey::new("size");
/// assert_eq!(SIZE.name(), "size");
/// ```
pub struct VariantKey<V> {
    name: &'static str,
    _marker: PhantomData<fn() -> V>,
}

impl<V> VariantKey<V> {
    /// Creates a key for the property `name`.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl<V> Copy for VariantKey<V> {}

impl<V> Clone for VariantKey<V> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> PartialEq for VariantKey<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<V> Eq for VariantKey<V> {}

impl<V> fmt::Debug for VariantKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantKey")
            .field("name", &self.name)
            .field("type", &core::any::type_name::<V>())
            .finish()
    }
}

/// Value-keyed lookup of slot classes.
///
/// Values are compared with their natural equality. Entries keep their
/// declaration order; inserting an existing value replaces its classes in
/// place.
///
/// # Example
///
/// ```rust
/// # use understory_class_variants::{Slots, SlotCollection, Variant};
/// # struct S;
/// # impl Slots for S {
/// #     type Slot = ();
/// #     const BASE: () = ();
/// #     fn name(_: ()) -> &'static str { "base" }
/// #     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> { core::iter::empty() }
/// # }
/// let size = Variant::<&str, S>::new()
///     .with("sm", "text-sm")
///     .with("lg", "text-lg")
///     .with("sm", "text-xs");
///
/// assert_eq!(size.len(), 2);
/// assert_eq!(size.get(&"sm").unwrap().get(()).unwrap().to_string(), "text-xs");
/// assert!(size.get(&"md").is_none());
/// ```
pub struct Variant<V, S: Slots> {
    entries: Vec<(V, SlotCollection<S>)>,
}

impl<V: PartialEq, S: Slots> Variant<V, S> {
    /// Creates an empty variant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets the classes applied when `value` is selected.
    ///
    /// An existing entry for `value` is replaced without moving it.
    pub fn insert(&mut self, value: V, slots: impl Into<SlotCollection<S>>) {
        let slots = slots.into();
        match self.entries.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 = slots,
            None => self.entries.push((value, slots)),
        }
    }

    /// Sets the classes for `value` and returns `self`.
    #[must_use]
    pub fn with(mut self, value: V, slots: impl Into<SlotCollection<S>>) -> Self {
        self.insert(value, slots);
        self
    }

    /// Returns the classes applied when `value` is selected.
    #[must_use]
    pub fn get(&self, value: &V) -> Option<&SlotCollection<S>> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, slots)| slots)
    }

    /// Returns the number of values with classes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no value has classes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over `(value, classes)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &SlotCollection<S>)> + '_ {
        self.entries.iter().map(|(v, slots)| (v, slots))
    }
}

impl<V: PartialEq, S: Slots> Default for Variant<V, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug, S: Slots> fmt::Debug for Variant<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("entries", &self.entries)
            .finish()
    }
}

/// Type-erased variant lookup, used by compiled descriptors.
pub trait ErasedVariant: Send + Sync {
    /// Returns the classes for an opaque selected value.
    ///
    /// Returns `None` when no entry matches, including when `value` is not of
    /// the variant's value type.
    fn try_slots(&self, value: &dyn Any) -> Option<&SlotClasses>;
}

impl<V, S> ErasedVariant for Variant<V, S>
where
    V: PartialEq + Send + Sync + 'static,
    S: Slots,
{
    fn try_slots(&self, value: &dyn Any) -> Option<&SlotClasses> {
        let value = value.downcast_ref::<V>()?;
        self.get(value).map(SlotCollection::classes)
    }
}

/// One locally declared variant: a key and its erased value table.
#[derive(Clone)]
pub struct VariantRule {
    key: &'static str,
    variant: Arc<dyn ErasedVariant>,
}

impl VariantRule {
    /// Creates a rule for the property `key`.
    #[must_use]
    pub fn new(key: &'static str, variant: Arc<dyn ErasedVariant>) -> Self {
        Self { key, variant }
    }

    /// Returns the property name backing this rule.
    #[must_use]
    #[inline]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the erased value table.
    #[must_use]
    #[inline]
    pub fn variant(&self) -> &Arc<dyn ErasedVariant> {
        &self.variant
    }
}

impl fmt::Debug for VariantRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRule")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// The variants declared by one descriptor level.
///
/// Keys are unique within a collection: inserting a key again replaces the
/// earlier rule without moving it.
///
/// # Example
///
/// ```rust
/// # use core::any::Any;
/// # use understory_class_variants::{
/// #     Accessor, Slots, Slotted, Variant, VariantCollection, VariantKey,
/// # };
/// # struct S;
/// # impl Slots for S {
/// #     type Slot = ();
/// #     const BASE: () = ();
/// #     fn name(_: ()) -> &'static str { "base" }
/// #     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> { core::iter::empty() }
/// # }
/// # struct Button;
/// # impl Slotted for Button {
/// #     type Slots = S;
/// #     fn class(&self) -> Option<&str> { None }
/// #     fn classes(&self) -> Option<&S> { None }
/// #     fn accessor(_: &str) -> Option<Accessor<Self>> { None }
/// # }
/// const DISABLED: VariantKey<bool> = VariantKey::new("disabled");
///
/// let variants = VariantCollection::<Button>::new()
///     .with(DISABLED, Variant::new().with(true, "opacity-50"));
///
/// assert_eq!(variants.len(), 1);
/// assert_eq!(variants.rules()[0].key(), "disabled");
/// ```
pub struct VariantCollection<O: Slotted> {
    rules: Vec<VariantRule>,
    _marker: PhantomData<fn() -> O>,
}

impl<O: Slotted> VariantCollection<O> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declares the variant for `key`.
    pub fn insert<V>(&mut self, key: VariantKey<V>, variant: Variant<V, O::Slots>)
    where
        V: PartialEq + Send + Sync + 'static,
    {
        let rule = VariantRule::new(key.name(), Arc::new(variant));
        match self.rules.iter_mut().find(|r| r.key == key.name()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Declares the variant for `key` and returns `self`.
    #[must_use]
    pub fn with<V>(mut self, key: VariantKey<V>, variant: Variant<V, O::Slots>) -> Self
    where
        V: PartialEq + Send + Sync + 'static,
    {
        self.insert(key, variant);
        self
    }

    /// Returns the number of declared variants.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no variant is declared.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the declared rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[VariantRule] {
        &self.rules
    }

    pub(crate) fn into_rules(self) -> Vec<VariantRule> {
        self.rules
    }
}

impl<O: Slotted> Default for VariantCollection<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Slotted> fmt::Debug for VariantCollection<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantCollection")
            .field("owner", &core::any::type_name::<O>())
            .field("rules", &self.rules)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::tests::{CardSlot, CardSlots};
    use alloc::string::{String, ToString};

    fn body(classes: &str) -> SlotCollection<CardSlots> {
        SlotCollection::new().with(CardSlot::Body, classes)
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut size = Variant::<u8, CardSlots>::new();
        size.insert(1, body("p-1"));
        size.insert(2, body("p-2"));
        size.insert(1, body("p-0"));

        let values: Vec<_> = size.iter().map(|(v, _)| *v).collect();
        assert_eq!(values, [1, 2]);
        let classes = size.get(&1).unwrap().get(CardSlot::Body).unwrap();
        assert_eq!(classes.to_string(), "p-0");
    }

    #[test]
    fn erased_lookup_matches_by_value() {
        let compact = Variant::<bool, CardSlots>::new().with(true, body("p-2"));
        let erased: &dyn ErasedVariant = &compact;

        let hit = erased.try_slots(&true).unwrap();
        assert_eq!(hit.get("body").unwrap().to_string(), "p-2");
        assert!(erased.try_slots(&false).is_none());
    }

    #[test]
    fn erased_lookup_rejects_wrong_type() {
        let color = Variant::<String, CardSlots>::new().with("red".into(), "text-red-500");
        let erased: &dyn ErasedVariant = &color;

        assert!(erased.try_slots(&String::from("red")).is_some());
        // Same text, different runtime type.
        assert!(erased.try_slots(&"red").is_none());
        assert!(erased.try_slots(&1_u32).is_none());
    }

    #[test]
    fn enum_values_compare_naturally() {
        #[derive(Debug, PartialEq)]
        enum Tone {
            Neutral,
            Danger,
        }

        let tone = Variant::<Tone, CardSlots>::new()
            .with(Tone::Neutral, "bg-gray-100")
            .with(Tone::Danger, "bg-red-100");
        let erased: &dyn ErasedVariant = &tone;

        let hit = erased.try_slots(&Tone::Danger).unwrap();
        assert_eq!(hit.get("root").unwrap().to_string(), "bg-red-100");
    }

    #[test]
    fn key_equality_is_by_name() {
        const A: VariantKey<bool> = VariantKey::new("compact");
        const B: VariantKey<bool> = VariantKey::new("compact");
        assert_eq!(A, B);
        assert_ne!(A, VariantKey::new("dense"));
    }
}
