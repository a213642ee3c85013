// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptors and their one-time compilation.
//!
//! A [`Descriptor`] declares one level of style rules and may extend a parent
//! level. Building it walks the whole `extends` chain once and flattens it
//! into three immutable views:
//!
//! - compiled slots: per slot, every level's classes, ancestor text first;
//! - compiled variants: deduplicated by key, rebound to the final owner,
//!   positioned by the first declaration of each key;
//! - compiled compound variants: every level's list, ancestor first.
//!
//! Resolution only ever reads these views, so its cost does not depend on
//! the depth of the chain.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace, warn};

use crate::class_value::ClassValue;
use crate::compound::{CompiledCompoundVariant, CompoundVariantCollection};
use crate::error::DescriptorError;
use crate::owner::{Accessor, Slotted};
use crate::slots::{SlotClasses, SlotCollection, Slots};
use crate::variant::{ErasedVariant, VariantCollection, VariantRule};

/// The local, uncompiled rules of one level of an `extends` chain.
///
/// [`Descriptor`] implements this for the levels it declares. Other
/// implementations can be chained through
/// [`DescriptorBuilder::extends_level`]; levels are identified by address and
/// concrete type while the chain is walked.
pub trait DescriptorLevel: Any + Send + Sync {
    /// Returns the parent level, if any.
    fn extends(&self) -> Option<&dyn DescriptorLevel>;

    /// Returns the classes this level adds to the base slot.
    fn base_class(&self) -> Option<&ClassValue>;

    /// Returns the per-slot classes this level declares.
    fn slot_classes(&self) -> Option<&SlotClasses>;

    /// Returns the variants this level declares, in declaration order.
    fn variant_rules(&self) -> &[VariantRule];

    /// Returns the compound variants this level declares, already erased.
    fn compound_variants(&self) -> &[CompiledCompoundVariant];
}

/// Reads a variant's backing property from the owner it was bound to.
trait ErasedAccessor: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any>;
}

struct BoundAccessor<O> {
    get: Accessor<O>,
}

impl<O: Slotted> ErasedAccessor for BoundAccessor<O> {
    fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        owner.downcast_ref::<O>().and_then(|owner| (self.get)(owner))
    }
}

/// A variant ready for evaluation against the most-derived owner.
pub struct CompiledVariant {
    key: &'static str,
    accessor: Box<dyn ErasedAccessor>,
    variant: Arc<dyn ErasedVariant>,
}

impl CompiledVariant {
    /// Returns the variant key (the backing property name).
    #[must_use]
    #[inline]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Reads the selected value from `owner`.
    ///
    /// Returns `None` when the property is unset or `owner` is not of the
    /// type this variant was bound to.
    #[must_use]
    pub fn select<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        self.accessor.get(owner)
    }

    /// Returns the underlying value table.
    #[must_use]
    #[inline]
    pub fn variant(&self) -> &dyn ErasedVariant {
        &*self.variant
    }
}

impl fmt::Debug for CompiledVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledVariant")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// One declared level: local rules plus the parent reference.
struct Level {
    extends: Option<Arc<dyn DescriptorLevel>>,
    base: Option<ClassValue>,
    slots: Option<SlotClasses>,
    variants: Vec<VariantRule>,
    compound_variants: Vec<CompiledCompoundVariant>,
}

impl DescriptorLevel for Level {
    fn extends(&self) -> Option<&dyn DescriptorLevel> {
        self.extends.as_deref()
    }

    fn base_class(&self) -> Option<&ClassValue> {
        self.base.as_ref()
    }

    fn slot_classes(&self) -> Option<&SlotClasses> {
        self.slots.as_ref()
    }

    fn variant_rules(&self) -> &[VariantRule] {
        &self.variants
    }

    fn compound_variants(&self) -> &[CompiledCompoundVariant] {
        &self.compound_variants
    }
}

struct DescriptorData {
    level: Level,
    slots: HashMap<&'static str, String>,
    variants: Vec<CompiledVariant>,
    compound_variants: Vec<CompiledCompoundVariant>,
}

impl DescriptorLevel for DescriptorData {
    fn extends(&self) -> Option<&dyn DescriptorLevel> {
        self.level.extends()
    }

    fn base_class(&self) -> Option<&ClassValue> {
        self.level.base_class()
    }

    fn slot_classes(&self) -> Option<&SlotClasses> {
        self.level.slot_classes()
    }

    fn variant_rules(&self) -> &[VariantRule] {
        self.level.variant_rules()
    }

    fn compound_variants(&self) -> &[CompiledCompoundVariant] {
        self.level.compound_variants()
    }
}

/// A compiled level of style rules for the owner type `O`.
///
/// Descriptors are immutable once built and cheap to clone (the data is
/// shared through an [`Arc`]). They are usually built once, at startup or in
/// a static, and then shared by every render.
///
/// # Example
///
/// ```rust
/// # use core::any::Any;
/// # use understory_class_variants::{Accessor, Slots, Slotted};
/// use understory_class_variants::{
///     Descriptor, SlotCollection, Variant, VariantCollection, VariantKey,
/// };
/// # #[derive(Copy, Clone)]
/// # enum CardSlot { Base, Body }
/// # struct CardSlots;
/// # impl Slots for CardSlots {
/// #     type Slot = CardSlot;
/// #     const BASE: CardSlot = CardSlot::Base;
/// #     fn name(slot: CardSlot) -> &'static str {
/// #         match slot { CardSlot::Base => "base", CardSlot::Body => "body" }
/// #     }
/// #     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> { core::iter::empty() }
/// # }
/// # struct Card { compact: bool }
/// # fn compact(card: &Card) -> Option<&dyn Any> { Some(&card.compact) }
/// # impl Slotted for Card {
/// #     type Slots = CardSlots;
/// #     fn class(&self) -> Option<&str> { None }
/// #     fn classes(&self) -> Option<&CardSlots> { None }
/// #     fn accessor(property: &str) -> Option<Accessor<Self>> {
/// #         match property { "compact" => Some(compact), _ => None }
/// #     }
/// # }
/// const COMPACT: VariantKey<bool> = VariantKey::new("compact");
///
/// let card = Descriptor::<Card>::builder()
///     .base("rounded-lg shadow")
///     .slots(SlotCollection::new().with(CardSlot::Body, "p-4"))
///     .variants(VariantCollection::new().with(
///         COMPACT,
///         Variant::new().with(true, SlotCollection::new().with(CardSlot::Body, "p-2")),
///     ))
///     .build()
///     .unwrap();
///
/// let media_card = Descriptor::<Card>::builder()
///     .extends(&card)
///     .base("overflow-hidden")
///     .build()
///     .unwrap();
///
/// assert_eq!(media_card.compiled_slot("base"), Some("rounded-lg shadow overflow-hidden"));
/// assert_eq!(media_card.compiled_slot("body"), Some("p-4"));
/// assert_eq!(media_card.compiled_variants()[0].key(), "compact");
/// ```
pub struct Descriptor<O: Slotted> {
    inner: Arc<DescriptorData>,
    _marker: PhantomData<fn() -> O>,
}

impl<O: Slotted> Descriptor<O> {
    /// Starts declaring a descriptor.
    #[must_use]
    pub fn builder() -> DescriptorBuilder<O> {
        DescriptorBuilder::new()
    }

    /// Returns the compiled classes of the slot `name`.
    #[must_use]
    pub fn compiled_slot(&self, name: &str) -> Option<&str> {
        self.inner.slots.get(name).map(String::as_str)
    }

    /// Returns every compiled `(slot name, classes)` pair.
    ///
    /// Iteration order is unspecified.
    pub fn compiled_slots(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.inner
            .slots
            .iter()
            .map(|(name, classes)| (*name, classes.as_str()))
    }

    /// Returns the compiled variants in evaluation order.
    #[must_use]
    pub fn compiled_variants(&self) -> &[CompiledVariant] {
        &self.inner.variants
    }

    /// Returns the compiled compound variants, ancestor levels first.
    #[must_use]
    pub fn compiled_compound_variants(&self) -> &[CompiledCompoundVariant] {
        &self.inner.compound_variants
    }
}

impl<O: Slotted> Clone for Descriptor<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<O: Slotted> DescriptorLevel for Descriptor<O> {
    fn extends(&self) -> Option<&dyn DescriptorLevel> {
        self.inner.extends()
    }

    fn base_class(&self) -> Option<&ClassValue> {
        self.inner.base_class()
    }

    fn slot_classes(&self) -> Option<&SlotClasses> {
        self.inner.slot_classes()
    }

    fn variant_rules(&self) -> &[VariantRule] {
        self.inner.variant_rules()
    }

    fn compound_variants(&self) -> &[CompiledCompoundVariant] {
        self.inner.compound_variants()
    }
}

impl<O: Slotted> fmt::Debug for Descriptor<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("owner", &core::any::type_name::<O>())
            .field("slots", &self.inner.slots)
            .field("variants", &self.inner.variants)
            .field("compound_variants", &self.inner.compound_variants.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Descriptor`].
pub struct DescriptorBuilder<O: Slotted> {
    extends: Option<Arc<dyn DescriptorLevel>>,
    base: Option<ClassValue>,
    slots: Option<SlotClasses>,
    variants: Vec<VariantRule>,
    compound_variants: Vec<CompiledCompoundVariant>,
    _marker: PhantomData<fn() -> O>,
}

impl<O: Slotted> DescriptorBuilder<O> {
    /// Creates a builder with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extends: None,
            base: None,
            slots: None,
            variants: Vec::new(),
            compound_variants: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Extends `parent`, which may describe a different owner type.
    #[must_use]
    pub fn extends<P: Slotted>(mut self, parent: &Descriptor<P>) -> Self {
        let parent: Arc<dyn DescriptorLevel> = parent.inner.clone();
        self.extends = Some(parent);
        self
    }

    /// Extends an arbitrary level.
    #[must_use]
    pub fn extends_level(mut self, parent: Arc<dyn DescriptorLevel>) -> Self {
        self.extends = Some(parent);
        self
    }

    /// Sets the classes this level adds to the base slot.
    #[must_use]
    pub fn base(mut self, classes: impl Into<ClassValue>) -> Self {
        let classes = classes.into();
        self.base = (!classes.is_empty()).then_some(classes);
        self
    }

    /// Sets the per-slot classes of this level.
    #[must_use]
    pub fn slots(mut self, slots: SlotCollection<O::Slots>) -> Self {
        self.slots = Some(slots.into_classes());
        self
    }

    /// Sets the variants of this level.
    #[must_use]
    pub fn variants(mut self, variants: VariantCollection<O>) -> Self {
        self.variants = variants.into_rules();
        self
    }

    /// Sets the compound variants of this level, erasing them immediately.
    #[must_use]
    pub fn compound_variants(mut self, compound_variants: CompoundVariantCollection<O>) -> Self {
        self.compound_variants = compound_variants.compile();
        self
    }

    /// Compiles the full `extends` chain and builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::CyclicExtends`] if a level is reached twice
    /// while walking the chain.
    pub fn build(self) -> Result<Descriptor<O>, DescriptorError> {
        let level = Level {
            extends: self.extends,
            base: self.base,
            slots: self.slots,
            variants: self.variants,
            compound_variants: self.compound_variants,
        };

        let chain = collect_chain(&level)?;
        let slots = compile_slots::<O>(&chain);
        let variants = compile_variants::<O>(&chain);
        let compound_variants: Vec<_> = chain
            .iter()
            .flat_map(|level| level.compound_variants().iter().cloned())
            .collect();

        debug!(
            owner = core::any::type_name::<O>(),
            depth = chain.len(),
            slots = slots.len(),
            variants = variants.len(),
            compound_variants = compound_variants.len(),
            "compiled descriptor"
        );

        Ok(Descriptor {
            inner: Arc::new(DescriptorData {
                level,
                slots,
                variants,
                compound_variants,
            }),
            _marker: PhantomData,
        })
    }
}

impl<O: Slotted> Default for DescriptorBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Slotted> fmt::Debug for DescriptorBuilder<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorBuilder")
            .field("owner", &core::any::type_name::<O>())
            .field("extends", &self.extends.is_some())
            .field("base", &self.base)
            .field("slots", &self.slots)
            .field("variants", &self.variants)
            .field("compound_variants", &self.compound_variants)
            .finish()
    }
}

/// Walks from `level` to the root and returns the chain, root first.
fn collect_chain(
    level: &dyn DescriptorLevel,
) -> Result<Vec<&dyn DescriptorLevel>, DescriptorError> {
    let mut seen: HashSet<(*const (), TypeId)> = HashSet::new();
    let mut chain = Vec::new();
    let mut current = Some(level);
    while let Some(level) = current {
        if !seen.insert(identity(level)) {
            return Err(DescriptorError::CyclicExtends { depth: chain.len() });
        }
        chain.push(level);
        current = level.extends();
    }
    chain.reverse();
    Ok(chain)
}

/// Address and concrete type of a level.
///
/// The address alone is ambiguous: a level stored inline as the first field of
/// another level shares its address, and so do zero-sized levels.
fn identity(level: &dyn DescriptorLevel) -> (*const (), TypeId) {
    let any: &dyn Any = level;
    (core::ptr::from_ref(level).cast::<()>(), Any::type_id(any))
}

/// Concatenates base and slot classes per slot, ancestor text first.
fn compile_slots<O: Slotted>(chain: &[&dyn DescriptorLevel]) -> HashMap<&'static str, String> {
    let base_name = <O::Slots as Slots>::name(<O::Slots as Slots>::BASE);
    let mut builders: HashMap<&'static str, String> = HashMap::new();

    for level in chain {
        if let Some(base) = level.base_class() {
            append(&mut builders, base_name, base);
        }
        if let Some(slots) = level.slot_classes() {
            for (name, classes) in slots.iter() {
                append(&mut builders, name, classes);
            }
        }
    }

    builders.retain(|_, classes| !classes.is_empty());
    builders
}

fn append(builders: &mut HashMap<&'static str, String>, name: &'static str, classes: &ClassValue) {
    if classes.is_empty() {
        return;
    }
    classes.append_to(builders.entry(name).or_default());
}

/// Deduplicates variants by key and rebinds them to the owner `O`.
///
/// A later declaration of a key replaces the earlier one in place. A key
/// without a backing property on `O` is dropped, along with any entry an
/// ancestor declared for it.
fn compile_variants<O: Slotted>(chain: &[&dyn DescriptorLevel]) -> Vec<CompiledVariant> {
    let mut compiled: Vec<CompiledVariant> = Vec::new();

    for level in chain {
        for rule in level.variant_rules() {
            let key = rule.key();
            if key.trim().is_empty() {
                warn!(owner = core::any::type_name::<O>(), "skipping variant with an empty key");
                continue;
            }

            let position = compiled.iter().position(|v| v.key == key);
            let Some(get) = O::accessor(key) else {
                trace!(
                    key,
                    owner = core::any::type_name::<O>(),
                    "dropping variant without a backing property"
                );
                if let Some(position) = position {
                    compiled.remove(position);
                }
                continue;
            };

            let entry = CompiledVariant {
                key,
                accessor: Box::new(BoundAccessor::<O> { get }),
                variant: Arc::clone(rule.variant()),
            };
            match position {
                Some(position) => {
                    trace!(key, "overriding inherited variant");
                    compiled[position] = entry;
                }
                None => compiled.push(entry),
            }
        }
    }

    compiled
}
