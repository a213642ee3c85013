// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Class Variants: per-slot utility-class composition.
//!
//! This crate composes the final class string of every named slot of a
//! component (root element, icon, label, ...) from declarative rules:
//!
//! - a base class set and per-slot classes;
//! - [`Variant`]s, selecting classes by the value of one owner property;
//! - [`CompoundVariant`]s, applying classes when a predicate over the whole
//!   owner holds.
//!
//! Rules are declared on a [`Descriptor`], which can extend a parent
//! descriptor and add to or override its rules without redeclaring them.
//!
//! ## Compilation and resolution
//!
//! Building a descriptor walks its `extends` chain once and flattens it, so
//! the per-render work does not grow with the chain depth. A [`Resolver`]
//! then turns an owner instance and a compiled descriptor into a
//! [`SlotsMap`], accumulating classes per slot in this order:
//!
//! **Base/slot classes → Variants → Compound variants → Slot overrides → Class override**
//!
//! The accumulated string of each slot is passed through a [`ClassMerger`],
//! which resolves conflicting utilities (the last one in a conflict group
//! wins). This crate does not implement utility conflict resolution; it only
//! guarantees the order candidates are handed over in.
//!
//! ## Example
//!
//! ```rust
//! use core::any::Any;
//! use understory_class_variants::{
//!     Accessor, Concat, Descriptor, Resolver, SlotCollection, Slots, Slotted, Variant,
//!     VariantCollection, VariantKey,
//! };
//!
//! #[derive(Copy, Clone)]
//! enum ButtonSlot {
//!     Base,
//!     Icon,
//! }
//!
//! #[derive(Default)]
//! struct ButtonSlots {
//!     base: Option<String>,
//!     icon: Option<String>,
//! }
//!
//! impl Slots for ButtonSlots {
//!     type Slot = ButtonSlot;
//!     const BASE: ButtonSlot = ButtonSlot::Base;
//!
//!     fn name(slot: ButtonSlot) -> &'static str {
//!         match slot {
//!             ButtonSlot::Base => "root",
//!             ButtonSlot::Icon => "icon",
//!         }
//!     }
//!
//!     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> {
//!         [
//!             (Self::name(ButtonSlot::Base), self.base.as_deref()),
//!             (Self::name(ButtonSlot::Icon), self.icon.as_deref()),
//!         ]
//!         .into_iter()
//!         .filter_map(|(slot, value)| Some((slot, value?)))
//!         .filter(|(_, value)| !value.trim().is_empty())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Button {
//!     class: Option<String>,
//!     classes: Option<ButtonSlots>,
//!     size: Option<&'static str>,
//! }
//!
//! fn size(button: &Button) -> Option<&dyn Any> {
//!     button.size.as_ref().map(|size| size as &dyn Any)
//! }
//!
//! impl Slotted for Button {
//!     type Slots = ButtonSlots;
//!
//!     fn class(&self) -> Option<&str> {
//!         self.class.as_deref()
//!     }
//!
//!     fn classes(&self) -> Option<&ButtonSlots> {
//!         self.classes.as_ref()
//!     }
//!
//!     fn accessor(property: &str) -> Option<Accessor<Self>> {
//!         match property {
//!             "size" => Some(size),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! const SIZE: VariantKey<&'static str> = VariantKey::new("size");
//!
//! let large = SlotCollection::<ButtonSlots>::new()
//!     .with(ButtonSlot::Base, "h-12 px-6")
//!     .with(ButtonSlot::Icon, "size-6");
//!
//! let button = Descriptor::<Button>::builder()
//!     .base("inline-flex items-center")
//!     .slots(SlotCollection::new().with(ButtonSlot::Icon, "size-4"))
//!     .variants(VariantCollection::new().with(
//!         SIZE,
//!         Variant::new().with("sm", "h-8 px-3").with("lg", large),
//!     ))
//!     .build()
//!     .expect("button descriptor has no cycles");
//!
//! let resolver = Resolver::new(Concat);
//! let owner = Button {
//!     size: Some("lg"),
//!     class: Some("w-full".into()),
//!     ..Button::default()
//! };
//! let slots = resolver.resolve(&owner, &button);
//!
//! assert_eq!(slots.base(), Some("inline-flex items-center h-12 px-6 w-full"));
//! assert_eq!(slots.get(ButtonSlot::Icon), Some("size-4 size-6"));
//! ```
//!
//! ## Concurrency
//!
//! Descriptors are immutable once built and are `Send + Sync`. Resolution
//! allocates only per-call state, so a descriptor can be shared freely
//! across threads and renders.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature only enables
//! the `std` integrations of its dependencies.

#![no_std]

extern crate alloc;

mod class_value;
mod compound;
mod descriptor;
mod error;
mod owner;
mod resolve;
mod slots;
mod variant;

pub use class_value::ClassValue;
pub use compound::{CompiledCompoundVariant, CompoundVariant, CompoundVariantCollection};
pub use descriptor::{CompiledVariant, Descriptor, DescriptorBuilder, DescriptorLevel};
pub use error::{DescriptorError, MissingSlot};
pub use owner::{Accessor, Slotted};
pub use resolve::{ClassMerger, Concat, Resolver, SlotsMap};
pub use slots::{SlotClasses, SlotCollection, Slots};
pub use variant::{ErasedVariant, Variant, VariantCollection, VariantKey, VariantRule};
