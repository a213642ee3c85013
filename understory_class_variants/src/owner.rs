// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owner capability: what a component exposes to the resolver.

use core::any::Any;

use crate::slots::Slots;

/// Reads one property of an owner as an opaque value.
///
/// `None` means the property is currently unset; it is not the same as the
/// owner type lacking the property, which [`Slotted::accessor`] reports.
pub type Accessor<O> = for<'a> fn(&'a O) -> Option<&'a dyn Any>;

/// A component instance whose classes are composed per slot.
///
/// Besides its slots type, an owner exposes two instance-level overrides and
/// a static property table. The table is how variants declared on an
/// ancestor descriptor (possibly for a different owner type) are rebound to
/// the most-derived owner: the variant's key is looked up by name, and a
/// missing property drops the variant.
///
/// # Example
///
/// ```rust
/// use core::any::Any;
/// use understory_class_variants::{Accessor, Slots, Slotted};
///
/// struct BadgeSlots;
///
/// impl Slots for BadgeSlots {
///     type Slot = ();
///     const BASE: () = ();
///     fn name(_: ()) -> &'static str { "base" }
///     fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> { core::iter::empty() }
/// }
///
/// struct Badge {
///     class: Option<String>,
///     pill: bool,
/// }
///
/// fn pill(badge: &Badge) -> Option<&dyn Any> {
///     Some(&badge.pill)
/// }
///
/// impl Slotted for Badge {
///     type Slots = BadgeSlots;
///
///     fn class(&self) -> Option<&str> { self.class.as_deref() }
///     fn classes(&self) -> Option<&BadgeSlots> { None }
///
///     fn accessor(property: &str) -> Option<Accessor<Self>> {
///         match property {
///             "pill" => Some(pill),
///             _ => None,
///         }
///     }
/// }
///
/// let badge = Badge { class: None, pill: true };
/// let read = Badge::accessor("pill").unwrap();
/// assert_eq!(read(&badge).and_then(|v| v.downcast_ref::<bool>()), Some(&true));
/// assert!(Badge::accessor("size").is_none());
/// ```
pub trait Slotted: Any + Sized {
    /// The slots type naming this owner's slots.
    type Slots: Slots;

    /// Returns the top-level class override, applied to the base slot last.
    fn class(&self) -> Option<&str>;

    /// Returns the per-slot overrides, if any were set.
    fn classes(&self) -> Option<&Self::Slots>;

    /// Returns the accessor for the property named `property`.
    ///
    /// Returns `None` when this owner type has no such property.
    fn accessor(property: &str) -> Option<Accessor<Self>>;
}
