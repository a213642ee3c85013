// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered class fragments for a single slot.

use alloc::string::String;
use core::fmt;

use smallvec::SmallVec;

/// An ordered list of class fragments for one slot.
///
/// Fragments keep their insertion order and are joined with a single space
/// when the value is displayed. Empty and whitespace-only fragments are never
/// stored.
///
/// # Example
///
/// ```rust
/// use understory_class_variants::ClassValue;
///
/// let mut value = ClassValue::from("px-4 py-2");
/// value.add("   ");
/// value.add("rounded");
///
/// assert_eq!(value.len(), 2);
/// assert_eq!(value.to_string(), "px-4 py-2 rounded");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ClassValue {
    /// Most slots carry one or two fragments.
    fragments: SmallVec<[String; 2]>,
}

impl ClassValue {
    /// Creates an empty class value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment, ignoring empty or whitespace-only input.
    pub fn add(&mut self, fragment: &str) {
        if fragment.trim().is_empty() {
            return;
        }
        self.fragments.push(String::from(fragment));
    }

    /// Appends a fragment and returns `self`.
    #[must_use]
    pub fn with(mut self, fragment: &str) -> Self {
        self.add(fragment);
        self
    }

    /// Returns `true` if no fragment has been stored.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns the number of stored fragments.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns an iterator over the fragments in insertion order.
    pub fn fragments(&self) -> impl Iterator<Item = &str> + '_ {
        self.fragments.iter().map(String::as_str)
    }

    /// Writes the space-joined, trimmed fragments into `out`.
    ///
    /// A separating space is inserted first when `out` is not empty.
    pub(crate) fn append_to(&self, out: &mut String) {
        for fragment in &self.fragments {
            push_class(out, fragment);
        }
    }
}

/// Appends `classes` to `out`, space separated, after trimming.
///
/// Empty or whitespace-only input leaves `out` untouched.
pub(crate) fn push_class(out: &mut String, classes: &str) {
    let classes = classes.trim();
    if classes.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(classes);
}

impl fmt::Display for ClassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for fragment in &self.fragments {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(fragment)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for ClassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassValue").field(&self.fragments).finish()
    }
}

impl From<&str> for ClassValue {
    fn from(value: &str) -> Self {
        Self::new().with(value)
    }
}

impl From<String> for ClassValue {
    fn from(value: String) -> Self {
        if value.trim().is_empty() {
            return Self::new();
        }
        let mut fragments = SmallVec::new();
        fragments.push(value);
        Self { fragments }
    }
}

impl<const N: usize> From<[&str; N]> for ClassValue {
    fn from(values: [&str; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a> FromIterator<&'a str> for ClassValue {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut value = Self::new();
        for fragment in iter {
            value.add(fragment);
        }
        value
    }
}
