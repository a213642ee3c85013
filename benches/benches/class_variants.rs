// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_class_variants` compilation and resolution.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::any::Any;
use std::sync::Once;
use std::{string::String, vec::Vec};

use understory_class_variants::{
    Accessor, CompoundVariant, CompoundVariantCollection, Concat, Descriptor, Resolver,
    SlotCollection, Slots, Slotted, Variant, VariantCollection, VariantKey,
};

#[derive(Copy, Clone)]
enum ButtonSlot {
    Base,
    Icon,
    Label,
}

#[derive(Default)]
struct ButtonSlots {
    base: Option<String>,
    icon: Option<String>,
    label: Option<String>,
}

impl Slots for ButtonSlots {
    type Slot = ButtonSlot;
    const BASE: ButtonSlot = ButtonSlot::Base;

    fn name(slot: ButtonSlot) -> &'static str {
        match slot {
            ButtonSlot::Base => "base",
            ButtonSlot::Icon => "icon",
            ButtonSlot::Label => "label",
        }
    }

    fn overrides(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (ButtonSlot::Base, self.base.as_deref()),
            (ButtonSlot::Icon, self.icon.as_deref()),
            (ButtonSlot::Label, self.label.as_deref()),
        ]
        .into_iter()
        .filter_map(|(slot, value)| Some((Self::name(slot), value?)))
        .filter(|(_, value)| !value.trim().is_empty())
    }
}

#[derive(Copy, Clone, PartialEq)]
enum Size {
    Sm,
    Md,
    Lg,
}

#[derive(Copy, Clone, PartialEq)]
enum Intent {
    Primary,
    Danger,
}

#[derive(Default)]
struct Button {
    class: Option<String>,
    classes: Option<ButtonSlots>,
    size: Option<Size>,
    intent: Option<Intent>,
    disabled: bool,
}

fn size(button: &Button) -> Option<&dyn Any> {
    button.size.as_ref().map(|size| size as &dyn Any)
}

fn intent(button: &Button) -> Option<&dyn Any> {
    button.intent.as_ref().map(|intent| intent as &dyn Any)
}

fn disabled(button: &Button) -> Option<&dyn Any> {
    Some(&button.disabled)
}

impl Slotted for Button {
    type Slots = ButtonSlots;

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn classes(&self) -> Option<&ButtonSlots> {
        self.classes.as_ref()
    }

    fn accessor(property: &str) -> Option<Accessor<Self>> {
        match property {
            "size" => Some(size),
            "intent" => Some(intent),
            "disabled" => Some(disabled),
            _ => None,
        }
    }
}

const SIZE: VariantKey<Size> = VariantKey::new("size");
const INTENT: VariantKey<Intent> = VariantKey::new("intent");
const DISABLED: VariantKey<bool> = VariantKey::new("disabled");

type ButtonSlotCollection = SlotCollection<ButtonSlots>;

fn sized(base: &str, icon: &str) -> ButtonSlotCollection {
    ButtonSlotCollection::new()
        .with(ButtonSlot::Base, base)
        .with(ButtonSlot::Icon, icon)
}

fn root() -> Descriptor<Button> {
    Descriptor::<Button>::builder()
        .base("inline-flex items-center rounded-md font-medium")
        .slots(
            ButtonSlotCollection::new()
                .with(ButtonSlot::Icon, "size-4 shrink-0")
                .with(ButtonSlot::Label, "truncate"),
        )
        .variants(
            VariantCollection::new()
                .with(
                    SIZE,
                    Variant::new()
                        .with(Size::Sm, sized("h-8 px-3 text-sm", "size-3"))
                        .with(Size::Md, sized("h-10 px-4", "size-4"))
                        .with(Size::Lg, sized("h-12 px-6 text-lg", "size-5")),
                )
                .with(
                    INTENT,
                    Variant::new()
                        .with(Intent::Primary, "bg-blue-600 text-white")
                        .with(Intent::Danger, "bg-red-600 text-white"),
                )
                .with(DISABLED, Variant::new().with(true, "opacity-50 pointer-events-none")),
        )
        .compound_variants(
            CompoundVariantCollection::new().with(
                CompoundVariant::new(|b: &Button| b.intent == Some(Intent::Danger) && b.disabled)
                    .with_class("bg-red-300"),
            ),
        )
        .build()
        .unwrap()
}

/// `depth` levels on top of [`root`], each overriding `size` and adding text.
fn chain(depth: usize) -> Descriptor<Button> {
    let mut descriptor = root();
    for i in 0..depth {
        let text = if i % 2 == 0 { "gap-2" } else { "gap-1" };
        descriptor = Descriptor::<Button>::builder()
            .extends(&descriptor)
            .base(text)
            .variants(VariantCollection::new().with(
                SIZE,
                Variant::new()
                    .with(Size::Sm, sized("h-7 px-2", "size-3"))
                    .with(Size::Lg, sized("h-14 px-8", "size-6")),
            ))
            .build()
            .unwrap();
    }
    descriptor
}

fn merge(classes: &str) -> String {
    let classes: Vec<&str> = classes.split_whitespace().collect();
    let mut kept = Vec::with_capacity(classes.len());
    for (i, class) in classes.iter().enumerate() {
        let group = class.rsplit_once('-').map_or(*class, |(group, _)| group);
        let shadowed = classes[i + 1..].iter().any(|later| {
            later.rsplit_once('-').map_or(*later, |(group, _)| group) == group
        });
        if !shadowed {
            kept.push(*class);
        }
    }
    kept.join(" ")
}

fn bench_compile(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: Descriptor<Button>={} ClassValue={} SlotCollection={}",
            core::mem::size_of::<Descriptor<Button>>(),
            core::mem::size_of::<understory_class_variants::ClassValue>(),
            core::mem::size_of::<ButtonSlotCollection>(),
        );
    });

    let mut group = c.benchmark_group("class_variants/compile");

    group.bench_function("root", |b| b.iter(|| black_box(root())));

    for depth in [1_usize, 4, 16] {
        let parent = chain(depth);
        group.bench_function(BenchmarkId::new("extends", depth), |b| {
            b.iter(|| {
                black_box(
                    Descriptor::<Button>::builder()
                        .extends(&parent)
                        .base("w-full")
                        .build()
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let descriptor = root();
    let plain = Button::default();
    let styled = Button {
        size: Some(Size::Lg),
        intent: Some(Intent::Danger),
        disabled: true,
        class: Some("w-full".into()),
        classes: Some(ButtonSlots {
            icon: Some("size-6".into()),
            ..ButtonSlots::default()
        }),
    };

    let mut group = c.benchmark_group("class_variants/resolve");

    let concat = Resolver::new(Concat);
    group.bench_function("plain/concat", |b| {
        b.iter(|| black_box(concat.resolve(&plain, &descriptor)));
    });
    group.bench_function("styled/concat", |b| {
        b.iter(|| black_box(concat.resolve(&styled, &descriptor)));
    });

    let merging = Resolver::new(merge);
    group.bench_function("styled/merge", |b| {
        b.iter(|| black_box(merging.resolve(&styled, &descriptor)));
    });

    // Resolution reads the flattened views only; cost should stay flat.
    for depth in [1_usize, 4, 16] {
        let descriptor = chain(depth);
        group.bench_function(BenchmarkId::new("styled/depth", depth), |b| {
            b.iter(|| black_box(concat.resolve(&styled, &descriptor)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_resolve);
criterion_main!(benches);
