//! Retained-mode scene graph: widgets, elements, render objects.
//!
//! DESIGN
//! ======
//! A *widget* is a cheap, declarative description rebuilt every tick. An
//! *element* is the persistent instance behind a widget key; it survives
//! across ticks as long as its key keeps appearing. Leaf elements own exactly
//! one *render object*, which in turn owns the surface resources.
//!
//! Reconciliation at a composite or the root:
//!
//! 1. build the desired, ordered child widgets;
//! 2. hand each widget to the element with the same key (props only), or
//!    create and mount a new element when the key is new;
//! 3. unmount every element whose key was not produced;
//! 4. render every retained element, which lets props changes reach the
//!    render objects.
//!
//! A render object is only destroyed when its key disappears, or when the
//! same key comes back as a different widget type. Props changes never tear
//! it down. Children keep their first-mount order; new keys append.
//!
//! Leaves and composites plug in through [`LeafWidget`] and
//! [`CompositeWidget`], wrapped into the object-safe [`Widget`] by [`leaf`]
//! and [`composite`].

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::any::Any;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::ops::AddAssign;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::surface::{ContainerId, Surface};

/// Counters for one reconciliation pass, summed over the subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub mounted: usize,
    pub unmounted: usize,
    /// Same key, different widget type.
    pub remounted: usize,
    pub painted: usize,
}

impl AddAssign for ReconcileStats {
    fn add_assign(&mut self, rhs: Self) {
        self.mounted += rhs.mounted;
        self.unmounted += rhs.unmounted;
        self.remounted += rhs.remounted;
        self.painted += rhs.painted;
    }
}

/// A render object backing one leaf. Created mounted; `paint` pushes the
/// current parameters to the surface and `destroy` releases everything.
pub trait RenderLeaf: 'static {
    fn paint(&mut self, surface: &mut dyn Surface);
    fn destroy(&mut self, surface: &mut dyn Surface);
}

/// A widget backed by one render object.
pub trait LeafWidget<C>: 'static {
    type Render: RenderLeaf;

    fn key(&self) -> &str;

    /// Allocate the render object and its surface resources inside `container`.
    fn create_render_object(&self, ctx: &C, surface: &mut dyn Surface, container: ContainerId) -> Self::Render;

    /// Copy changed parameters into `render`. Returns whether it needs a repaint.
    fn update_render_object(&self, render: &mut Self::Render) -> bool;
}

/// A widget whose children are derived from application state.
pub trait CompositeWidget<C>: 'static {
    fn key(&self) -> &str;

    /// Desired children in paint order.
    fn build(&self, ctx: &C) -> Vec<Box<dyn Widget<C>>>;
}

/// Object-safe widget as seen by the reconciler.
pub trait Widget<C> {
    fn key(&self) -> &str;

    /// Create and mount the element for this widget.
    fn create_element(self: Box<Self>, ctx: &C, surface: &mut dyn Surface, container: ContainerId)
    -> Box<dyn Element<C>>;

    /// Hand this widget to an existing element. Gives the widget back when
    /// the element belongs to another widget type.
    fn update_element(self: Box<Self>, element: &mut dyn Element<C>) -> Result<(), Box<dyn Widget<C>>>;
}

/// Persistent instance behind a widget key.
pub trait Element<C> {
    /// Push the latest widget state down the subtree.
    fn render(&mut self, ctx: &C, surface: &mut dyn Surface) -> ReconcileStats;

    /// Destroy every surface resource in the subtree.
    fn unmount(&mut self, surface: &mut dyn Surface) -> ReconcileStats;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// --- Leaf ---

/// Adapter turning a [`LeafWidget`] into a [`Widget`].
pub struct Leaf<W>(pub W);

/// Box a leaf widget for a child list.
pub fn leaf<C: 'static, W: LeafWidget<C>>(widget: W) -> Box<dyn Widget<C>> {
    Box::new(Leaf(widget))
}

struct LeafElement<C, W: LeafWidget<C>> {
    widget: W,
    render: W::Render,
    needs_paint: bool,
    _ctx: PhantomData<fn(&C)>,
}

impl<C: 'static, W: LeafWidget<C>> Widget<C> for Leaf<W> {
    fn key(&self) -> &str {
        self.0.key()
    }

    fn create_element(
        self: Box<Self>,
        ctx: &C,
        surface: &mut dyn Surface,
        container: ContainerId,
    ) -> Box<dyn Element<C>> {
        let Leaf(widget) = *self;
        let render = widget.create_render_object(ctx, surface, container);
        trace!(key = widget.key(), "leaf mounted");
        Box::new(LeafElement { widget, render, needs_paint: false, _ctx: PhantomData })
    }

    fn update_element(self: Box<Self>, element: &mut dyn Element<C>) -> Result<(), Box<dyn Widget<C>>> {
        match element.as_any_mut().downcast_mut::<LeafElement<C, W>>() {
            Some(existing) => {
                let Leaf(widget) = *self;
                existing.widget = widget;
                Ok(())
            }
            None => Err(self),
        }
    }
}

impl<C: 'static, W: LeafWidget<C>> Element<C> for LeafElement<C, W> {
    fn render(&mut self, _ctx: &C, surface: &mut dyn Surface) -> ReconcileStats {
        if self.widget.update_render_object(&mut self.render) {
            self.needs_paint = true;
        }
        if !self.needs_paint {
            return ReconcileStats::default();
        }
        self.render.paint(surface);
        self.needs_paint = false;
        ReconcileStats { painted: 1, ..ReconcileStats::default() }
    }

    fn unmount(&mut self, surface: &mut dyn Surface) -> ReconcileStats {
        trace!(key = self.widget.key(), "leaf unmounted");
        self.render.destroy(surface);
        ReconcileStats::default()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// --- Composite ---

/// Adapter turning a [`CompositeWidget`] into a [`Widget`].
pub struct Composite<W>(pub W);

/// Box a composite widget for a child list.
pub fn composite<C: 'static, W: CompositeWidget<C>>(widget: W) -> Box<dyn Widget<C>> {
    Box::new(Composite(widget))
}

struct CompositeElement<C, W> {
    widget: W,
    container: ContainerId,
    children: Children<C>,
}

impl<C: 'static, W: CompositeWidget<C>> Widget<C> for Composite<W> {
    fn key(&self) -> &str {
        self.0.key()
    }

    /// Children are built on the element's first render, in the same pass.
    fn create_element(
        self: Box<Self>,
        _ctx: &C,
        _surface: &mut dyn Surface,
        container: ContainerId,
    ) -> Box<dyn Element<C>> {
        let Composite(widget) = *self;
        trace!(key = widget.key(), "composite mounted");
        Box::new(CompositeElement { widget, container, children: Children::new() })
    }

    fn update_element(self: Box<Self>, element: &mut dyn Element<C>) -> Result<(), Box<dyn Widget<C>>> {
        match element.as_any_mut().downcast_mut::<CompositeElement<C, W>>() {
            Some(existing) => {
                let Composite(widget) = *self;
                existing.widget = widget;
                Ok(())
            }
            None => Err(self),
        }
    }
}

impl<C: 'static, W: CompositeWidget<C>> Element<C> for CompositeElement<C, W> {
    fn render(&mut self, ctx: &C, surface: &mut dyn Surface) -> ReconcileStats {
        let widgets = self.widget.build(ctx);
        self.children.reconcile(widgets, ctx, surface, self.container)
    }

    fn unmount(&mut self, surface: &mut dyn Surface) -> ReconcileStats {
        trace!(key = self.widget.key(), "composite unmounted");
        self.children.unmount_all(surface)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// --- Keyed children ---

/// Persistent key → element map in first-mount order.
struct Children<C> {
    elements: IndexMap<String, Box<dyn Element<C>>>,
}

impl<C: 'static> Children<C> {
    fn new() -> Self {
        Self { elements: IndexMap::new() }
    }

    fn reconcile(
        &mut self,
        widgets: Vec<Box<dyn Widget<C>>>,
        ctx: &C,
        surface: &mut dyn Surface,
        container: ContainerId,
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let mut wanted: HashSet<String> = HashSet::with_capacity(widgets.len());

        for widget in widgets {
            let key = widget.key().to_owned();
            if !wanted.insert(key.clone()) {
                debug!(%key, "duplicate child key skipped");
                continue;
            }
            match self.elements.get_mut(&key) {
                Some(element) => {
                    if let Err(widget) = widget.update_element(element.as_mut()) {
                        stats += element.unmount(surface);
                        *element = widget.create_element(ctx, surface, container);
                        stats.remounted += 1;
                    }
                }
                None => {
                    let element = widget.create_element(ctx, surface, container);
                    self.elements.insert(key, element);
                    stats.mounted += 1;
                }
            }
        }

        let stale: Vec<String> = self.elements.keys().filter(|k| !wanted.contains(*k)).cloned().collect();
        for key in stale {
            if let Some(mut element) = self.elements.shift_remove(&key) {
                stats += element.unmount(surface);
                stats.unmounted += 1;
            }
        }

        for element in self.elements.values_mut() {
            stats += element.render(ctx, surface);
        }
        stats
    }

    fn unmount_all(&mut self, surface: &mut dyn Surface) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        for (_, mut element) in self.elements.drain(..) {
            stats += element.unmount(surface);
            stats.unmounted += 1;
        }
        stats
    }

    fn keys(&self) -> Vec<&str> {
        self.elements.keys().map(String::as_str).collect()
    }
}

// --- Root ---

/// Entry point driven once per tick. Owns a dedicated top-level container on
/// the surface, created on first render and destroyed by `unmount`.
pub struct RootElement<C> {
    key: String,
    container: Option<ContainerId>,
    children: Children<C>,
}

impl<C: 'static> RootElement<C> {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), container: None, children: Children::new() }
    }

    /// Reconcile the children produced by `build` against the retained tree.
    pub fn render_widgets<F>(&mut self, surface: &mut dyn Surface, ctx: &C, build: F) -> ReconcileStats
    where
        F: FnOnce(&C) -> Vec<Box<dyn Widget<C>>>,
    {
        let container = *self.container.get_or_insert_with(|| surface.create_container(None));
        let widgets = build(ctx);
        let stats = self.children.reconcile(widgets, ctx, surface, container);
        trace!(
            root = %self.key,
            mounted = stats.mounted,
            unmounted = stats.unmounted,
            remounted = stats.remounted,
            painted = stats.painted,
            "scene reconciled"
        );
        stats
    }

    /// Tear down every element and the root container. Rendering again
    /// mounts from scratch.
    pub fn unmount(&mut self, surface: &mut dyn Surface) -> ReconcileStats {
        let stats = self.children.unmount_all(surface);
        if let Some(container) = self.container.take() {
            surface.destroy_container(container);
            debug!(root = %self.key, unmounted = stats.unmounted, "scene unmounted");
        }
        stats
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.container.is_some()
    }

    #[must_use]
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// Keys of the direct children in paint order.
    #[must_use]
    pub fn child_keys(&self) -> Vec<&str> {
        self.children.keys()
    }
}
