//! End-to-end propagation across nested layout levels.
//!
//! A `resize` published at one level must cascade into exactly one
//! re-measure per descendant level, stop at levels whose size did not
//! change, and never duplicate or loop.

use std::cell::Cell;
use std::rc::Rc;

use sash_core::bus::{BusPayload, LAYOUT_RESIZE, RESIZE};
use sash_core::geometry::Size;
use sash_core::tracker::Measure;
use sash_layout::{Axis, Container, ContainerSpec, LayoutLevel, SizeDescriptor};

/// Probe that counts how often it is measured.
struct CountingProbe {
    size: Cell<Size>,
    measures: Cell<u32>,
}

impl CountingProbe {
    fn new(width: f64, height: f64) -> Rc<Self> {
        Rc::new(Self {
            size: Cell::new(Size::new(width, height)),
            measures: Cell::new(0),
        })
    }

    fn set(&self, width: f64, height: f64) {
        self.size.set(Size::new(width, height));
    }

    fn measures(&self) -> u32 {
        self.measures.get()
    }
}

impl Measure for CountingProbe {
    fn measure(&self) -> Size {
        self.measures.set(self.measures.get() + 1);
        self.size.get()
    }
}

fn one_child(id: &str) -> Vec<ContainerSpec> {
    vec![ContainerSpec::variable(id, SizeDescriptor::Auto)]
}

#[test]
fn one_resize_reaches_every_nested_level_exactly_once() {
    let probes: Vec<Rc<CountingProbe>> = (0..4)
        .map(|i| CountingProbe::new(800.0, 600.0 - i as f64))
        .collect();

    let root = LayoutLevel::mount(
        Axis::Row,
        one_child("c0"),
        Rc::clone(&probes[0]) as Rc<dyn Measure>,
        None,
    )
    .unwrap();

    let mut levels = vec![root];
    for (i, probe) in probes.iter().enumerate().skip(1) {
        let ctx = levels[i - 1].context();
        let level = LayoutLevel::mount(
            Axis::Row,
            one_child(&format!("c{i}")),
            Rc::clone(probe) as Rc<dyn Measure>,
            Some(&ctx),
        )
        .unwrap();
        levels.push(level);
    }

    // Every level measured exactly once at mount.
    for probe in &probes {
        assert_eq!(probe.measures(), 1);
    }

    // Cross-axis change at every level; one resize at the root.
    for probe in &probes {
        let current = probe.size.get();
        probe.set(current.width, current.height + 40.0);
    }
    levels[0].context().layout_bus().publish(RESIZE, BusPayload::Empty);

    assert_eq!(probes[0].measures(), 1, "root is not its own descendant");
    for probe in &probes[1..] {
        assert_eq!(probe.measures(), 2);
    }
}

#[test]
fn cascade_stops_at_an_unchanged_level() {
    let top = CountingProbe::new(800.0, 600.0);
    let mid = CountingProbe::new(400.0, 600.0);
    let deep = CountingProbe::new(400.0, 300.0);

    let root = LayoutLevel::mount(
        Axis::Row,
        one_child("top"),
        Rc::clone(&top) as Rc<dyn Measure>,
        None,
    )
    .unwrap();
    let root_ctx = root.context();
    let mid_level = LayoutLevel::mount(
        Axis::Row,
        one_child("mid"),
        Rc::clone(&mid) as Rc<dyn Measure>,
        Some(&root_ctx),
    )
    .unwrap();
    let mid_ctx = mid_level.context();
    let _deep_level = LayoutLevel::mount(
        Axis::Row,
        one_child("deep"),
        Rc::clone(&deep) as Rc<dyn Measure>,
        Some(&mid_ctx),
    )
    .unwrap();

    // Mid re-measures but its size is unchanged, so nothing reaches deep.
    root_ctx.layout_bus().publish(RESIZE, BusPayload::Empty);
    assert_eq!(mid.measures(), 2);
    assert_eq!(deep.measures(), 1);
}

#[test]
fn baseline_level_swallows_the_cascade() {
    let top = CountingProbe::new(800.0, 600.0);
    // Hidden at mount: measures (0, 0).
    let mid = CountingProbe::new(0.0, 0.0);
    let deep = CountingProbe::new(200.0, 100.0);

    let root = LayoutLevel::mount(
        Axis::Row,
        one_child("top"),
        Rc::clone(&top) as Rc<dyn Measure>,
        None,
    )
    .unwrap();
    let root_ctx = root.context();
    let mid_level = LayoutLevel::mount(
        Axis::Row,
        one_child("mid"),
        Rc::clone(&mid) as Rc<dyn Measure>,
        Some(&root_ctx),
    )
    .unwrap();
    let mid_ctx = mid_level.context();
    let _deep_level = LayoutLevel::mount(
        Axis::Row,
        one_child("deep"),
        Rc::clone(&deep) as Rc<dyn Measure>,
        Some(&mid_ctx),
    )
    .unwrap();

    // Mid becomes visible: its first real measurement is a baseline,
    // not a change, so it must not propagate further.
    mid.set(400.0, 600.0);
    root_ctx.layout_bus().publish(RESIZE, BusPayload::Empty);
    assert_eq!(mid.measures(), 2);
    assert_eq!(deep.measures(), 1);
}

#[test]
fn axis_selective_propagation_from_a_window_resize() {
    let probe = CountingProbe::new(800.0, 600.0);
    let root = LayoutLevel::mount(
        Axis::Row,
        vec![
            ContainerSpec::variable("a", 300.0),
            ContainerSpec::variable("b", 500.0),
        ],
        Rc::clone(&probe) as Rc<dyn Measure>,
        None,
    )
    .unwrap();
    let ctx = root.context();

    let resize_hits = Rc::new(Cell::new(0u32));
    {
        let hits = Rc::clone(&resize_hits);
        ctx.layout_bus()
            .subscribe(RESIZE, ctx.layout_bus().listener_id(), move |_| {
                hits.set(hits.get() + 1);
            });
    }
    let layout_resize_hits = Rc::new(Cell::new(0u32));
    {
        let hits = Rc::clone(&layout_resize_hits);
        ctx.containers_bus().subscribe(
            LAYOUT_RESIZE,
            ctx.containers_bus().listener_id(),
            move |_| hits.set(hits.get() + 1),
        );
    }

    let a = Container::mount(
        &ctx,
        ContainerSpec::variable("a", 300.0),
        Rc::new(|| Size::new(300.0, 600.0)),
    );
    let b = Container::mount(
        &ctx,
        ContainerSpec::variable("b", 500.0),
        Rc::new(|| Size::new(500.0, 600.0)),
    );

    // Width change on a row level: container bus only.
    probe.set(890.0, 600.0);
    root.recheck();
    assert_eq!(layout_resize_hits.get(), 1);
    assert_eq!(resize_hits.get(), 0);
    // 90px split equally between the two variable containers.
    assert_eq!(a.main_size(), Some(345.0));
    assert_eq!(b.main_size(), Some(545.0));

    // Height change on a row level: layout bus only, no redistribution.
    probe.set(890.0, 700.0);
    root.recheck();
    assert_eq!(layout_resize_hits.get(), 1);
    assert_eq!(resize_hits.get(), 1);
    assert_eq!(a.main_size(), Some(345.0));
    assert_eq!(b.main_size(), Some(545.0));
}

#[test]
fn fixed_container_ignores_layout_resize() {
    let probe = CountingProbe::new(600.0, 400.0);
    let root = LayoutLevel::mount(
        Axis::Row,
        vec![
            ContainerSpec::variable("flex", 400.0),
            ContainerSpec::fixed("rail", 200.0),
        ],
        Rc::clone(&probe) as Rc<dyn Measure>,
        None,
    )
    .unwrap();
    let ctx = root.context();

    let flex = Container::mount(
        &ctx,
        ContainerSpec::variable("flex", 400.0),
        Rc::new(|| Size::new(400.0, 400.0)),
    );
    let rail = Container::mount(
        &ctx,
        ContainerSpec::fixed("rail", 200.0),
        Rc::new(|| Size::new(200.0, 400.0)),
    );

    probe.set(660.0, 400.0);
    root.recheck();

    // The single variable container absorbs the whole delta.
    assert_eq!(flex.main_size(), Some(460.0));
    assert_eq!(rail.main_size(), Some(200.0));
}
