//! Divider drags move space symmetrically between two siblings.

use std::rc::Rc;

use proptest::prelude::*;
use sash_core::geometry::Size;
use sash_core::tracker::Measure;
use sash_layout::{
    Axis, Container, ContainerSpec, Divider, DividerPlan, LayoutLevel, SizeDescriptor,
};

fn row_level(children: Vec<ContainerSpec>) -> LayoutLevel {
    let probe: Rc<dyn Measure> = Rc::new(|| Size::new(900.0, 600.0));
    LayoutLevel::mount(Axis::Row, children, probe, None).unwrap()
}

fn region(width: f64) -> Rc<dyn Measure> {
    Rc::new(move || Size::new(width, 600.0))
}

#[test]
fn fixed_sibling_is_excluded_from_dividers_and_variable_list() {
    let level = row_level(vec![
        ContainerSpec::variable("a", 300.0),
        ContainerSpec::variable("b", 300.0),
        ContainerSpec::fixed("c", 300.0),
    ]);

    assert_eq!(level.variable_ids(), vec!["a".into(), "b".into()]);
    assert_eq!(
        level.dividers(),
        vec![DividerPlan {
            before: "a".into(),
            after: "b".into(),
        }]
    );

    // The context sees the same classification through its live list.
    let ctx = level.context();
    assert_eq!(ctx.variable_count(), 2);
    assert!(ctx.is_variable(&"a".into()));
    assert!(!ctx.is_variable(&"c".into()));

    // A context taken before a child-set change reads the rebuilt list.
    level
        .set_children(vec![
            ContainerSpec::fixed("a", 300.0),
            ContainerSpec::variable("b", 300.0),
            ContainerSpec::fixed("c", 300.0),
        ])
        .unwrap();
    assert_eq!(ctx.variable_count(), 1);
    assert!(!ctx.is_variable(&"a".into()));
    assert!(ctx.is_variable(&"b".into()));
}

#[test]
fn drag_grows_before_and_shrinks_after() {
    let level = row_level(vec![
        ContainerSpec::variable("a", 400.0),
        ContainerSpec::variable("b", 500.0),
    ]);
    let ctx = level.context();

    let a = Container::mount(&ctx, ContainerSpec::variable("a", 400.0), region(400.0));
    let b = Container::mount(&ctx, ContainerSpec::variable("b", 500.0), region(500.0));

    let plans = level.dividers();
    assert_eq!(plans.len(), 1);
    let divider = Divider::mount(&ctx, plans[0].clone());

    divider.drag(30.0);
    assert_eq!(a.main_size(), Some(430.0));
    assert_eq!(b.main_size(), Some(470.0));

    divider.drag(-50.0);
    assert_eq!(a.main_size(), Some(380.0));
    assert_eq!(b.main_size(), Some(520.0));
}

#[test]
fn divider_with_unknown_neighbor_publishes_into_silence() {
    let level = row_level(vec![
        ContainerSpec::variable("a", 400.0),
        ContainerSpec::variable("b", 500.0),
    ]);
    let ctx = level.context();
    let a = Container::mount(&ctx, ContainerSpec::variable("a", 400.0), region(400.0));

    let divider = Divider::mount(
        &ctx,
        DividerPlan {
            before: "a".into(),
            after: "ghost".into(),
        },
    );
    // One side exists, the other does not; no panic, no error.
    divider.drag(25.0);
    assert_eq!(a.main_size(), Some(425.0));
}

#[test]
fn unmounted_container_stops_receiving_diffs() {
    let level = row_level(vec![
        ContainerSpec::variable("a", 400.0),
        ContainerSpec::variable("b", 500.0),
    ]);
    let ctx = level.context();

    let a = Container::mount(&ctx, ContainerSpec::variable("a", 400.0), region(400.0));
    let b = Container::mount(&ctx, ContainerSpec::variable("b", 500.0), region(500.0));
    let divider = Divider::mount(&ctx, level.dividers()[0].clone());

    divider.drag(10.0);
    assert_eq!(b.main_size(), Some(490.0));

    drop(b);
    divider.drag(10.0);
    assert_eq!(a.main_size(), Some(420.0));
    assert_eq!(ctx.containers_bus().listener_count(&sash_layout::ContainerId::new("b").resize_event()), 0);
}

proptest! {
    /// Any drag sequence conserves the pair's combined extent.
    #[test]
    fn drag_sequences_conserve_total(
        deltas in proptest::collection::vec(-250.0f64..250.0, 1..32)
    ) {
        let level = row_level(vec![
            ContainerSpec::variable("a", 400.0),
            ContainerSpec::variable("b", 500.0),
        ]);
        let ctx = level.context();
        let a = Container::mount(&ctx, ContainerSpec::variable("a", 400.0), region(400.0));
        let b = Container::mount(&ctx, ContainerSpec::variable("b", 500.0), region(500.0));
        let divider = Divider::mount(&ctx, level.dividers()[0].clone());

        let mut expected_a = 400.0;
        for delta in &deltas {
            divider.drag(*delta);
            expected_a += delta;
        }

        let total = a.main_size().unwrap() + b.main_size().unwrap();
        prop_assert!((total - 900.0).abs() < 1e-6);
        prop_assert!((a.main_size().unwrap() - expected_a).abs() < 1e-6);
    }
}
