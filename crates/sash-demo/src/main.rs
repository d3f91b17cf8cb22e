#![forbid(unsafe_code)]

//! Scripted demo screens for the sash layout engine.
//!
//! Each screen mounts a layout against hand-scripted measurement
//! probes (standing in for the geometry queries a real host would run
//! against its render tree), drives a few host events, and prints a
//! JSON report of the engine's bookkeeping after each step.
//!
//! # Running
//!
//! ```sh
//! cargo run -p sash-demo -- simple
//! cargo run -p sash-demo -- nested
//! ```

use std::cell::Cell;
use std::env;
use std::error::Error;
use std::process::ExitCode;
use std::rc::Rc;

use sash_core::{Dimensions, Measure, Size};
use sash_layout::{Axis, Container, ContainerSpec, Divider, LayoutLevel, SizeDescriptor};
use serde::Serialize;

fn main() -> ExitCode {
    let screen = env::args().nth(1).unwrap_or_else(|| "all".to_owned());
    let result = match screen.as_str() {
        "simple" => simple(),
        "nested" => nested(),
        "all" => simple().and_then(|()| nested()),
        other => {
            eprintln!("unknown screen {other:?}; expected simple, nested, or all");
            return ExitCode::FAILURE;
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// A region whose size the demo script controls directly.
#[derive(Clone)]
struct ScriptedRegion {
    size: Rc<Cell<Size>>,
}

impl ScriptedRegion {
    fn new(width: f64, height: f64) -> Self {
        Self {
            size: Rc::new(Cell::new(Size::new(width, height))),
        }
    }

    fn set(&self, width: f64, height: f64) {
        self.size.set(Size::new(width, height));
    }

    fn probe(&self) -> Rc<dyn Measure> {
        let size = Rc::clone(&self.size);
        Rc::new(move || size.get())
    }
}

#[derive(Serialize)]
struct ContainerReport {
    id: String,
    main_size: Option<f64>,
    dimensions: Dimensions,
}

impl ContainerReport {
    fn of(container: &Container) -> Self {
        Self {
            id: container.id().to_string(),
            main_size: container.main_size(),
            dimensions: container.dimensions(),
        }
    }
}

#[derive(Serialize)]
struct StepReport<'a> {
    step: &'a str,
    containers: Vec<ContainerReport>,
}

fn emit_step(step: &str, containers: &[&Container]) -> Result<(), Box<dyn Error>> {
    let report = StepReport {
        step,
        containers: containers.iter().map(|c| ContainerReport::of(c)).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// A column of two resizable panes; the lower one hosts a nested row
/// whose right pane is sized to the row's height (a square).
fn simple() -> Result<(), Box<dyn Error>> {
    println!("== simple ==");

    let window = ScriptedRegion::new(1280.0, 800.0);
    let root = LayoutLevel::mount(
        Axis::Column,
        vec![
            ContainerSpec::variable("top", SizeDescriptor::Auto),
            ContainerSpec::variable("parent", 400.0),
        ],
        window.probe(),
        None,
    )?;
    let ctx = root.context();

    let top_region = ScriptedRegion::new(1280.0, 400.0);
    let parent_region = ScriptedRegion::new(1280.0, 400.0);
    let top = Container::mount(
        &ctx,
        ContainerSpec::variable("top", SizeDescriptor::Auto),
        top_region.probe(),
    );
    let parent = Container::mount(
        &ctx,
        ContainerSpec::variable("parent", 400.0),
        parent_region.probe(),
    );

    let inner = LayoutLevel::mount(
        Axis::Row,
        vec![
            ContainerSpec::variable("bottom_left", SizeDescriptor::Auto),
            ContainerSpec::variable("square", 400.0),
        ],
        parent_region.probe(),
        Some(&ctx),
    )?;
    let inner_ctx = inner.context();

    let bottom_left_region = ScriptedRegion::new(880.0, 400.0);
    let square_region = ScriptedRegion::new(400.0, 400.0);
    let bottom_left = Container::mount(
        &inner_ctx,
        ContainerSpec::variable("bottom_left", SizeDescriptor::Auto),
        bottom_left_region.probe(),
    );
    let square = Container::mount(
        &inner_ctx,
        ContainerSpec::variable("square", 400.0),
        square_region.probe(),
    );

    let all = [&top, &parent, &bottom_left, &square];
    emit_step("mounted", &all)?;

    // Drag the divider between the two column panes 60px down.
    let plan = root
        .dividers()
        .into_iter()
        .next()
        .ok_or("column level has no divider")?;
    let divider = Divider::mount(&ctx, plan);
    divider.drag(60.0);
    top_region.set(1280.0, 460.0);
    parent_region.set(1280.0, 340.0);
    top.recheck();
    parent.recheck();
    emit_step("divider dragged +60", &all)?;

    // Window grows 100px taller: a main-axis change for the column
    // root, split equally between its two variable panes.
    window.set(1280.0, 900.0);
    root.recheck();
    top_region.set(1280.0, 510.0);
    parent_region.set(1280.0, 390.0);
    top.recheck();
    parent.recheck();
    emit_step("window 100px taller", &all)?;

    // Window grows 120px wider: cross-axis for the column root, so
    // descendants re-measure. The inner row sees the width change on
    // its own main axis and redistributes it.
    window.set(1400.0, 900.0);
    top_region.set(1400.0, 510.0);
    parent_region.set(1400.0, 390.0);
    root.recheck();
    bottom_left_region.set(940.0, 390.0);
    square_region.set(460.0, 390.0);
    top.recheck();
    parent.recheck();
    bottom_left.recheck();
    square.recheck();
    emit_step("window 120px wider", &all)?;

    Ok(())
}

#[derive(Serialize)]
struct LevelReport {
    depth: usize,
    axis: Axis,
    dimensions: Dimensions,
}

/// Four levels deep with alternating axes, each holding a content pane
/// and a pane that hosts the next level.
fn nested() -> Result<(), Box<dyn Error>> {
    println!("== nested ==");

    let window = ScriptedRegion::new(1280.0, 800.0);
    let mut regions = vec![window.clone()];
    let mut levels = Vec::new();

    let root = LayoutLevel::mount(
        Axis::Row,
        vec![
            ContainerSpec::variable("content", SizeDescriptor::Auto),
            ContainerSpec::variable("rest", SizeDescriptor::Auto),
        ],
        window.probe(),
        None,
    )?;
    levels.push(root);

    for depth in 1..4 {
        let parent_ctx = levels[depth - 1].context();
        let axis = if depth % 2 == 0 { Axis::Row } else { Axis::Column };
        let size = window.size.get();
        let region = ScriptedRegion::new(
            size.width / 2f64.powi(depth as i32),
            size.height / 2f64.powi(depth as i32),
        );
        let level = LayoutLevel::mount(
            axis,
            vec![
                ContainerSpec::variable("content", SizeDescriptor::Auto),
                ContainerSpec::variable("rest", SizeDescriptor::Auto),
            ],
            region.probe(),
            Some(&parent_ctx),
        )?;
        regions.push(region);
        levels.push(level);
    }

    let snapshot = |step: &str| -> Result<(), Box<dyn Error>> {
        let report: Vec<LevelReport> = levels
            .iter()
            .enumerate()
            .map(|(depth, level)| LevelReport {
                depth,
                axis: level.axis(),
                dimensions: level.dimensions(),
            })
            .collect();
        println!("-- {step} --");
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    };

    snapshot("mounted")?;

    // A height-only window change is cross-axis for the row root; the
    // relay rechecks each nested level, and the scripted regions keep
    // every change on that level's cross axis so the cascade runs the
    // full depth.
    window.set(1280.0, 860.0);
    regions[1].set(672.0, 400.0);
    regions[2].set(320.0, 215.0);
    regions[3].set(176.0, 100.0);
    levels[0].recheck();
    snapshot("window 60px taller, cascade re-measured every level")?;

    // This time the region two levels down did not change; the cascade
    // stops at the first level that re-measures unchanged.
    window.set(1280.0, 920.0);
    regions[1].set(700.0, 400.0);
    levels[0].recheck();
    snapshot("second resize, cascade stopped at an unchanged level")?;

    Ok(())
}
