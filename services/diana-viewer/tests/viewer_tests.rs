//! Session tests: commands applied through the viewer against the synthetic
//! forecast, with figures captured in memory.

use diana_common::{DianaError, ViewState};
use diana_viewer::{
    parse, MemorySink, Outcome, Viewer, ViewerConfig, ViewerError, ViewerResources, ViewerResult,
};
use gridded_data::{DataError, RankPolicy};
use image::GenericImageView;
use projection::{ProjectionError, ProjectionKind};
use renderer::{FigureLayout, RenderError, RenderResources};

fn viewer() -> (Viewer, MemorySink) {
    let sink = MemorySink::new();
    let resources = ViewerResources {
        render: RenderResources {
            layout: FigureLayout::new(240, 180),
            ..RenderResources::default()
        },
        rank_policy: RankPolicy::Declared,
    };
    let viewer = Viewer::new(
        ViewState::default(),
        resources,
        "synthetic",
        Box::new(sink.clone()),
    );
    (viewer, sink)
}

fn run(viewer: &mut Viewer, line: &str) -> ViewerResult<Outcome> {
    let command = parse(line)?.expect("line should hold a command");
    viewer.execute(command)
}

// ============================================================================
// Projections
// ============================================================================

#[test]
fn test_every_projection_redraws() {
    let (mut viewer, sink) = viewer();
    for kind in ProjectionKind::ALL {
        let outcome = run(&mut viewer, &format!("project {}", kind.name()))
            .unwrap_or_else(|e| panic!("{} failed: {}", kind, e));
        assert_eq!(outcome, Outcome::Redrawn);
        assert_eq!(viewer.figure().unwrap().projection(), kind);
        assert_eq!(viewer.state().projection, kind.name());
    }
    assert_eq!(sink.count(), ProjectionKind::ALL.len());
}

#[test]
fn test_unknown_projection_leaves_display_untouched() {
    let (mut viewer, sink) = viewer();
    run(&mut viewer, "coast").unwrap();
    let before = viewer.figure().unwrap().clone();

    let result = run(&mut viewer, "project Globe");
    assert!(matches!(
        result,
        Err(ViewerError::Projection(ProjectionError::UnknownProjection(_)))
    ));
    assert_eq!(viewer.state().projection, "Robinson");
    assert_eq!(sink.count(), 1);
    assert!(viewer.figure().unwrap().same_pixels(&before));
    assert!(sink.last().unwrap().same_pixels(&before));
}

#[test]
fn test_projection_name_case_fallback() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "project mollweide").unwrap();
    assert_eq!(viewer.figure().unwrap().projection(), ProjectionKind::Mollweide);
}

// ============================================================================
// Overlays and extent
// ============================================================================

#[test]
fn test_double_toggle_restores_figure() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "coast").unwrap();
    let first = viewer.figure().unwrap().clone();

    run(&mut viewer, "grid").unwrap();
    assert_ne!(viewer.figure().unwrap().overlays(), first.overlays());
    run(&mut viewer, "grid").unwrap();

    let after = viewer.figure().unwrap();
    assert_eq!(after.overlays(), first.overlays());
    assert!(after.same_pixels(&first));
}

#[test]
fn test_overlays_are_independent() {
    let (mut viewer, _sink) = viewer();
    for line in ["background", "coast", "grid", "tissot"] {
        run(&mut viewer, line).unwrap();
    }
    run(&mut viewer, "coast").unwrap();
    let overlays = &viewer.state().overlays;
    assert!(overlays.background && overlays.gridlines && overlays.tissot);
    assert!(!overlays.coastlines);
}

#[test]
fn test_extent_read_back() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "extent -10 10 -5 5").unwrap();
    assert_eq!(viewer.state().extent.to_array(), [-10.0, 10.0, -5.0, 5.0]);
    assert_eq!(viewer.figure().unwrap().extent().to_array(), [-10.0, 10.0, -5.0, 5.0]);
}

#[test]
fn test_non_numeric_extent_entry_keeps_bound() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "extent -10 10 -5 5").unwrap();

    let outcome = run(&mut viewer, "min-lat abc").unwrap();
    assert_eq!(outcome, Outcome::Redrawn);
    assert_eq!(viewer.state().extent.min_lat, -5.0);

    run(&mut viewer, "extent -20 east -6 6").unwrap();
    assert_eq!(viewer.state().extent.to_array(), [-20.0, 10.0, -6.0, 6.0]);
}

#[test]
fn test_inverted_extent_rejected() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "extent -10 10 -5 5").unwrap();
    let result = run(&mut viewer, "min-lon 30");
    assert!(matches!(result, Err(ViewerError::View(DianaError::InvalidExtent(_)))));
    assert_eq!(viewer.state().extent.min_lon, -10.0);
}

#[test]
fn test_huge_longitudes_rejected() {
    let (mut viewer, sink) = viewer();
    run(&mut viewer, "extent -10 10 -5 5").unwrap();
    let shown = sink.count();

    let result = run(&mut viewer, "extent 1e17 2e17 -5 5");
    assert!(matches!(result, Err(ViewerError::View(DianaError::InvalidExtent(_)))));
    assert_eq!(viewer.state().extent.to_array(), [-10.0, 10.0, -5.0, 5.0]);
    assert_eq!(sink.count(), shown);
}

// ============================================================================
// Data layer
// ============================================================================

#[test]
fn test_variable_before_load_is_skipped() {
    let (mut viewer, _sink) = viewer();
    let outcome = run(&mut viewer, "plot air_temperature_2m").unwrap();
    assert_eq!(outcome, Outcome::Redrawn);
    assert_eq!(viewer.state().variable.as_deref(), Some("air_temperature_2m"));
    assert!(viewer.figure().unwrap().legend().is_none());
}

#[test]
fn test_load_draws_selected_variable() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "plot air_temperature_2m").unwrap();
    assert_eq!(run(&mut viewer, "load").unwrap(), Outcome::Redrawn);
    run(&mut viewer, "data-extent").unwrap();

    let figure = viewer.figure().unwrap();
    let legend = figure.legend().unwrap();
    assert_eq!(legend.variable, "air_temperature_2m");
    assert_eq!(legend.units.as_deref(), Some("K"));
    assert!(legend.levels.len() >= 2);
    assert!(viewer.state().extent.min_lat >= 54.0);
}

#[test]
fn test_second_load_is_ignored() {
    let (mut viewer, sink) = viewer();
    run(&mut viewer, "load").unwrap();
    let shown = sink.count();

    match run(&mut viewer, "load").unwrap() {
        Outcome::Message(text) => assert!(text.contains("already loaded")),
        other => panic!("expected a message, got {:?}", other),
    }
    assert_eq!(sink.count(), shown);
}

#[test]
fn test_data_extent_without_dataset() {
    let (mut viewer, sink) = viewer();
    assert_eq!(run(&mut viewer, "data-extent").unwrap(), Outcome::Unchanged);
    assert_eq!(viewer.state().extent, ViewState::default().extent);
    assert_eq!(sink.count(), 0);
}

#[test]
fn test_bad_level_count_ignored() {
    let (mut viewer, _sink) = viewer();
    assert_eq!(run(&mut viewer, "levels ten").unwrap(), Outcome::Unchanged);
    assert_eq!(run(&mut viewer, "levels 0").unwrap(), Outcome::Unchanged);
    assert_eq!(run(&mut viewer, "levels -3").unwrap(), Outcome::Unchanged);
    assert_eq!(viewer.state().levels, 10);

    assert_eq!(run(&mut viewer, "levels 4").unwrap(), Outcome::Redrawn);
    assert_eq!(viewer.state().levels, 4);
}

#[test]
fn test_huge_level_count_ignored() {
    let (mut viewer, sink) = viewer();
    run(&mut viewer, "load").unwrap();
    run(&mut viewer, "plot air_pressure_at_sea_level").unwrap();
    let shown = sink.count();

    assert_eq!(run(&mut viewer, "levels 200000000").unwrap(), Outcome::Unchanged);
    assert_eq!(run(&mut viewer, "levels 0 1 200000000").unwrap(), Outcome::Unchanged);
    assert_eq!(viewer.state().levels, 10);
    assert_eq!(sink.count(), shown);
}

#[test]
fn test_level_range_sets_even_bands() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();
    run(&mut viewer, "data-extent").unwrap();
    run(&mut viewer, "plot air_temperature_2m").unwrap();

    assert_eq!(run(&mut viewer, "levels 260 280 4").unwrap(), Outcome::Redrawn);
    assert_eq!(viewer.state().level_range, Some((260.0, 280.0)));
    let legend = viewer.figure().unwrap().legend().unwrap();
    assert_eq!(legend.levels, vec![260.0, 265.0, 270.0, 275.0, 280.0]);

    assert_eq!(run(&mut viewer, "levels 280 260 4").unwrap(), Outcome::Unchanged);
    assert_eq!(run(&mut viewer, "levels low 260 4").unwrap(), Outcome::Unchanged);
    assert_eq!(viewer.state().level_range, Some((260.0, 280.0)));

    run(&mut viewer, "levels 6").unwrap();
    assert_eq!(viewer.state().level_range, None);
}

#[test]
fn test_level_count_limits_legend() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();
    run(&mut viewer, "plot air_pressure_at_sea_level").unwrap();
    run(&mut viewer, "levels 3").unwrap();
    let legend = viewer.figure().unwrap().legend().unwrap();
    assert!(legend.levels.len() <= 4);
}

#[test]
fn test_unknown_colormap_rejected() {
    let (mut viewer, _sink) = viewer();
    let result = run(&mut viewer, "cmap sunrise");
    assert!(matches!(result, Err(ViewerError::Render(RenderError::UnknownColormap(_)))));
    assert_eq!(viewer.state().colormap, "coolwarm");

    run(&mut viewer, "cmap viridis_r").unwrap();
    assert_eq!(viewer.state().colormap, "viridis_r");
}

#[test]
fn test_unknown_variable_rejected_after_load() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();
    let result = run(&mut viewer, "plot T2");
    assert!(matches!(result, Err(ViewerError::Data(DataError::UnknownVariable(_)))));
    assert!(viewer.state().variable.is_none());
}

#[test]
fn test_out_of_range_timestep_rejected() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();
    run(&mut viewer, "plot air_temperature_pl").unwrap();
    run(&mut viewer, "height 5").unwrap();

    let result = run(&mut viewer, "time 99");
    assert!(matches!(result, Err(ViewerError::Data(DataError::IndexOutOfRange { .. }))));
    assert_eq!(viewer.state().timestep, 0);
    assert_eq!(viewer.state().heightstep, 5);
}

#[test]
fn test_mesh_style_changes_figure() {
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();
    run(&mut viewer, "data-extent").unwrap();
    run(&mut viewer, "plot wind_speed_10m").unwrap();
    let filled = viewer.figure().unwrap().clone();

    run(&mut viewer, "style mesh").unwrap();
    assert!(!viewer.figure().unwrap().same_pixels(&filled));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_export_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.png");
    let (mut viewer, _sink) = viewer();

    let result = run(&mut viewer, &format!("export {}", path.display()));
    assert!(matches!(result, Err(ViewerError::NoData { .. })));

    run(&mut viewer, "coast").unwrap();
    run(&mut viewer, &format!("export {}", path.display())).unwrap();
    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.dimensions(), (240, 180));
}

#[test]
fn test_describe_writes_variable_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("variables.txt");
    let (mut viewer, _sink) = viewer();

    let result = run(&mut viewer, &format!("describe {}", path.display()));
    assert!(matches!(result, Err(ViewerError::NoData { .. })));

    run(&mut viewer, "load").unwrap();
    run(&mut viewer, &format!("describe {}", path.display())).unwrap();
    let table = std::fs::read_to_string(&path).unwrap();
    assert!(table.contains("air_temperature_pl"));
    assert!(table.contains("(time, pressure, y, x)"));
}

#[test]
fn test_animation_writes_gif() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.gif");
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();
    run(&mut viewer, "data-extent").unwrap();
    run(&mut viewer, "plot air_temperature_pl").unwrap();

    match run(&mut viewer, &format!("animate height 0 5 {} 2", path.display())).unwrap() {
        Outcome::Message(text) => assert!(text.contains("3 frames")),
        other => panic!("expected a message, got {:?}", other),
    }
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(viewer.state().heightstep, 0);
}

#[test]
fn test_animation_range_past_usize_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.gif");
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();
    run(&mut viewer, "plot air_pressure_at_sea_level").unwrap();

    let line = format!("animate time 0 {} {}", usize::MAX, path.display());
    assert!(matches!(run(&mut viewer, &line), Err(ViewerError::Animation(_))));
    assert!(!path.exists());
}

#[test]
fn test_profile_writes_plot_without_redraw() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ice.png");
    let (mut viewer, sink) = viewer();
    let line = format!("profile QNICE 0 2 10 10 {}", path.display());

    assert!(matches!(run(&mut viewer, &line), Err(ViewerError::NoData { .. })));

    run(&mut viewer, "load").unwrap();
    let shown = sink.count();
    let state = viewer.state().clone();
    match run(&mut viewer, &line).unwrap() {
        Outcome::Message(text) => {
            assert!(text.contains("QNICE"));
            assert!(text.contains("kg-1"));
        }
        other => panic!("expected a message, got {:?}", other),
    }
    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.dimensions(), (240, 180));
    assert_eq!(sink.count(), shown);
    assert_eq!(viewer.state(), &state);
}

#[test]
fn test_profile_per_litre() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ice.png");
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();

    let line = format!("profile QNICE 0 2 10 10 {} per-litre", path.display());
    match run(&mut viewer, &line).unwrap() {
        Outcome::Message(text) => assert!(text.contains("L-1")),
        other => panic!("expected a message, got {:?}", other),
    }
    assert!(path.exists());
}

#[test]
fn test_profile_rejects_bad_window_and_variable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ice.png");
    let (mut viewer, _sink) = viewer();
    run(&mut viewer, "load").unwrap();

    let result = run(&mut viewer, &format!("profile QNICE 3 1 10 10 {}", path.display()));
    assert!(matches!(result, Err(ViewerError::Data(DataError::EmptyWindow { .. }))));
    let result = run(&mut viewer, &format!("profile QNICE 0 99 10 10 {}", path.display()));
    assert!(matches!(result, Err(ViewerError::Data(DataError::IndexOutOfRange { .. }))));
    let line = format!("profile air_pressure_at_sea_level 0 1 10 10 {}", path.display());
    assert!(matches!(
        run(&mut viewer, &line),
        Err(ViewerError::Data(DataError::UnsupportedRank { .. }))
    ));
    assert!(!path.exists());
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_status_and_listing() {
    let (mut viewer, _sink) = viewer();
    match run(&mut viewer, "status").unwrap() {
        Outcome::Message(text) => {
            assert!(text.contains("not loaded"));
            assert!(text.contains("\"projection\": \"Robinson\""));
        }
        other => panic!("expected a message, got {:?}", other),
    }
    match run(&mut viewer, "projections").unwrap() {
        Outcome::Message(text) => {
            assert_eq!(text.lines().count(), 33);
            assert!(text.lines().any(|line| line == "Robinson (global)"));
            assert!(text.lines().any(|line| line == "LambertConformal"));
        }
        other => panic!("expected a message, got {:?}", other),
    }
    assert!(matches!(run(&mut viewer, "variables"), Err(ViewerError::NoData { .. })));
    assert_eq!(run(&mut viewer, "quit").unwrap(), Outcome::Quit);
}

#[test]
fn test_session_from_config() {
    let config = ViewerConfig::from_yaml_str(
        r#"
data:
  source: synthetic
view:
  projection: LambertConformal
  overlays: [coastlines]
figure:
  width: 200
  height: 160
"#,
    )
    .unwrap();
    let sink = MemorySink::new();
    let mut viewer = Viewer::from_config(&config, Box::new(sink.clone())).unwrap();
    viewer.refresh().unwrap();

    let figure = sink.last().unwrap();
    assert_eq!(figure.projection(), ProjectionKind::LambertConformal);
    assert_eq!((figure.width(), figure.height()), (200, 160));
    assert!(run(&mut viewer, "load").is_ok());
}

#[test]
fn test_unavailable_source_keeps_session() {
    let sink = MemorySink::new();
    let mut viewer = Viewer::new(
        ViewState::default(),
        ViewerResources::default(),
        "/nonexistent/forecast.nc",
        Box::new(sink.clone()),
    );
    assert!(run(&mut viewer, "load").is_err());
    assert!(viewer.dataset().is_none());
    assert_eq!(run(&mut viewer, "coast").unwrap(), Outcome::Redrawn);
}
