//! Console command parsing.
//!
//! Each console line maps to one control of the viewer window: overlay
//! toggles, the projection picker, the extent entry fields, and the data
//! panel.

use std::path::PathBuf;

use diana_common::{ExtentEntry, ExtentField, Overlay, PlotStyle};

use crate::error::{ViewerError, ViewerResult};

/// Which leading axis an animation sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationAxis {
    Time,
    Height,
}

impl AnimationAxis {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationAxis::Time => "time",
            AnimationAxis::Height => "height",
        }
    }
}

/// Frames to render for `animate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequest {
    pub axis: AnimationAxis,
    pub from: usize,
    pub to: usize,
    pub step: usize,
    pub path: PathBuf,
}

impl AnimationRequest {
    /// Indices visited, `from..=to` by `step`. Empty when `from > to`.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        (self.from..=self.to).step_by(self.step.max(1))
    }

    /// The last index visited, `None` when the range is empty.
    pub fn last_index(&self) -> Option<usize> {
        if self.from > self.to {
            return None;
        }
        let step = self.step.max(1);
        Some(self.from + (self.to - self.from) / step * step)
    }
}

/// A vertical profile plot for `profile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRequest {
    pub variable: String,
    /// Inclusive timestep window averaged over
    pub from: usize,
    pub to: usize,
    pub row: usize,
    pub col: usize,
    pub path: PathBuf,
    /// Convert a per-kilogram quantity to per litre of air
    pub per_litre: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle(Overlay),
    Project(String),
    Load,
    Plot(String),
    DataExtent,
    /// Raw text of the entry fields, parsed when committed
    Extent(ExtentEntry),
    /// Raw `<n>` or `<min> <max> <n>` text, parsed when committed
    Levels(Vec<String>),
    Colormap(String),
    Style(PlotStyle),
    Time(usize),
    Height(usize),
    Variables,
    Describe(PathBuf),
    Export(PathBuf),
    Animate(AnimationRequest),
    Profile(ProfileRequest),
    Status,
    Projections,
    Help,
    Quit,
}

impl Command {
    /// Whether the command changes the view and so triggers a redraw.
    pub fn redraws(&self) -> bool {
        matches!(
            self,
            Command::Toggle(_)
                | Command::Project(_)
                | Command::Plot(_)
                | Command::DataExtent
                | Command::Extent(_)
                | Command::Levels(_)
                | Command::Colormap(_)
                | Command::Style(_)
                | Command::Time(_)
                | Command::Height(_)
        )
    }
}

pub const HELP: &str = "\
Overlays:   coast | background | grid | tissot
View:       project <name> | projections
            extent <min-lon> <max-lon> <min-lat> <max-lat>
            min-lon <v> | max-lon <v> | min-lat <v> | max-lat <v>
Data:       load | variables | plot <variable> | data-extent
            levels <n> | levels <min> <max> <n>
            cmap <name> | style filled|mesh
            time <n> | height <n>
Output:     export <file.png> | describe <file>
            animate time|height <from> <to> <file.gif> [step]
            profile <variable> <from> <to> <row> <col> <file.png> [per-litre]
Session:    status | help | quit";

/// Parse one console line.
///
/// Blank lines and lines starting with `#` yield `None`.
pub fn parse(line: &str) -> ViewerResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let keyword = head.to_lowercase();

    let command = match keyword.as_str() {
        "coast" | "coastlines" | "background" | "stock" | "grid" | "gridlines" | "tissot" => {
            no_args(&keyword, &args)?;
            Command::Toggle(keyword.parse()?)
        }
        "project" | "projection" => Command::Project(one_arg(&keyword, &args)?.to_string()),
        "load" => {
            no_args(&keyword, &args)?;
            Command::Load
        }
        "plot" => Command::Plot(one_arg(&keyword, &args)?.to_string()),
        "data-extent" | "use-data-extent" => {
            no_args(&keyword, &args)?;
            Command::DataExtent
        }
        "extent" => {
            let &[min_lon, max_lon, min_lat, max_lat] = args.as_slice() else {
                return Err(ViewerError::command(
                    "usage: extent <min-lon> <max-lon> <min-lat> <max-lat>",
                ));
            };
            Command::Extent(ExtentEntry::all([min_lon, max_lon, min_lat, max_lat]))
        }
        "levels" => match args.len() {
            1 | 3 => Command::Levels(args.iter().map(|a| a.to_string()).collect()),
            _ => return Err(ViewerError::command("usage: levels <n> | levels <min> <max> <n>")),
        },
        "cmap" | "colormap" => Command::Colormap(one_arg(&keyword, &args)?.to_string()),
        "style" => Command::Style(one_arg(&keyword, &args)?.parse()?),
        "time" => Command::Time(index_arg(&keyword, one_arg(&keyword, &args)?)?),
        "height" => Command::Height(index_arg(&keyword, one_arg(&keyword, &args)?)?),
        "variables" | "vars" => Command::Variables,
        "describe" => Command::Describe(PathBuf::from(one_arg(&keyword, &args)?)),
        "export" | "save" => Command::Export(PathBuf::from(one_arg(&keyword, &args)?)),
        "animate" => Command::Animate(parse_animation(&args)?),
        "profile" => Command::Profile(parse_profile(&args)?),
        "status" => Command::Status,
        "projections" => Command::Projections,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => match ExtentField::from_label(other) {
            Some(field) => Command::Extent(ExtentEntry::single(field, one_arg(&keyword, &args)?)),
            None => {
                return Err(ViewerError::command(format!(
                    "unknown command '{}', type 'help' for a list",
                    head
                )))
            }
        },
    };
    Ok(Some(command))
}

fn no_args(keyword: &str, args: &[&str]) -> ViewerResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ViewerError::command(format!("'{}' takes no arguments", keyword)))
    }
}

fn one_arg<'a>(keyword: &str, args: &[&'a str]) -> ViewerResult<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(ViewerError::command(format!(
            "'{}' takes exactly one argument",
            keyword
        ))),
    }
}

fn index_arg(keyword: &str, text: &str) -> ViewerResult<usize> {
    text.parse().map_err(|_| {
        ViewerError::command(format!(
            "'{}' needs a non-negative integer, got '{}'",
            keyword, text
        ))
    })
}

fn parse_animation(args: &[&str]) -> ViewerResult<AnimationRequest> {
    let usage = || ViewerError::command("usage: animate time|height <from> <to> <file.gif> [step]");
    let (axis, from, to, path, step) = match args {
        [axis, from, to, path] => (axis, from, to, path, None),
        [axis, from, to, path, step] => (axis, from, to, path, Some(step)),
        _ => return Err(usage()),
    };
    let axis = match axis.to_lowercase().as_str() {
        "time" => AnimationAxis::Time,
        "height" => AnimationAxis::Height,
        _ => return Err(usage()),
    };
    let step = match step {
        Some(text) => index_arg("step", text)?,
        None => 1,
    };
    if step == 0 {
        return Err(ViewerError::command("animation step must be at least 1"));
    }
    Ok(AnimationRequest {
        axis,
        from: index_arg("from", from)?,
        to: index_arg("to", to)?,
        step,
        path: PathBuf::from(*path),
    })
}

fn parse_profile(args: &[&str]) -> ViewerResult<ProfileRequest> {
    let (fields, per_litre) = match args {
        [fields @ .., flag] if flag.eq_ignore_ascii_case("per-litre") => (fields, true),
        fields => (fields, false),
    };
    let &[variable, from, to, row, col, path] = fields else {
        return Err(ViewerError::command(
            "usage: profile <variable> <from> <to> <row> <col> <file.png> [per-litre]",
        ));
    };
    Ok(ProfileRequest {
        variable: variable.to_string(),
        from: index_arg("from", from)?,
        to: index_arg("to", to)?,
        row: index_arg("row", row)?,
        col: index_arg("col", col)?,
        path: PathBuf::from(path),
        per_litre,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(parse("").unwrap().is_none());
        assert!(parse("   ").unwrap().is_none());
        assert!(parse("# set up the view").unwrap().is_none());
    }

    #[test]
    fn test_overlay_toggles() {
        assert_eq!(parsed("coast"), Command::Toggle(Overlay::Coastlines));
        assert_eq!(parsed("background"), Command::Toggle(Overlay::Background));
        assert_eq!(parsed("GRID"), Command::Toggle(Overlay::Gridlines));
        assert_eq!(parsed("tissot"), Command::Toggle(Overlay::Tissot));
        assert!(parse("coast on").is_err());
    }

    #[test]
    fn test_extent_keeps_raw_text() {
        assert_eq!(
            parsed("extent -10 10 abc 5"),
            Command::Extent(ExtentEntry::all(["-10", "10", "abc", "5"]))
        );
        assert_eq!(
            parsed("max-lat 61.5"),
            Command::Extent(ExtentEntry::single(ExtentField::MaxLat, "61.5"))
        );
        assert!(parse("extent 1 2 3").is_err());
    }

    #[test]
    fn test_projection_name_keeps_case() {
        assert_eq!(parsed("project LambertConformal"), Command::Project("LambertConformal".into()));
        assert!(parse("project").is_err());
    }

    #[test]
    fn test_levels_are_parsed_on_commit() {
        assert_eq!(parsed("levels ten"), Command::Levels(vec!["ten".into()]));
        assert_eq!(
            parsed("levels 260 280 20"),
            Command::Levels(vec!["260".into(), "280".into(), "20".into()])
        );
        assert!(parse("levels").is_err());
        assert!(parse("levels 1 2").is_err());
    }

    #[test]
    fn test_style_and_indices() {
        assert_eq!(parsed("style mesh"), Command::Style(PlotStyle::Mesh));
        assert!(parse("style wireframe").is_err());
        assert_eq!(parsed("time 3"), Command::Time(3));
        assert!(parse("height -1").is_err());
    }

    #[test]
    fn test_animate() {
        let Command::Animate(request) = parsed("animate time 0 6 out.gif 2") else {
            panic!("expected an animation");
        };
        assert_eq!(request.axis, AnimationAxis::Time);
        assert_eq!(request.indices().collect::<Vec<_>>(), vec![0, 2, 4, 6]);
        assert_eq!(request.last_index(), Some(6));
        assert_eq!(request.path, PathBuf::from("out.gif"));

        let Command::Animate(request) = parsed("animate height 1 6 out.gif 4") else {
            panic!("expected an animation");
        };
        assert_eq!(request.last_index(), Some(5));

        let Command::Animate(request) = parsed("animate time 3 1 out.gif") else {
            panic!("expected an animation");
        };
        assert_eq!(request.last_index(), None);
        assert_eq!(request.indices().count(), 0);

        assert!(parse("animate depth 0 3 out.gif").is_err());
        assert!(parse("animate height 0 3 out.gif 0").is_err());
    }

    #[test]
    fn test_profile() {
        assert_eq!(
            parsed("profile QNICE 0 12 100 140 ice.png"),
            Command::Profile(ProfileRequest {
                variable: "QNICE".into(),
                from: 0,
                to: 12,
                row: 100,
                col: 140,
                path: PathBuf::from("ice.png"),
                per_litre: false,
            })
        );
        let Command::Profile(request) = parsed("profile QNICE 0 1 2 3 ice.png per-litre") else {
            panic!("expected a profile");
        };
        assert!(request.per_litre);

        assert!(parse("profile QNICE 0 1 2 ice.png").is_err());
        assert!(parse("profile QNICE 0 1 2 -3 ice.png").is_err());
        assert!(parse("profile per-litre").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("zoom 2").unwrap_err();
        assert!(err.to_string().contains("zoom"));
    }

    #[test]
    fn test_redraw_commands() {
        assert!(parsed("coast").redraws());
        assert!(parsed("min-lon 4").redraws());
        assert!(!parsed("status").redraws());
        assert!(!parsed("load").redraws());
    }
}
