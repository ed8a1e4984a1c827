//! Path primitives and their SVG path-data form.

use std::fmt::Write as _;
use std::sync::OnceLock;

use glam::Vec2;
use regex::Regex;

/// Drawing primitive of a closed blob outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    Close,
}

/// One command group of SVG path data: the letter and its numeric parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SvgCommand {
    pub letter: char,
    pub params: Vec<f32>,
}

/// Print commands as compact SVG path data (`M10,20Q…Z`)
pub fn to_svg_path(commands: &[PathCommand]) -> String {
    let mut out = String::new();
    for command in commands {
        // Writing into a String cannot fail
        let _ = match command {
            PathCommand::MoveTo(p) => write!(out, "M{},{}", p.x, p.y),
            PathCommand::QuadTo { ctrl, to } => {
                write!(out, "Q{},{},{},{}", ctrl.x, ctrl.y, to.x, to.y)
            }
            PathCommand::Close => write!(out, "Z"),
        };
    }
    out
}

fn command_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Every letter except 'e', which belongs to exponents
    RE.get_or_init(|| Regex::new(r"(?i)[a-df-z][^a-df-z]*").expect("static regex"))
}

/// Split path data into single-letter command groups with their parameters.
///
/// Parameters are separated by whitespace and/or commas; tokens that are not
/// numbers are dropped.
pub fn parse_svg_path(data: &str) -> Vec<SvgCommand> {
    command_regex()
        .find_iter(data)
        .filter_map(|m| {
            let group = m.as_str();
            let letter = group.chars().next()?;
            let params = group[letter.len_utf8()..]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .filter_map(|token| token.parse::<f32>().ok())
                .collect();
            Some(SvgCommand { letter, params })
        })
        .collect()
}

/// Keep the commands the renderer replays: absolute M and Q, and Z.
///
/// Groups with too few parameters are skipped.
pub fn to_path_commands(svg: &[SvgCommand]) -> Vec<PathCommand> {
    svg.iter()
        .filter_map(|cmd| match (cmd.letter, cmd.params.as_slice()) {
            ('M', [x, y, ..]) => Some(PathCommand::MoveTo(Vec2::new(*x, *y))),
            ('Q', [cx, cy, x, y, ..]) => Some(PathCommand::QuadTo {
                ctrl: Vec2::new(*cx, *cy),
                to: Vec2::new(*x, *y),
            }),
            ('Z' | 'z', _) => Some(PathCommand::Close),
            _ => None,
        })
        .collect()
}
