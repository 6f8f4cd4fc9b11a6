use crate::arc::arc_to_cubics;
use crate::error::{Error, PathSyntaxReason, Result};
use crate::number::parse_number_list;
use crate::types::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadraticCurve {
	control: Point,
	end: Point,
    },
    CubicCurve {
	control_start: Point,
	control_end: Point,
	end: Point,
    },
    ClosePath,
}

///Arguments consumed by one invocation of a command letter.
fn arity(command: char) -> Option<usize> {
    Some(match command.to_ascii_uppercase() {
	'M' | 'L' | 'T' => 2,
	'H' | 'V' => 1,
	'Q' | 'S' => 4,
	'C' => 6,
	'A' => 7,
	'Z' => 0,
	_ => return None,
    })
}

fn is_command_letter(c: char) -> bool {
    c.is_ascii_alphabetic() && c != 'e' && c != 'E'
}

///Splits path data into (command letter, raw arguments) pairs.
fn split_commands(data: &str) -> Result<Vec<(char, &str)>> {
    let mut result = Vec::new();
    let mut current: Option<(char, usize)> = None;

    for (i, c) in data.char_indices() {
	if !is_command_letter(c) {
	    continue;
	}

	match current {
	    Some((command, start)) => result.push((command, &data[start..i])),
	    None => {
		let leading = data[..i].trim();
		if !leading.is_empty() {
		    return Err(Error::PathSyntax {
			command: String::new(),
			arguments: String::from(leading),
			reason: PathSyntaxReason::MissingCommand,
		    });
		}
	    }
	}
	current = Some((c, i + c.len_utf8()));
    }

    match current {
	Some((command, start)) => result.push((command, &data[start..])),
	None if !data.trim().is_empty() => {
	    return Err(Error::PathSyntax {
		command: String::new(),
		arguments: String::from(data.trim()),
		reason: PathSyntaxReason::MissingCommand,
	    })
	}
	None => (),
    }

    Ok(result)
}

///Interprets the `d` attribute of a path.
///
///Tracks the current point and the last control point across commands so
///relative coordinates and smooth shorthands can be resolved; arcs are
///expanded into cubic curves as they are read.
struct PathDataParser {
    commands: Vec<PathCommand>,
    current_point: Point,
    current_control: Point,
    subpath_start: Point,
}

impl PathDataParser {
    fn new() -> Self {
	PathDataParser {
	    commands: Vec::new(),
	    current_point: Point::ZERO,
	    current_control: Point::ZERO,
	    subpath_start: Point::ZERO,
	}
    }

    fn reflected_control(&self) -> Point {
	self.current_point.reflect(self.current_control)
    }

    fn advance(&mut self, end: Point, control: Point) {
	self.current_point = end;
	self.current_control = control;
    }

    fn parse(mut self, data: &str) -> Result<Vec<PathCommand>> {
	for (command, raw) in split_commands(data)? {
	    let syntax_error = |reason| Error::PathSyntax {
		command: command.to_string(),
		arguments: String::from(raw.trim()),
		reason,
	    };

	    let expected = arity(command).ok_or_else(|| syntax_error(PathSyntaxReason::UnknownCommand))?;
	    let arguments = parse_number_list(raw)?;

	    if expected == 0 {
		if !arguments.is_empty() {
		    return Err(syntax_error(PathSyntaxReason::WrongArgumentCount {
			expected,
			found: arguments.len(),
		    }));
		}
		self.close();
		continue;
	    }

	    if arguments.len() % expected != 0 {
		return Err(syntax_error(PathSyntaxReason::WrongArgumentCount {
		    expected,
		    found: arguments.len(),
		}));
	    }

	    for group in arguments.chunks(expected) {
		self.apply(command, group);
	    }
	}

	Ok(self.commands)
    }

    fn close(&mut self) {
	self.commands.push(PathCommand::ClosePath);
	let start = self.subpath_start;
	self.advance(start, start);
    }

    fn apply(&mut self, command: char, args: &[f64]) {
	let offset = if command.is_ascii_lowercase() {
	    self.current_point
	} else {
	    Point::ZERO
	};
	let point = |i: usize| Point::new(args[i], args[i + 1]) + offset;

	match command.to_ascii_uppercase() {
	    'M' => {
		let end = point(0);
		self.commands.push(PathCommand::MoveTo(end));
		self.subpath_start = end;
		self.advance(end, end);
	    }
	    'L' => {
		let end = point(0);
		self.commands.push(PathCommand::LineTo(end));
		self.advance(end, end);
	    }
	    'H' => {
		let end = Point::new(args[0] + offset.x, self.current_point.y);
		self.commands.push(PathCommand::LineTo(end));
		self.advance(end, end);
	    }
	    'V' => {
		let end = Point::new(self.current_point.x, args[0] + offset.y);
		self.commands.push(PathCommand::LineTo(end));
		self.advance(end, end);
	    }
	    'Q' => {
		let control = point(0);
		let end = point(2);
		self.commands.push(PathCommand::QuadraticCurve { control, end });
		self.advance(end, control);
	    }
	    'T' => {
		let control = self.reflected_control();
		let end = point(0);
		self.commands.push(PathCommand::QuadraticCurve { control, end });
		self.advance(end, control);
	    }
	    'C' => {
		let control_end = point(2);
		let end = point(4);
		self.commands.push(PathCommand::CubicCurve {
		    control_start: point(0),
		    control_end,
		    end,
		});
		self.advance(end, control_end);
	    }
	    'S' => {
		let control_start = self.reflected_control();
		let control_end = point(0);
		let end = point(2);
		self.commands.push(PathCommand::CubicCurve {
		    control_start,
		    control_end,
		    end,
		});
		self.advance(end, control_end);
	    }
	    'A' => {
		let end = point(5);
		let curves = arc_to_cubics(
		    self.current_point,
		    end,
		    Size::new(args[0], args[1]),
		    args[2],
		    args[3] != 0.0,
		    args[4] != 0.0,
		);
		self.commands.extend(curves);
		self.advance(end, end);
	    }
	    'Z' => self.close(),
	    _ => unreachable!("command letters are checked against their arity first"),
	}
    }
}

///Parses SVG path data into drawing commands, with every arc expanded into
///cubic curves.
pub fn parse_path_data(data: &str) -> Result<Vec<PathCommand>> {
    PathDataParser::new().parse(data)
}
