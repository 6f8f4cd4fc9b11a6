//! Elliptical arc to cubic Bezier conversion.
//!
//! Follows the endpoint-to-center parameterization from the SVG
//! implementation notes, then approximates the arc with one cubic per
//! quarter turn (or less).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::path::PathCommand;
use crate::types::{Point, Size};

const TAU: f64 = 2.0 * PI;

///Control point distance for a quarter unit circle.
pub const KAPPA: f64 = 0.551915024494;

#[derive(Debug, Clone, Copy)]
struct Frame {
    center: Point,
    radius: Size,
    sin_phi: f64,
    cos_phi: f64,
}

impl Frame {
    ///Maps a point on the unit circle onto the rotated, translated ellipse.
    fn map(&self, unit: Point) -> Point {
	let x = unit.x * self.radius.width;
	let y = unit.y * self.radius.height;

	Point::new(
	    self.cos_phi * x - self.sin_phi * y + self.center.x,
	    self.sin_phi * x + self.cos_phi * y + self.center.y,
	)
    }
}

fn vector_angle(u: Point, v: Point) -> f64 {
    let sign = if u.x * v.y - u.y * v.x < 0.0 { -1.0 } else { 1.0 };
    let magnitude = (u.x * u.x + u.y * u.y).sqrt() * (v.x * v.x + v.y * v.y).sqrt();
    let dot = u.x * v.x + u.y * v.y;

    sign * (dot / magnitude).max(-1.0).min(1.0).acos()
}

///Cubic approximation of the unit circle arc from `start` spanning `delta`
///radians, as (control start, control end, end).
fn unit_arc(start: f64, delta: f64) -> (Point, Point, Point) {
    let (y1, x1) = start.sin_cos();
    let (y2, x2) = (start + delta).sin_cos();

    (
	Point::new(x1 - y1 * KAPPA, y1 + x1 * KAPPA),
	Point::new(x2 + y2 * KAPPA, y2 - x2 * KAPPA),
	Point::new(x2, y2),
    )
}

///Converts an SVG arc from `start` to `end` into cubic curves.
///
///Returns nothing for degenerate arcs: a zero radius or coincident end
///points.
pub fn arc_to_cubics(
    start: Point,
    end: Point,
    radius: Size,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
) -> Vec<PathCommand> {
    if radius.width == 0.0 || radius.height == 0.0 {
	return Vec::new();
    }

    let (sin_phi, cos_phi) = (x_axis_rotation * TAU / 360.0).sin_cos();

    let half_dx = (start.x - end.x) / 2.0;
    let half_dy = (start.y - end.y) / 2.0;
    let pxp = cos_phi * half_dx + sin_phi * half_dy;
    let pyp = -sin_phi * half_dx + cos_phi * half_dy;

    if pxp == 0.0 && pyp == 0.0 {
	return Vec::new();
    }

    let mut rx = radius.width.abs();
    let mut ry = radius.height.abs();

    let lambda = pxp.powi(2) / rx.powi(2) + pyp.powi(2) / ry.powi(2);
    if lambda > 1.0 {
	rx *= lambda.sqrt();
	ry *= lambda.sqrt();
    }

    let rxsq = rx.powi(2);
    let rysq = ry.powi(2);
    let pxpsq = pxp.powi(2);
    let pypsq = pyp.powi(2);

    let radicand = ((rxsq * rysq) - (rxsq * pypsq) - (rysq * pxpsq)).max(0.0)
	/ ((rxsq * pypsq) + (rysq * pxpsq));
    let root = radicand.sqrt() * if large_arc == sweep { -1.0 } else { 1.0 };

    let center_xp = root * rx / ry * pyp;
    let center_yp = root * -ry / rx * pxp;

    let center = Point::new(
	cos_phi * center_xp - sin_phi * center_yp + (start.x + end.x) / 2.0,
	sin_phi * center_xp + cos_phi * center_yp + (start.y + end.y) / 2.0,
    );

    let v1 = Point::new((pxp - center_xp) / rx, (pyp - center_yp) / ry);
    let v2 = Point::new((-pxp - center_xp) / rx, (-pyp - center_yp) / ry);

    let mut angle = vector_angle(Point::new(1.0, 0.0), v1);
    let mut delta = vector_angle(v1, v2);

    if !sweep && delta > 0.0 {
	delta -= TAU;
    }
    if sweep && delta < 0.0 {
	delta += TAU;
    }

    let segments = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    delta /= segments as f64;

    let frame = Frame {
	center,
	radius: Size::new(rx, ry),
	sin_phi,
	cos_phi,
    };

    (0..segments)
	.map(|_| {
	    let (control_start, control_end, end) = unit_arc(angle, delta);
	    angle += delta;

	    PathCommand::CubicCurve {
		control_start: frame.map(control_start),
		control_end: frame.map(control_end),
		end: frame.map(end),
	    }
	})
	.collect()
}
