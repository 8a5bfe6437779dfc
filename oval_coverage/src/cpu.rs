// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU twins of the generated fragment programs.
//!
//! These mirror the emitted per-pixel arithmetic exactly (in `f32`, like the
//! GPU), operating on the same uniform values `set_data` uploads. They serve
//! as a host-side reference for tests and as a fallback when no GPU path is
//! available.

use crate::EdgeType;

/// Map an approximate signed distance (negative inside, positive outside) to
/// coverage, as the ellipse fragment program does.
///
/// # Panics
///
/// Panics on [`EdgeType::HairlineAA`]: the factory never builds an oval
/// effect for it, so reaching this mapping with it is a framework bug.
pub fn coverage_from_distance(edge_type: EdgeType, approx_dist: f32) -> f32 {
    match edge_type {
        EdgeType::FillAA => (0.5 - approx_dist).clamp(0.0, 1.0),
        EdgeType::InverseFillAA => (0.5 + approx_dist).clamp(0.0, 1.0),
        EdgeType::FillBW => {
            if approx_dist > 0.0 {
                0.0
            } else {
                1.0
            }
        }
        EdgeType::InverseFillBW => {
            if approx_dist > 0.0 {
                1.0
            } else {
                0.0
            }
        }
        EdgeType::HairlineAA => panic!("hairline not expected here"),
    }
}

/// Evaluate the ellipse fragment program at `frag`.
///
/// `ellipse` is the `(cx, cy, 1/rx², 1/ry²)` uniform and `scale` the
/// optional `(s, 1/s)` rescale uniform, exactly as uploaded by
/// [`EllipseShader::set_data`](crate::EllipseShader::set_data).
pub fn ellipse_coverage(
    edge_type: EdgeType,
    ellipse: [f32; 4],
    scale: Option<[f32; 2]>,
    frag: [f32; 2],
) -> f32 {
    let mut dx = frag[0] - ellipse[0];
    let mut dy = frag[1] - ellipse[1];
    if let Some([_, inv_s]) = scale {
        dx *= inv_s;
        dy *= inv_s;
    }
    let zx = dx * ellipse[2];
    let zy = dy * ellipse[3];
    let implicit = (zx * dx + zy * dy) - 1.0;
    let grad_dot = (4.0 * (zx * zx + zy * zy)).max(1.0e-4);
    let mut approx_dist = implicit / grad_dot.sqrt();
    if let Some([s, _]) = scale {
        approx_dist *= s;
    }
    coverage_from_distance(edge_type, approx_dist)
}

/// Evaluate the circle fragment program at `frag`.
///
/// `circle` is the `(cx, cy, r, 1/r)` uniform (effective radius already
/// adjusted per edge mode) as uploaded by
/// [`CircleShader::set_data`](crate::CircleShader::set_data).
pub fn circle_coverage(edge_type: EdgeType, circle: [f32; 4], frag: [f32; 2]) -> f32 {
    let dx = (circle[0] - frag[0]) * circle[3];
    let dy = (circle[1] - frag[1]) * circle[3];
    let len = (dx * dx + dy * dy).sqrt();
    let d = if edge_type.is_inverse_fill() {
        (len - 1.0) * circle[2]
    } else {
        (1.0 - len) * circle[2]
    };
    match edge_type {
        EdgeType::FillAA | EdgeType::InverseFillAA => d.clamp(0.0, 1.0),
        EdgeType::FillBW | EdgeType::InverseFillBW => {
            if d > 0.5 {
                1.0
            } else {
                0.0
            }
        }
        EdgeType::HairlineAA => panic!("hairline not expected here"),
    }
}
