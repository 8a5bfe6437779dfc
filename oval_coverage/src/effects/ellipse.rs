// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The general ellipse coverage effect.

use crate::shader::{EmitArgs, KeyBuilder, Precision, ProgramData, UniformHandle, UniformType};
use crate::{EdgeType, Error, Result};

/// An axis-aligned ellipse coverage test.
///
/// Immutable value describing one draw's ellipse: two effects compare equal
/// iff edge mode, center, and radii are all (exactly) equal. Construction is
/// normally done through [`OvalEffect::new`](crate::OvalEffect::new), which
/// picks the cheaper circle specialization when the radii are nearly equal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EllipseEffect {
    edge_type: EdgeType,
    center: [f32; 2],
    radii: [f32; 2],
}

impl EllipseEffect {
    /// Create an ellipse effect.
    ///
    /// Both radii must be non-negative and `edge_type` must not be the
    /// hairline mode; violations are caller bugs and are debug-asserted.
    /// A zero radius is accepted but degenerate: its reciprocal square
    /// divides by zero and NaN propagates into the coverage value.
    pub fn new(edge_type: EdgeType, center: [f32; 2], rx: f32, ry: f32) -> Self {
        debug_assert!(rx >= 0.0 && ry >= 0.0, "ellipse radii must be non-negative");
        debug_assert!(
            !edge_type.is_hairline(),
            "hairline edges cannot be drawn as an ellipse effect"
        );
        Self {
            edge_type,
            center,
            radii: [rx, ry],
        }
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    /// Center, in device pixel coordinates.
    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    /// Radii as `[rx, ry]`.
    pub fn radii(&self) -> [f32; 2] {
        self.radii
    }

    /// Contribute this effect's field to the program cache key.
    ///
    /// Only the edge mode shapes the generated source; center and radii are
    /// uniform values and deliberately absent.
    pub fn write_key(&self, b: &mut KeyBuilder) {
        b.add_u32(self.edge_type.as_key());
    }
}

/// Per-compiled-program state for [`EllipseEffect`].
///
/// One instance is owned by each compiled program variant. It records the
/// uniform handles declared during emission and the most recently uploaded
/// values, so redundant uniform uploads are skipped across consecutive draws
/// with the same program.
#[derive(Debug)]
pub struct EllipseShader {
    ellipse_uniform: Option<UniformHandle>,
    scale_uniform: Option<UniformHandle>,
    prev_center: [f32; 2],
    prev_radii: [f32; 2],
}

impl Default for EllipseShader {
    fn default() -> Self {
        Self {
            ellipse_uniform: None,
            scale_uniform: None,
            prev_center: [0.0, 0.0],
            // Sentinel: radii are never negative, so the first set_data
            // always uploads.
            prev_radii: [-1.0, -1.0],
        }
    }
}

impl EllipseShader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the `(cx, cy, 1/rx², 1/ry²)` uniform, once emitted.
    pub fn ellipse_uniform(&self) -> Option<UniformHandle> {
        self.ellipse_uniform
    }

    /// Handle of the `(s, 1/s)` rescale uniform. Present only when the
    /// program was emitted for a device whose fragment precision varies.
    pub fn scale_uniform(&self) -> Option<UniformHandle> {
        self.scale_uniform
    }

    /// Append the per-pixel coverage test to the fragment source.
    ///
    /// # Panics
    ///
    /// Panics if the effect carries the hairline edge mode, which the
    /// factory is required to have rejected.
    pub fn emit(&mut self, effect: &EllipseEffect, args: &mut EmitArgs<'_>) {
        // The ellipse uniform is (center.x, center.y, 1/rx^2, 1/ry^2). The
        // last two terms can underflow on mediump, so it is highp.
        let ellipse = args
            .uniforms
            .add_uniform(UniformType::Vec4, Precision::High, "ellipse");
        self.ellipse_uniform = Some(ellipse);
        let ellipse_name = args.uniforms.name(ellipse).to_owned();

        // On a device with a real mediump the distance computation runs in a
        // space normalized by the larger radius. The scale uniform is
        // (scale, 1/scale); the inverse squared radii are uploaded already
        // normalized, the center is not.
        let mut scale_name = None;
        if args.caps.float_precision_varies {
            let scale = args
                .uniforms
                .add_uniform(UniformType::Vec2, Precision::Medium, "scale");
            self.scale_uniform = Some(scale);
            scale_name = Some(args.uniforms.name(scale).to_owned());
        }

        let frag_coord = args.builder.frag_coord();
        let b = &mut *args.builder;

        // d is the offset to the ellipse center.
        b.stmt(format!("vec2 d = {frag_coord}.xy - {ellipse_name}.xy;"));
        if let Some(scale) = &scale_name {
            b.stmt(format!("d *= {scale}.y;"));
        }
        b.stmt(format!("vec2 Z = d * {ellipse_name}.zw;"));
        // implicit is the evaluation of (x/rx)^2 + (y/ry)^2 - 1.
        b.stmt("float implicit = dot(Z, d) - 1.0;");
        // grad_dot is the squared length of the gradient of the implicit.
        b.stmt("float grad_dot = 4.0 * dot(Z, Z);");
        // Avoid calling inversesqrt on zero.
        b.stmt("grad_dot = max(grad_dot, 1.0e-4);");
        b.stmt("float approx_dist = implicit * inversesqrt(grad_dot);");
        if let Some(scale) = &scale_name {
            b.stmt(format!("approx_dist *= {scale}.x;"));
        }

        match effect.edge_type() {
            EdgeType::FillAA => {
                b.stmt("float alpha = clamp(0.5 - approx_dist, 0.0, 1.0);");
            }
            EdgeType::InverseFillAA => {
                b.stmt("float alpha = clamp(0.5 + approx_dist, 0.0, 1.0);");
            }
            EdgeType::FillBW => {
                b.stmt("float alpha = approx_dist > 0.0 ? 0.0 : 1.0;");
            }
            EdgeType::InverseFillBW => {
                b.stmt("float alpha = approx_dist > 0.0 ? 1.0 : 0.0;");
            }
            EdgeType::HairlineAA => panic!("hairline not expected here"),
        }

        b.stmt(format!("{} = {} * alpha;", args.output_color, args.input_color));
        log::debug!(
            "emitted ellipse coverage fragment ({:?}, precision varies: {})",
            effect.edge_type(),
            args.caps.float_precision_varies
        );
    }

    /// Upload the effect's uniform values if they changed since the last
    /// draw with this program instance.
    pub fn set_data(&mut self, data: &mut ProgramData, effect: &EllipseEffect) -> Result<()> {
        let ellipse = self.ellipse_uniform.ok_or(Error::StatePushedBeforeEmit)?;
        if effect.radii() == self.prev_radii && effect.center() == self.prev_center {
            log::trace!("ellipse uniforms unchanged, skipping upload");
            return Ok(());
        }

        let [rx, ry] = effect.radii();
        let inv_rx_sq;
        let inv_ry_sq;
        // When a scale factor works around reduced precision, the larger
        // radius is the scale and the inverse squared radii are pre-adjusted
        // by it, keeping both values >= 1.
        if let Some(scale) = self.scale_uniform {
            if rx > ry {
                inv_rx_sq = 1.0;
                inv_ry_sq = (rx * rx) / (ry * ry);
                data.set_2f(scale, [rx, 1.0 / rx])?;
            } else {
                inv_rx_sq = (ry * ry) / (rx * rx);
                inv_ry_sq = 1.0;
                data.set_2f(scale, [ry, 1.0 / ry])?;
            }
        } else {
            inv_rx_sq = 1.0 / (rx * rx);
            inv_ry_sq = 1.0 / (ry * ry);
        }
        let [cx, cy] = effect.center();
        data.set_4f(ellipse, [cx, cy, inv_rx_sq, inv_ry_sq])?;
        self.prev_center = effect.center();
        self.prev_radii = effect.radii();
        Ok(())
    }
}
