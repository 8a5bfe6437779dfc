// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The circle specialization.
//!
//! A circle admits a cheaper test than the general ellipse: the distance to
//! the boundary is exact (`length(p - center) - r`), and doing the math in a
//! space normalized by the reciprocal radius keeps it well conditioned on
//! reduced-precision devices without a separate rescale uniform.

use crate::shader::{EmitArgs, KeyBuilder, Precision, ProgramData, UniformHandle, UniformType};
use crate::{EdgeType, Error, Result};

/// A circle coverage test.
///
/// Immutable value; equality is exact structural equality of edge mode,
/// center, and radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CircleEffect {
    edge_type: EdgeType,
    center: [f32; 2],
    radius: f32,
}

impl CircleEffect {
    /// Create a circle effect.
    ///
    /// The radius must be non-negative and `edge_type` must not be the
    /// hairline mode; violations are caller bugs and are debug-asserted.
    pub fn new(edge_type: EdgeType, center: [f32; 2], radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "circle radius must be non-negative");
        debug_assert!(
            !edge_type.is_hairline(),
            "hairline edges cannot be drawn as a circle effect"
        );
        Self {
            edge_type,
            center,
            radius,
        }
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    /// Center, in device pixel coordinates.
    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Contribute this effect's field to the program cache key. Only the
    /// edge mode shapes the generated source.
    pub fn write_key(&self, b: &mut KeyBuilder) {
        b.add_u32(self.edge_type.as_key());
    }

    /// The radius the shader actually tests against: regular fills widen by
    /// half a pixel and inverse fills narrow by half a pixel, so antialiased
    /// coverage is 0.5 on the true boundary.
    fn effective_radius(&self) -> f32 {
        if self.edge_type.is_inverse_fill() {
            self.radius - 0.5
        } else {
            self.radius + 0.5
        }
    }
}

/// Per-compiled-program state for [`CircleEffect`].
#[derive(Debug)]
pub struct CircleShader {
    circle_uniform: Option<UniformHandle>,
    prev_center: [f32; 2],
    prev_radius: f32,
}

impl Default for CircleShader {
    fn default() -> Self {
        Self {
            circle_uniform: None,
            prev_center: [0.0, 0.0],
            // Sentinel guaranteeing the first set_data uploads.
            prev_radius: -1.0,
        }
    }
}

impl CircleShader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the `(cx, cy, r, 1/r)` uniform, once emitted.
    pub fn circle_uniform(&self) -> Option<UniformHandle> {
        self.circle_uniform
    }

    /// Append the per-pixel coverage test to the fragment source.
    ///
    /// # Panics
    ///
    /// Panics if the effect carries the hairline edge mode, which the
    /// factory is required to have rejected.
    pub fn emit(&mut self, effect: &CircleEffect, args: &mut EmitArgs<'_>) {
        // The circle uniform is (center.x, center.y, r, 1/r), with the
        // effective radius pre-adjusted by half a pixel per edge mode. The
        // reciprocal can underflow on mediump, so it is highp.
        let circle = args
            .uniforms
            .add_uniform(UniformType::Vec4, Precision::High, "circle");
        self.circle_uniform = Some(circle);
        let circle_name = args.uniforms.name(circle).to_owned();

        let frag_coord = args.builder.frag_coord();
        let b = &mut *args.builder;

        // d measures how far inside the effective radius the pixel is, in
        // pixel units; negative is outside. Inverse fills flip the sign.
        if effect.edge_type().is_inverse_fill() {
            b.stmt(format!(
                "float d = (length(({circle_name}.xy - {frag_coord}.xy) * {circle_name}.w) - 1.0) * {circle_name}.z;"
            ));
        } else {
            b.stmt(format!(
                "float d = (1.0 - length(({circle_name}.xy - {frag_coord}.xy) * {circle_name}.w)) * {circle_name}.z;"
            ));
        }

        match effect.edge_type() {
            EdgeType::FillAA | EdgeType::InverseFillAA => {
                b.stmt("float alpha = clamp(d, 0.0, 1.0);");
            }
            EdgeType::FillBW | EdgeType::InverseFillBW => {
                b.stmt("float alpha = d > 0.5 ? 1.0 : 0.0;");
            }
            EdgeType::HairlineAA => panic!("hairline not expected here"),
        }

        b.stmt(format!("{} = {} * alpha;", args.output_color, args.input_color));
        log::debug!("emitted circle coverage fragment ({:?})", effect.edge_type());
    }

    /// Upload the effect's uniform values if they changed since the last
    /// draw with this program instance.
    pub fn set_data(&mut self, data: &mut ProgramData, effect: &CircleEffect) -> Result<()> {
        let circle = self.circle_uniform.ok_or(Error::StatePushedBeforeEmit)?;
        if effect.radius() == self.prev_radius && effect.center() == self.prev_center {
            log::trace!("circle uniforms unchanged, skipping upload");
            return Ok(());
        }

        let [cx, cy] = effect.center();
        let r = effect.effective_radius();
        data.set_4f(circle, [cx, cy, r, 1.0 / r])?;
        self.prev_center = effect.center();
        self.prev_radius = effect.radius();
        Ok(())
    }
}
