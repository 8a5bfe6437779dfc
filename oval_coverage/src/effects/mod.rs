// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage effects and the oval factory.

mod circle;
mod ellipse;

pub use circle::{CircleEffect, CircleShader};
pub use ellipse::{EllipseEffect, EllipseShader};

use crate::kurbo::Rect;
use crate::shader::{EmitArgs, KeyBuilder, ProgramData};
use crate::{EdgeType, Result};

/// Tolerance under which an oval's width and height count as equal, making
/// it a circle.
const NEARLY_EQUAL_TOLERANCE: f64 = 1.0 / 4096.0;

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= NEARLY_EQUAL_TOLERANCE
}

/// A coverage effect for an axis-aligned oval: either the circle
/// specialization or the general ellipse.
///
/// The variants are the safe narrowing point between the pipeline's generic
/// view of an effect and the concrete state each shader needs: a program's
/// [`OvalShader`] only accepts the effect variant it was instantiated from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OvalEffect {
    Circle(CircleEffect),
    Ellipse(EllipseEffect),
}

impl OvalEffect {
    /// Build the coverage effect for `oval`.
    ///
    /// Returns `None` for the hairline edge mode, which neither effect can
    /// represent; callers must fall back to another rendering strategy.
    /// Nearly-square ovals dispatch to the cheaper circle specialization.
    pub fn new(edge_type: EdgeType, oval: Rect) -> Option<Self> {
        if edge_type.is_hairline() {
            return None;
        }
        let w = oval.width();
        let h = oval.height();
        if nearly_equal(w, h) {
            let radius = (w / 2.0) as f32;
            let center = [(oval.x0 + w / 2.0) as f32, (oval.y0 + w / 2.0) as f32];
            Some(Self::Circle(CircleEffect::new(edge_type, center, radius)))
        } else {
            let center = [(oval.x0 + w / 2.0) as f32, (oval.y0 + h / 2.0) as f32];
            Some(Self::Ellipse(EllipseEffect::new(
                edge_type,
                center,
                (w / 2.0) as f32,
                (h / 2.0) as f32,
            )))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle(_) => "Circle",
            Self::Ellipse(_) => "Ellipse",
        }
    }

    pub fn edge_type(&self) -> EdgeType {
        match self {
            Self::Circle(c) => c.edge_type(),
            Self::Ellipse(e) => e.edge_type(),
        }
    }

    /// Contribute this effect's field to the program cache key.
    pub fn write_key(&self, b: &mut KeyBuilder) {
        match self {
            Self::Circle(c) => c.write_key(b),
            Self::Ellipse(e) => e.write_key(b),
        }
    }

    /// Create the per-program state for a newly compiled program variant.
    pub fn instantiate(&self) -> OvalShader {
        match self {
            Self::Circle(_) => OvalShader::Circle(CircleShader::new()),
            Self::Ellipse(_) => OvalShader::Ellipse(EllipseShader::new()),
        }
    }
}

/// Per-compiled-program state for an [`OvalEffect`].
///
/// Owned by exactly one program instance; access is serialized by `&mut`.
/// Both operations require the same effect variant the shader was
/// instantiated from — receiving the other variant means the pipeline paired
/// a program with the wrong effect, which is a fatal framework bug.
#[derive(Debug)]
pub enum OvalShader {
    Circle(CircleShader),
    Ellipse(EllipseShader),
}

impl OvalShader {
    /// Append the effect's fragment source.
    pub fn emit(&mut self, effect: &OvalEffect, args: &mut EmitArgs<'_>) {
        match (self, effect) {
            (Self::Circle(shader), OvalEffect::Circle(effect)) => shader.emit(effect, args),
            (Self::Ellipse(shader), OvalEffect::Ellipse(effect)) => shader.emit(effect, args),
            _ => panic!("oval shader paired with a different effect variant"),
        }
    }

    /// Push the effect's uniform values, deduplicated against the previous
    /// draw with this program instance.
    pub fn set_data(&mut self, data: &mut ProgramData, effect: &OvalEffect) -> Result<()> {
        match (self, effect) {
            (Self::Circle(shader), OvalEffect::Circle(effect)) => shader.set_data(data, effect),
            (Self::Ellipse(shader), OvalEffect::Ellipse(effect)) => shader.set_data(data, effect),
            _ => panic!("oval shader paired with a different effect variant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu;
    use crate::shader::{FragmentBuilder, ShaderCaps, UniformHandler};

    #[test]
    fn square_oval_dispatches_to_circle() {
        let effect = OvalEffect::new(EdgeType::FillAA, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        let OvalEffect::Circle(circle) = effect else {
            panic!("expected the circle specialization");
        };
        assert_eq!(circle.center(), [50.0, 50.0]);
        assert_eq!(circle.radius(), 50.0);
        assert_eq!(effect.name(), "Circle");
    }

    #[test]
    fn nearly_square_oval_still_dispatches_to_circle() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0 + 1.0e-4);
        let effect = OvalEffect::new(EdgeType::FillAA, rect).unwrap();
        assert!(matches!(effect, OvalEffect::Circle(_)));
    }

    #[test]
    fn oblong_oval_dispatches_to_ellipse() {
        let effect = OvalEffect::new(EdgeType::FillAA, Rect::new(0.0, 0.0, 100.0, 50.0)).unwrap();
        let OvalEffect::Ellipse(ellipse) = effect else {
            panic!("expected the general ellipse");
        };
        assert_eq!(ellipse.center(), [50.0, 25.0]);
        assert_eq!(ellipse.radii(), [50.0, 25.0]);
        assert_eq!(effect.name(), "Ellipse");
    }

    #[test]
    fn hairline_produces_no_effect() {
        for rect in [
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(0.0, 0.0, 64.0, 64.0),
        ] {
            assert!(OvalEffect::new(EdgeType::HairlineAA, rect).is_none());
        }
    }

    #[test]
    fn circle_and_ellipse_share_the_key_field() {
        let circle = OvalEffect::new(EdgeType::FillBW, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let ellipse = OvalEffect::new(EdgeType::FillBW, Rect::new(0.0, 0.0, 20.0, 10.0)).unwrap();
        let mut kc = KeyBuilder::new();
        circle.write_key(&mut kc);
        let mut ke = KeyBuilder::new();
        ellipse.write_key(&mut ke);
        assert_eq!(kc.as_slice(), ke.as_slice());
    }

    /// Run the full path — factory, emission, state push, CPU evaluation —
    /// and return the coverage at `frag`.
    fn pipeline_coverage(
        edge_type: EdgeType,
        rect: Rect,
        precision_varies: bool,
        frag: [f32; 2],
    ) -> f32 {
        let effect = OvalEffect::new(edge_type, rect).unwrap();
        let mut shader = effect.instantiate();

        let mut builder = FragmentBuilder::new();
        let mut uniforms = UniformHandler::new();
        let caps = ShaderCaps {
            float_precision_varies: precision_varies,
        };
        shader.emit(
            &effect,
            &mut EmitArgs {
                builder: &mut builder,
                uniforms: &mut uniforms,
                caps: &caps,
                input_color: "inColor",
                output_color: "outColor",
            },
        );
        let mut data = ProgramData::new(&uniforms);
        shader.set_data(&mut data, &effect).unwrap();

        match &shader {
            OvalShader::Ellipse(e) => cpu::ellipse_coverage(
                edge_type,
                data.get_4f(e.ellipse_uniform().unwrap()).unwrap(),
                e.scale_uniform().map(|h| data.get_2f(h).unwrap()),
                frag,
            ),
            OvalShader::Circle(c) => cpu::circle_coverage(
                edge_type,
                data.get_4f(c.circle_uniform().unwrap()).unwrap(),
                frag,
            ),
        }
    }

    #[test]
    fn ellipse_center_is_fully_covered() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        for precision_varies in [false, true] {
            let alpha = pipeline_coverage(EdgeType::FillAA, rect, precision_varies, [50.0, 25.0]);
            assert_eq!(alpha, 1.0);
        }
    }

    #[test]
    fn far_outside_the_ellipse_is_uncovered() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        for precision_varies in [false, true] {
            let alpha =
                pipeline_coverage(EdgeType::FillAA, rect, precision_varies, [1000.0, 1000.0]);
            assert_eq!(alpha, 0.0);
        }
    }

    #[test]
    fn inverse_fill_covers_the_outside() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let inside = pipeline_coverage(EdgeType::InverseFillAA, rect, false, [50.0, 25.0]);
        assert_eq!(inside, 0.0);
        let outside = pipeline_coverage(EdgeType::InverseFillAA, rect, false, [1000.0, 1000.0]);
        assert_eq!(outside, 1.0);
    }

    #[test]
    fn circle_center_is_fully_covered() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let alpha = pipeline_coverage(EdgeType::FillAA, rect, false, [50.0, 50.0]);
        assert_eq!(alpha, 1.0);
        let alpha = pipeline_coverage(EdgeType::FillAA, rect, false, [500.0, 500.0]);
        assert_eq!(alpha, 0.0);
    }

    #[test]
    fn precision_workaround_matches_full_precision() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        // Sample along a ray crossing the boundary; the rescaled and direct
        // formulations must agree closely everywhere, including the AA ramp.
        for i in 0..200 {
            let x = 0.5 * i as f32;
            let frag = [x, 25.0];
            let direct = pipeline_coverage(EdgeType::FillAA, rect, false, frag);
            let rescaled = pipeline_coverage(EdgeType::FillAA, rect, true, frag);
            assert!(
                (direct - rescaled).abs() < 1.0e-3,
                "coverage diverged at x={x}: {direct} vs {rescaled}"
            );
        }
    }

    #[test]
    #[should_panic(expected = "different effect variant")]
    fn mismatched_variant_is_fatal() {
        let circle = OvalEffect::new(EdgeType::FillAA, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let ellipse = OvalEffect::new(EdgeType::FillAA, Rect::new(0.0, 0.0, 20.0, 10.0)).unwrap();
        let mut shader = circle.instantiate();
        let uniforms = UniformHandler::new();
        let mut data = ProgramData::new(&uniforms);
        let _ = shader.set_data(&mut data, &ellipse);
    }
}
