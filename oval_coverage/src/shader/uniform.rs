// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform declaration and per-program value storage.

use core::fmt::Write as _;

use smallvec::SmallVec;

use crate::{Error, Result};

/// Shape of a uniform value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UniformType {
    /// Two `f32` components.
    Vec2,
    /// Four `f32` components.
    Vec4,
}

impl UniformType {
    fn glsl_type(self) -> &'static str {
        match self {
            Self::Vec2 => "vec2",
            Self::Vec4 => "vec4",
        }
    }
}

/// Floating-point precision a uniform is declared at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Precision {
    /// The device's default fragment precision ("mediump").
    Medium,
    /// Full precision ("highp"). Required for values that can underflow at
    /// reduced precision.
    High,
}

impl Precision {
    fn glsl_qualifier(self) -> &'static str {
        match self {
            Self::Medium => "mediump",
            Self::High => "highp",
        }
    }
}

/// Handle to a declared uniform, used to push values after compilation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformHandle(usize);

#[derive(Debug)]
struct UniformDecl {
    name: String,
    ty: UniformType,
    precision: Precision,
}

/// Collects the uniform declarations of one program variant.
#[derive(Debug, Default)]
pub struct UniformHandler {
    uniforms: SmallVec<[UniformDecl; 4]>,
}

impl UniformHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a uniform and return the handle used to set its value.
    pub fn add_uniform(
        &mut self,
        ty: UniformType,
        precision: Precision,
        name: &str,
    ) -> UniformHandle {
        debug_assert!(
            self.uniforms.iter().all(|u| u.name != name),
            "uniform `{name}` declared twice"
        );
        self.uniforms.push(UniformDecl {
            name: name.to_owned(),
            ty,
            precision,
        });
        UniformHandle(self.uniforms.len() - 1)
    }

    /// The name a uniform was declared under.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this handler.
    pub fn name(&self, handle: UniformHandle) -> &str {
        &self.uniforms[handle.0].name
    }

    /// Render the GLSL declarations in declaration order.
    pub fn declarations(&self) -> String {
        let mut out = String::new();
        for u in &self.uniforms {
            // Infallible; writing to a String cannot fail.
            let _ = writeln!(
                out,
                "uniform {} {} {};",
                u.precision.glsl_qualifier(),
                u.ty.glsl_type(),
                u.name
            );
        }
        out
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum UniformValue {
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

#[derive(Debug)]
struct Slot {
    name: String,
    ty: UniformType,
    value: Option<UniformValue>,
}

/// Uniform values of one compiled program instance.
///
/// Each set call stands in for a GPU uniform upload; [`upload_count`] lets
/// the owning pipeline (and tests) observe how many uploads actually
/// happened. Values are type-checked against the declarations the store was
/// built from.
///
/// [`upload_count`]: ProgramData::upload_count
#[derive(Debug)]
pub struct ProgramData {
    slots: Vec<Slot>,
    uploads: usize,
}

impl ProgramData {
    /// Create a value store matching `handler`'s declarations.
    pub fn new(handler: &UniformHandler) -> Self {
        let slots = handler
            .uniforms
            .iter()
            .map(|u| Slot {
                name: u.name.clone(),
                ty: u.ty,
                value: None,
            })
            .collect();
        Self { slots, uploads: 0 }
    }

    fn slot_mut(&mut self, handle: UniformHandle) -> Result<&mut Slot> {
        self.slots
            .get_mut(handle.0)
            .ok_or(Error::InvalidUniformHandle)
    }

    /// Upload a two-component value.
    pub fn set_2f(&mut self, handle: UniformHandle, value: [f32; 2]) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        if slot.ty != UniformType::Vec2 {
            return Err(Error::UniformTypeMismatch {
                name: slot.name.clone(),
                declared: slot.ty,
                provided: UniformType::Vec2,
            });
        }
        slot.value = Some(UniformValue::Vec2(value));
        self.uploads += 1;
        Ok(())
    }

    /// Upload a four-component value.
    pub fn set_4f(&mut self, handle: UniformHandle, value: [f32; 4]) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        if slot.ty != UniformType::Vec4 {
            return Err(Error::UniformTypeMismatch {
                name: slot.name.clone(),
                declared: slot.ty,
                provided: UniformType::Vec4,
            });
        }
        slot.value = Some(UniformValue::Vec4(value));
        self.uploads += 1;
        Ok(())
    }

    /// The last two-component value uploaded, if any.
    pub fn get_2f(&self, handle: UniformHandle) -> Option<[f32; 2]> {
        match self.slots.get(handle.0)?.value {
            Some(UniformValue::Vec2(v)) => Some(v),
            _ => None,
        }
    }

    /// The last four-component value uploaded, if any.
    pub fn get_4f(&self, handle: UniformHandle) -> Option<[f32; 4]> {
        match self.slots.get(handle.0)?.value {
            Some(UniformValue::Vec4(v)) => Some(v),
            _ => None,
        }
    }

    /// Raw byte view of a uniform's current value, for staging into a GPU
    /// queue write.
    pub fn uniform_bytes(&self, handle: UniformHandle) -> Option<&[u8]> {
        match &self.slots.get(handle.0)?.value {
            Some(UniformValue::Vec2(v)) => Some(bytemuck::bytes_of(v)),
            Some(UniformValue::Vec4(v)) => Some(bytemuck::bytes_of(v)),
            None => None,
        }
    }

    /// Number of uploads recorded since creation.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler_with_both() -> (UniformHandler, UniformHandle, UniformHandle) {
        let mut h = UniformHandler::new();
        let four = h.add_uniform(UniformType::Vec4, Precision::High, "ellipse");
        let two = h.add_uniform(UniformType::Vec2, Precision::Medium, "scale");
        (h, four, two)
    }

    #[test]
    fn declarations_render_in_order() {
        let (h, _, _) = handler_with_both();
        assert_eq!(
            h.declarations(),
            "uniform highp vec4 ellipse;\nuniform mediump vec2 scale;\n"
        );
    }

    #[test]
    fn set_and_get_round_trip() {
        let (h, four, two) = handler_with_both();
        let mut data = ProgramData::new(&h);
        data.set_4f(four, [1.0, 2.0, 3.0, 4.0]).unwrap();
        data.set_2f(two, [5.0, 0.2]).unwrap();
        assert_eq!(data.get_4f(four), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(data.get_2f(two), Some([5.0, 0.2]));
        assert_eq!(data.upload_count(), 2);
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let (h, four, _) = handler_with_both();
        let mut data = ProgramData::new(&h);
        let err = data.set_2f(four, [0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::UniformTypeMismatch { .. }));
        assert_eq!(data.upload_count(), 0);
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let mut other = UniformHandler::new();
        other.add_uniform(UniformType::Vec2, Precision::Medium, "a");
        let stray = other.add_uniform(UniformType::Vec2, Precision::Medium, "b");

        let mut h = UniformHandler::new();
        h.add_uniform(UniformType::Vec4, Precision::High, "ellipse");
        let mut data = ProgramData::new(&h);
        assert!(matches!(
            data.set_2f(stray, [0.0, 0.0]),
            Err(Error::InvalidUniformHandle)
        ));
    }

    #[test]
    fn bytes_view_matches_uploaded_value() {
        let (h, four, _) = handler_with_both();
        let mut data = ProgramData::new(&h);
        data.set_4f(four, [1.0, 2.0, 3.0, 4.0]).unwrap();
        let bytes = data.uniform_bytes(four).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes, bytemuck::bytes_of(&[1.0_f32, 2.0, 3.0, 4.0]));
    }
}
