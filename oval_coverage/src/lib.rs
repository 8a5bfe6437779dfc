// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Analytic per-pixel coverage effects for GPU 2D rendering pipelines.
//!
//! This crate synthesizes fragment-stage source code that evaluates an
//! antialiased coverage test for an ellipse (or, via a cheaper
//! specialization, a circle), together with the small amount of per-draw
//! state needed to drive the generated code. It is meant to be embedded in a
//! larger renderer that owns program compilation, caching, and draw
//! recording.
//!
//! The ellipse test evaluates the shape's implicit equation per pixel and
//! normalizes it by the local gradient magnitude, giving a first-order
//! approximation of signed distance from a single `inversesqrt` and a few
//! multiply-adds. On devices where fragment floating point may run at
//! reduced precision (see [`shader::ShaderCaps`]), the problem is rescaled
//! into a space normalized by the larger radius so the inverse-squared radii
//! stay in a numerically safe range.
//!
//! A typical frame uses the pieces like this:
//!
//! 1. [`OvalEffect::new`] turns an axis-aligned rectangle and an
//!    [`EdgeType`] into a circle or ellipse effect (or `None` for the
//!    unsupported hairline mode).
//! 2. [`OvalEffect::write_key`] contributes the effect's field to the
//!    program cache key. Only the edge mode affects generated source;
//!    centers and radii are runtime uniform values and never keyed.
//! 3. On a cache miss, [`OvalEffect::instantiate`] creates the per-program
//!    [`OvalShader`], whose `emit` appends the fragment source.
//! 4. Each draw calls `set_data`, which uploads uniform values only when
//!    they changed since the previous draw with the same program instance.
//!
//! Ovals with a zero radius are degenerate: the reciprocal-square radii
//! divide by zero and NaN propagates into the coverage value. Callers are
//! expected to cull empty ovals before building effects.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
#![forbid(unsafe_code)]

mod edge;

pub mod cpu;
pub mod effects;
pub mod shader;

pub use edge::EdgeType;
pub use effects::{CircleEffect, CircleShader, EllipseEffect, EllipseShader, OvalEffect, OvalShader};

/// 2D geometry, with a focus on curves.
pub use peniko::kurbo;

use shader::UniformType;
use thiserror::Error;

/// Errors that can occur while driving a generated coverage shader.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A uniform was set with a value of the wrong shape.
    #[error("uniform `{name}` was declared as {declared:?} but set with a {provided:?} value")]
    UniformTypeMismatch {
        /// Name the uniform was declared under.
        name: String,
        /// Declared uniform type.
        declared: UniformType,
        /// Type of the value passed to the setter.
        provided: UniformType,
    },
    /// A uniform handle did not originate from the program's declarations.
    #[error("uniform handle does not belong to this program's data")]
    InvalidUniformHandle,
    /// `set_data` ran before `emit` declared the shader's uniforms.
    #[error("shader state was pushed before the shader source was emitted")]
    StatePushedBeforeEmit,
}

pub(crate) type Result<T, E = Error> = core::result::Result<T, E>;
