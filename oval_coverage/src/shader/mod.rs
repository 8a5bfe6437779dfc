// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thin interfaces to the surrounding shader framework.
//!
//! The effects in this crate do not own program assembly; they append
//! statements to a [`FragmentBuilder`], declare uniforms through a
//! [`UniformHandler`], and push values into the [`ProgramData`] of a
//! compiled program instance. These types are the minimal concrete forms of
//! those collaborators, enough to generate and drive the coverage shaders
//! and to test them end to end.

mod builder;
mod key;
mod uniform;

pub use builder::FragmentBuilder;
pub use key::KeyBuilder;
pub use uniform::{Precision, ProgramData, UniformHandle, UniformHandler, UniformType};

/// Capabilities of the target GPU that affect generated source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderCaps {
    /// Fragment-stage floating point may be computed at reduced precision
    /// ("mediump"). When set, emitters that are sensitive to underflow
    /// rescale their math into a normalized space.
    pub float_precision_varies: bool,
}

/// Everything an effect needs to emit its fragment source.
#[derive(Debug)]
pub struct EmitArgs<'a> {
    /// Receives the generated statements.
    pub builder: &'a mut FragmentBuilder,
    /// Declares the effect's uniforms.
    pub uniforms: &'a mut UniformHandler,
    /// Capabilities of the device the program is compiled for.
    pub caps: &'a ShaderCaps,
    /// Variable holding the color the effect modulates.
    pub input_color: &'a str,
    /// Variable the effect assigns its result to.
    pub output_color: &'a str,
}
