// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fragment source accumulation.

use super::UniformHandler;

/// Accumulates fragment-stage statements in emission order.
///
/// The builder produces a *program fragment*: the surrounding pipeline's
/// assembler splices the rendered source into the full fragment shader along
/// with the declarations of the input and output color variables.
#[derive(Debug, Default)]
pub struct FragmentBuilder {
    body: String,
}

impl FragmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the builtin holding the current pixel's screen coordinate.
    pub fn frag_coord(&self) -> &'static str {
        "gl_FragCoord"
    }

    /// Append one statement. The statement must carry its own terminating
    /// semicolon; the builder only manages line breaks.
    pub fn stmt(&mut self, stmt: impl AsRef<str>) {
        self.body.push_str(stmt.as_ref());
        self.body.push('\n');
    }

    /// The statements appended so far.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Render the fragment source: uniform declarations followed by the
    /// accumulated statements.
    pub fn finish(&self, uniforms: &UniformHandler) -> String {
        let mut source = uniforms.declarations();
        if !source.is_empty() {
            source.push('\n');
        }
        source.push_str(&self.body);
        source
    }
}
