// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Program cache key assembly.

/// Accumulates the 32-bit fields of a program cache key.
///
/// Each component of a program contributes the fields that affect its
/// generated source, in a fixed order. Runtime uniform values must never be
/// keyed; doing so would make every distinct draw compile a new program.
#[derive(Debug, Default)]
pub struct KeyBuilder {
    data: Vec<u32>,
}

impl KeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one 32-bit field.
    pub fn add_u32(&mut self, value: u32) {
        self.data.push(value);
    }

    /// The accumulated fields.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Consume the builder, yielding the key.
    pub fn finish(self) -> Vec<u32> {
        self.data
    }
}
