// Copyright 2026 the Oval Coverage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge-test modes shared by the coverage effects.

/// How a signed distance to the shape boundary maps to coverage.
///
/// The discriminants are stable wire values: they are what
/// [`OvalEffect::write_key`](crate::OvalEffect::write_key) contributes to the
/// program cache key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EdgeType {
    /// Hard-edged fill: binary inside/outside.
    FillBW = 0,
    /// Soft-edged fill: `clamp(0.5 - dist, 0, 1)`.
    FillAA = 1,
    /// Hard-edged inverse fill: binary outside/inside.
    InverseFillBW = 2,
    /// Soft-edged inverse fill: `clamp(0.5 + dist, 0, 1)`.
    InverseFillAA = 3,
    /// Hairline stroke. Not representable by the oval effects; requesting it
    /// from the factory yields no effect.
    HairlineAA = 4,
}

impl EdgeType {
    /// Whether this mode produces fractional (antialiased) coverage.
    pub fn is_aa(self) -> bool {
        matches!(self, Self::FillAA | Self::InverseFillAA | Self::HairlineAA)
    }

    /// Whether this mode covers the outside of the shape.
    pub fn is_inverse_fill(self) -> bool {
        matches!(self, Self::InverseFillBW | Self::InverseFillAA)
    }

    /// Whether this is the (unsupported) hairline mode.
    pub fn is_hairline(self) -> bool {
        self == Self::HairlineAA
    }

    /// The 32-bit value keyed into the program cache.
    pub(crate) fn as_key(self) -> u32 {
        self as u32
    }
}
