//! Plain ↔ normalized value mapping.

/// Curve used to map a normalized `0..=1` position onto the plain range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Straight line between `min` and `max`.
    #[default]
    Linear,
    /// Equal ratios per unit of travel. Requires `min > 0`.
    Logarithmic,
    /// `normalized^exp` before the linear mapping. Exponents above 1 give more
    /// resolution near `min`.
    Power(f32),
}

/// Plain value range of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Smallest plain value.
    pub min: f32,
    /// Largest plain value.
    pub max: f32,
    /// Plain value the parameter starts at.
    pub default: f32,
    /// Mapping curve.
    pub scale: ParamScale,
}

impl ParamRange {
    /// Linear range with the given bounds and default.
    pub const fn linear(min: f32, max: f32, default: f32) -> Self {
        Self {
            min,
            max,
            default,
            scale: ParamScale::Linear,
        }
    }

    /// The identity range `0..=1`.
    pub const fn unit(default: f32) -> Self {
        Self::linear(0.0, 1.0, default)
    }

    /// Builder-style scale override.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Map a plain value to `0..=1`. Values outside the range are clamped.
    ///
    /// Reversed ranges (`min > max`) are allowed: `min` still maps to 0.
    /// Ranges with a NaN or infinite bound map everything to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 || !range.is_finite() {
            return 0.0;
        }
        let value = clamp_between(value, self.min, self.max);
        let normalized = match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || self.max <= 0.0 {
                    return 0.0;
                }
                (value / self.min).ln() / (self.max / self.min).ln()
            }
            ParamScale::Power(exp) => {
                if exp == 0.0 {
                    return 0.0;
                }
                ((value - self.min) / range).powf(1.0 / exp)
            }
        };
        normalized.clamp(0.0, 1.0)
    }

    /// Map a `0..=1` position back onto the plain range.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || self.max <= 0.0 {
                    return self.min;
                }
                self.min * (self.max / self.min).powf(normalized)
            }
            ParamScale::Power(exp) => self.min + normalized.powf(exp) * (self.max - self.min),
        }
    }

    /// Normalized position of [`default`](Self::default).
    pub fn default_normalized(&self) -> f32 {
        self.normalize(self.default)
    }
}

/// Clamp `value` between two bounds given in either order.
///
/// Unlike `f32::clamp`, never panics: reversed bounds are swapped and a NaN
/// bound is ignored.
fn clamp_between(value: f32, a: f32, b: f32) -> f32 {
    let (lo, hi) = (a.min(b), a.max(b));
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}
