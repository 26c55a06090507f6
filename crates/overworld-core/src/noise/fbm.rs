//! Fractional Brownian Motion synthesis for the base height lookup.
//!
//! fBm: sum of octaves with amplitude = gain^i and frequency = lacunarity^i,
//! gain derived from the Hurst exponent as lacunarity^(−H).
use noise::{NoiseFn, Perlin};

pub struct Fbm {
    octaves: u32,
    lacunarity: f64,
    /// Per-octave amplitude falloff, `lacunarity^(−H)`.
    gain: f64,
    noise: Perlin,
}

impl Fbm {
    /// Construct an fBm with the given seed, Hurst exponent, octave count,
    /// and lacunarity (frequency multiplier per octave, typically 2.0).
    pub fn new(seed: u32, h: f32, octaves: u32, lacunarity: f64) -> Self {
        Self {
            octaves,
            lacunarity,
            gain: lacunarity.powf(-(h as f64)),
            noise: Perlin::new(seed),
        }
    }

    /// Evaluate fBm at `(x, y)` in noise-space.
    ///
    /// Returns an unscaled value, typically ≈ ±1 for H≈0.8 and 4 octaves;
    /// callers min-max normalize over the whole grid anyway.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        (0..self.octaves)
            .fold((0.0f64, 1.0f64, 1.0f64), |(sum, amp, freq), _| {
                (
                    sum + amp * self.noise.get([x * freq, y * freq]),
                    amp * self.gain,
                    freq * self.lacunarity,
                )
            })
            .0
    }
}
