use std::fmt;

use thiserror::Error;

/// Tolerance applied to the window dot products when none is configured.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Number of fractional digits every cosine is printed with in a volume ID.
const SUFFIX_PRECISION: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum CosinesError {
    #[error("Image orientation must have 6 direction cosines, got {0}")]
    InvalidLength(usize),
}

/// Row-major direction cosines of an image plane: row vector followed by
/// column vector, as stored in Image Orientation (Patient).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cosines([f64; 6]);

impl Cosines {
    pub fn new(values: [f64; 6]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; 6] {
        &self.0
    }

    /// Whether two orientations are the same within `epsilon`.
    ///
    /// Both vectors are compared through two overlapping 3-component windows,
    /// indices `0..3` and `1..4`. The raw dot product of each window pair must
    /// reach `1 - epsilon`. Components 4 and 5 never take part, and a vector
    /// whose `1..4` window is not unit length (axial `[1, 0, 0, 0, 1, 0]`) is
    /// not equivalent even to itself.
    pub fn equivalent(&self, other: &Cosines, epsilon: f64) -> bool {
        let threshold = 1.0 - epsilon;
        for i in 0..=1 {
            let dot = window_dot(&self.0[i..i + 3], &other.0[i..i + 3]);
            if dot < threshold {
                return false;
            }
        }
        true
    }

    /// Encode the cosines as a volume ID suffix.
    ///
    /// Every value is printed in fixed-point notation with six fractional
    /// digits, values are joined with `S`, then `-` becomes `N` and `.`
    /// becomes `D`. `[1.0, -0.5, ...]` starts with `1D000000SN0D500000`.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|value| format!("{:.*}", SUFFIX_PRECISION, value))
            .collect::<Vec<_>>()
            .join("S")
            .replace('-', "N")
            .replace('.', "D")
    }
}

#[inline]
fn window_dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl From<[f64; 6]> for Cosines {
    fn from(values: [f64; 6]) -> Self {
        Self(values)
    }
}

impl TryFrom<&[f64]> for Cosines {
    type Error = CosinesError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        <[f64; 6]>::try_from(values)
            .map(Self)
            .map_err(|_| CosinesError::InvalidLength(values.len()))
    }
}

impl TryFrom<Vec<f64>> for Cosines {
    type Error = CosinesError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from(values.as_slice())
    }
}

impl fmt::Display for Cosines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}, {e}, {g}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAGITTAL: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, -1.0];

    fn tilted(angle: f64) -> Cosines {
        Cosines::new([0.0, angle.cos(), angle.sin(), 0.0, 0.0, 1.0])
    }

    #[test]
    fn encodes_fixed_point_with_substitutions() {
        let cosines = Cosines::new([1.0, -0.5, 0.0, 0.0, 1.0, 0.0]);
        let encoded = cosines.encode();

        assert_eq!(
            encoded,
            "1D000000SN0D500000S0D000000S0D000000S1D000000S0D000000"
        );
        assert!(!encoded.contains('-'));
        assert!(!encoded.contains('.'));
    }

    #[test]
    fn encodes_negative_zero_with_sign() {
        let cosines = Cosines::new([-0.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
        assert!(cosines.encode().starts_with("N0D000000S1D000000"));
    }

    #[test]
    fn encoding_rounds_to_six_digits() {
        let cosines = Cosines::new([0.99999999, 0.0000004, 0.0, 0.0, 0.0, 1.0]);
        assert!(cosines.encode().starts_with("1D000000S0D000000S"));
    }

    #[test]
    fn identical_sagittal_vectors_are_equivalent() {
        let a = Cosines::new(SAGITTAL);
        assert!(a.equivalent(&a, DEFAULT_EPSILON));
    }

    #[test]
    fn axial_vector_is_not_equivalent_to_itself() {
        let axial = Cosines::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert!(!axial.equivalent(&axial, DEFAULT_EPSILON));
    }

    #[test]
    fn overlapping_windows_ignore_trailing_components() {
        let a = Cosines::new([0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        let b = Cosines::new(SAGITTAL);
        assert!(a.equivalent(&b, DEFAULT_EPSILON));
    }

    #[test]
    fn orthogonal_orientations_are_not_equivalent() {
        let a = Cosines::new(SAGITTAL);
        let b = Cosines::new([0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert!(!a.equivalent(&b, DEFAULT_EPSILON));
    }

    #[test]
    fn equivalence_respects_tolerance() {
        let base = tilted(0.0);
        assert!(base.equivalent(&tilted(0.01), DEFAULT_EPSILON));
        assert!(!base.equivalent(&tilted(0.02), DEFAULT_EPSILON));
        assert!(base.equivalent(&tilted(0.02), 1e-3));
    }

    #[test]
    fn equivalence_is_symmetric() {
        let samples = [
            tilted(0.0),
            tilted(0.01),
            tilted(0.02),
            Cosines::new(SAGITTAL),
            Cosines::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(
                    a.equivalent(b, DEFAULT_EPSILON),
                    b.equivalent(a, DEFAULT_EPSILON),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert_eq!(
            Cosines::try_from(vec![1.0, 0.0, 0.0, 0.0, 1.0]),
            Err(CosinesError::InvalidLength(5))
        );
        assert_eq!(
            Cosines::try_from(&[0.0; 7][..]),
            Err(CosinesError::InvalidLength(7))
        );
        assert!(Cosines::try_from(SAGITTAL.to_vec()).is_ok());
    }
}
