use serde::{Deserialize, Serialize};

/// An embedding vector of floating point numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// A vector of `dim` zeros. Has zero magnitude, so it never matches anything.
    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Dot product, accumulated in f64
    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| f64::from(*a) * f64::from(*b))
            .sum()
    }

    /// Euclidean norm, accumulated in f64
    #[inline]
    pub fn norm(&self) -> f64 {
        self.data
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt()
    }

    /// Compute cosine similarity with another vector.
    ///
    /// Returns `None` when the dimensions differ or either vector has zero magnitude.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> Option<f64> {
        if self.dim() != other.dim() {
            return None;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return None;
        }

        Some(self.dot(other) / (norm_a * norm_b))
    }

    /// Cosine distance `1 - cos(a, b)`: 0 for identical direction, 1 for
    /// orthogonal, 2 for opposite.
    #[inline]
    pub fn cosine_distance(&self, other: &Vector) -> Option<f64> {
        self.cosine_similarity(other).map(|sim| 1.0 - sim)
    }

    /// Scale to unit length in place. Zero-magnitude vectors are left as is.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm() as f32;
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_distance() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert_eq!(v1.cosine_distance(&v2), Some(0.0));

        let v3 = Vector::new(vec![1.0, 0.0]);
        let v4 = Vector::new(vec![0.0, 1.0]);
        assert_eq!(v3.cosine_distance(&v4), Some(1.0));

        let v5 = Vector::new(vec![-1.0, 0.0]);
        assert!((v1.cosine_distance(&v5).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_vectors_have_zero_distance() {
        let v = Vector::new(vec![0.3, -1.2, 4.5, 0.25]);
        let d = v.cosine_distance(&v.clone()).unwrap();
        assert!(d.abs() < 1e-9, "got {}", d);
    }

    #[test]
    fn test_zero_magnitude_is_undefined() {
        let zero = Vector::zeros(3);
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(zero.cosine_distance(&v), None);
        assert_eq!(v.cosine_distance(&zero), None);
    }

    #[test]
    fn test_dimension_mismatch_is_undefined() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0, 0.0]);
        assert_eq!(v1.cosine_similarity(&v2), None);
    }

    #[test]
    fn test_normalize() {
        let v = Vector::new(vec![3.0, 4.0]).normalized();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.as_slice()[0] - 0.6).abs() < 1e-6);
        assert!((v.as_slice()[1] - 0.8).abs() < 1e-6);

        let zero = Vector::zeros(4).normalized();
        assert_eq!(zero, Vector::zeros(4));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let v = Vector::new(vec![1.0, 0.5]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,0.5]");
    }
}
