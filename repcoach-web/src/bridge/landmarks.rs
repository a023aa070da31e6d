//! Flat landmark buffers from JavaScript

use log::warn;

use crate::geometry::{Landmark, LANDMARK_COUNT};

/// Floats per frame: 33 landmarks × (x, y, z)
pub const FLAT_LEN: usize = LANDMARK_COUNT * 3;

/// Unpack a flat Float32Array of 99 values into landmarks
///
/// Buffers of any other length are rejected with a warning.
pub fn parse_landmarks(data: &[f32]) -> Option<Vec<Landmark>> {
    if data.len() != FLAT_LEN {
        warn!("Invalid landmark data length: {} (expected {})", data.len(), FLAT_LEN);
        return None;
    }

    Some(
        data.chunks_exact(3)
            .map(|xyz| Landmark::new(xyz[0], xyz[1], xyz[2]))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_frame() {
        let data: Vec<f32> = (0..FLAT_LEN).map(|i| i as f32).collect();
        let landmarks = parse_landmarks(&data).unwrap();

        assert_eq!(landmarks.len(), LANDMARK_COUNT);
        assert_eq!(landmarks[1], Landmark::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(parse_landmarks(&[0.0; 98]).is_none());
        assert!(parse_landmarks(&[]).is_none());
    }
}
