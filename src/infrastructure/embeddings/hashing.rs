//! Offline embedding by feature hashing.
//!
//! Each text is lowercased, padded, and cut into character trigrams; every
//! trigram increments one bucket chosen by an FNV-1a hash. The result is
//! L2-normalised so identical text always maps to an identical unit vector.
//! Quality is far below a learned model but it needs no network and is
//! fully deterministic.

use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};

pub const DEFAULT_DIMENSION: usize = 256;

pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension: dimension.max(1) }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimension];
        let chars: Vec<char> = format!("  {}  ", text.to_lowercase()).chars().collect();
        for window in chars.windows(3) {
            let bucket = (fnv1a(window) % self.dimension as u64) as usize;
            vec[bucket] += 1.0;
        }
        let mag: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if mag > 0.0 {
            vec.iter_mut().for_each(|x| *x /= mag);
        }
        vec
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        HashingProvider::new(DEFAULT_DIMENSION)
    }
}

fn fnv1a(chars: &[char]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for c in chars {
        let mut buf = [0u8; 4];
        for b in c.encode_utf8(&mut buf).bytes() {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l2(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    #[test]
    fn test_identical_text_identical_vector() {
        let p = HashingProvider::default();
        let a = p.embed_text("The quick brown fox");
        let b = p.embed_text("the quick brown fox");
        assert_eq!(a.len(), DEFAULT_DIMENSION);
        assert_eq!(a, b);
    }

    #[test]
    fn test_related_text_is_closer() {
        let p = HashingProvider::default();
        let q = p.embed_text("rust borrow checker");
        let near = p.embed_text("the rust borrow checker explained");
        let far = p.embed_text("banana bread recipe");
        assert!(l2(&q, &near) < l2(&q, &far));
    }

    #[test]
    fn test_empty_text_is_still_unit_length() {
        let p = HashingProvider::new(16);
        let v = p.embed_text("");
        let mag: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((mag - 1.0).abs() < 1e-5);
    }
}
