//! Index-aligned embeddings and labels.

use crate::distance::check_dimensions;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One text item with its embedding, as stored by an embedding cache.
///
/// Serialized as `{"sentence": "...", "embedding": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedText {
    /// The original text item.
    pub sentence: String,
    /// Its embedding vector.
    pub embedding: Vec<f32>,
}

/// Points and their labels, validated once and never mutated.
///
/// Invariants: at least one point, `points.len() == labels.len()`, all points
/// share one dimension, all coordinates are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Vec<Vec<f32>>,
    labels: Vec<String>,
    dim: usize,
}

impl Dataset {
    /// Build a dataset from parallel point and label sequences.
    pub fn new(points: Vec<Vec<f32>>, labels: Vec<String>) -> Result<Self> {
        if points.len() != labels.len() {
            return Err(Error::LabelCountMismatch {
                points: points.len(),
                labels: labels.len(),
            });
        }
        let dim = check_dimensions(&points)?;
        Ok(Self {
            points,
            labels,
            dim,
        })
    }

    /// Build a dataset from embedded text records, keeping their order.
    pub fn from_records(records: impl IntoIterator<Item = EmbeddedText>) -> Result<Self> {
        let (labels, points) = records
            .into_iter()
            .map(|r| (r.sentence, r.embedding))
            .unzip();
        Self::new(points, labels)
    }

    /// Parse a JSON array of [`EmbeddedText`] records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<EmbeddedText> =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_records(records)
    }

    /// Back to records, e.g. for a persistence layer.
    pub fn to_records(&self) -> Vec<EmbeddedText> {
        self.labels
            .iter()
            .zip(&self.points)
            .map(|(sentence, embedding)| EmbeddedText {
                sentence: sentence.clone(),
                embedding: embedding.clone(),
            })
            .collect()
    }

    /// The embedding vectors.
    pub fn points(&self) -> &[Vec<f32>] {
        &self.points
    }

    /// The labels, index-aligned with [`Dataset::points`].
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_new() {
        let ds = Dataset::new(
            vec![vec![0.0, 1.0], vec![2.0, 3.0]],
            vec!["a".into(), "b".into()],
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dim(), 2);
        assert!(!ds.is_empty());
        assert_eq!(ds.labels(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_dataset_label_mismatch() {
        let err = Dataset::new(vec![vec![0.0]], vec![]).unwrap_err();
        assert_eq!(err, Error::LabelCountMismatch { points: 1, labels: 0 });
    }

    #[test]
    fn test_dataset_rejects_ragged_and_empty() {
        assert!(matches!(
            Dataset::new(vec![vec![0.0, 1.0], vec![2.0]], vec!["a".into(), "b".into()]),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            Dataset::new(vec![], vec![]),
            Err(Error::EmptyDataset { .. })
        ));
    }

    #[test]
    fn test_dataset_from_json() {
        let json = r#"[
            {"sentence": "The sky is clear and blue today.", "embedding": [0.1, 0.2]},
            {"sentence": "I had a delicious pasta for lunch.", "embedding": [0.9, 0.8]}
        ]"#;
        let ds = Dataset::from_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.labels()[1], "I had a delicious pasta for lunch.");
        assert_eq!(ds.points()[0], vec![0.1, 0.2]);

        let back = ds.to_records();
        assert_eq!(back[0].sentence, "The sky is clear and blue today.");
    }

    #[test]
    fn test_dataset_from_bad_json() {
        assert!(matches!(
            Dataset::from_json(r#"[{"sentence": "x"}]"#),
            Err(Error::Serialization(_))
        ));
    }
}
