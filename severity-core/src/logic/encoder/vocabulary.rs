//! Vocabulary - closed set of category strings with stable integer codes
//!
//! Codes follow the label-encoder convention: `classes[code] == value`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("vocabulary is empty")]
    Empty,

    #[error("duplicate category {0:?}")]
    Duplicate(String),
}

/// Ordered category list plus reverse index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    pub fn new<I, S>(classes: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        if classes.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), code as u32).is_some() {
                return Err(VocabularyError::Duplicate(class.clone()));
            }
        }

        Ok(Self { classes, index })
    }

    /// Code for a value, if it belongs to the vocabulary
    pub fn code(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// First entry, used as the form's default selection
    pub fn first(&self) -> &str {
        // Non-empty by construction
        &self.classes[0]
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = VocabularyError;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(classes)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_positions() {
        let vocab = Vocabulary::new(["Bus", "Car", "Lorry"]).unwrap();
        assert_eq!(vocab.code("Bus"), Some(0));
        assert_eq!(vocab.code("Car"), Some(1));
        assert_eq!(vocab.code("Lorry"), Some(2));
        assert_eq!(vocab.code("car"), None);
    }

    #[test]
    fn test_bijection_onto_code_range() {
        let vocab = Vocabulary::new(["Clear", "Cloudy", "Foggy", "Rainy"]).unwrap();
        let mut codes: Vec<u32> = vocab.classes().iter().map(|c| vocab.code(c).unwrap()).collect();
        codes.sort_unstable();
        assert_eq!(codes, (0..vocab.len() as u32).collect::<Vec<_>>());

        for class in vocab.classes() {
            let code = vocab.code(class).unwrap();
            assert_eq!(&vocab.classes()[code as usize], class);
        }
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_eq!(Vocabulary::new(Vec::<String>::new()), Err(VocabularyError::Empty));
        assert_eq!(
            Vocabulary::new(["Male", "Female", "Male"]),
            Err(VocabularyError::Duplicate("Male".to_string()))
        );
    }

    #[test]
    fn test_serde_as_plain_list() {
        let vocab: Vocabulary = serde_json::from_str(r#"["Female","Male"]"#).unwrap();
        assert_eq!(vocab.code("Male"), Some(1));
        assert_eq!(serde_json::to_string(&vocab).unwrap(), r#"["Female","Male"]"#);

        let dup = serde_json::from_str::<Vocabulary>(r#"["A","A"]"#);
        assert!(dup.is_err());
    }
}
