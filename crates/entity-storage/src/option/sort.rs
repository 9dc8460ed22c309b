use super::QueryOption;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One sort key: a property path and its direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyPath {
    Forward(String),
    Reverse(String),
}

impl PropertyPath {
    /// `"!name"` and `"-name"` sort descending, anything else ascending
    pub fn parse(path: &str) -> Self {
        match path.strip_prefix(['!', '-']) {
            Some(property) => PropertyPath::Reverse(property.to_string()),
            None => PropertyPath::Forward(path.to_string()),
        }
    }

    pub fn property(&self) -> &str {
        match self {
            PropertyPath::Forward(property) | PropertyPath::Reverse(property) => property,
        }
    }

    pub fn is_reverse(&self) -> bool {
        matches!(self, PropertyPath::Reverse(_))
    }

    // Forward paths may still carry a textual prefix when built directly.
    fn normalize(self) -> Self {
        match self {
            PropertyPath::Forward(path) => PropertyPath::parse(&path),
            reverse => reverse,
        }
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        PropertyPath::parse(path)
    }
}

impl From<String> for PropertyPath {
    fn from(path: String) -> Self {
        PropertyPath::parse(&path)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Forward(property) => write!(f, "{}", property),
            PropertyPath::Reverse(property) => write!(f, "-{}", property),
        }
    }
}

/// Order results by one or more property paths, first key first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub properties: Vec<PropertyPath>,
}

impl Sort {
    pub fn new<I, P>(properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyPath>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|property| property.into().normalize())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl QueryOption for Sort {
    fn name(&self) -> &'static str {
        "sort"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_become_reverse() {
        let sort = Sort::new(["!name", "age"]);
        assert_eq!(
            sort.properties,
            vec![
                PropertyPath::Reverse("name".to_string()),
                PropertyPath::Forward("age".to_string()),
            ]
        );

        let sort = Sort::new(["-created_at"]);
        assert!(sort.properties[0].is_reverse());
        assert_eq!(sort.properties[0].property(), "created_at");
    }

    #[test]
    fn test_only_first_character_is_a_prefix() {
        let sort = Sort::new(["--name", "a-b"]);
        assert_eq!(
            sort.properties,
            vec![
                PropertyPath::Reverse("-name".to_string()),
                PropertyPath::Forward("a-b".to_string()),
            ]
        );
    }

    #[test]
    fn test_reverse_input_kept_and_forward_normalized() {
        let sort = Sort::new(vec![
            PropertyPath::Reverse("!odd".to_string()),
            PropertyPath::Forward("!score".to_string()),
        ]);
        assert_eq!(
            sort.properties,
            vec![
                PropertyPath::Reverse("!odd".to_string()),
                PropertyPath::Reverse("score".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_path_stays_forward() {
        let sort = Sort::new([""]);
        assert_eq!(sort.properties, vec![PropertyPath::Forward(String::new())]);
    }

    #[test]
    fn test_display() {
        let sort = Sort::new(["!name", "age"]);
        let rendered: Vec<String> = sort.properties.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["-name", "age"]);
    }
}
