use super::chain::Chain;
use super::model::Model;

/// A named multi-chain assembly declared in the COMPND records.
///
/// Membership is stored as chain identifiers rather than references so that a
/// complex never owns or outlives the chains of its model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub complex_id: String,     // Sequential id of the declaring compound, as text
    pub complex_name: String,   // Declared molecule name
    pub chain_ids: Vec<String>, // Member chains present in the model, declared order
}

impl Complex {
    pub fn new(complex_id: &str, complex_name: &str, chain_ids: Vec<String>) -> Self {
        Self {
            complex_id: complex_id.to_string(),
            complex_name: complex_name.to_string(),
            chain_ids,
        }
    }

    /// Resolves member chains against the model the complex belongs to.
    pub fn chains<'m>(&self, model: &'m Model) -> Vec<&'m Chain> {
        self.chain_ids
            .iter()
            .filter_map(|id| model.chain(id))
            .collect()
    }

    pub fn contains_chain(&self, chain_id: &str) -> bool {
        self.chain_ids.iter().any(|id| id == chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complex_new_initializes_fields_correctly() {
        let complex = Complex::new("1", "COMPLEX1", vec!["A".into(), "B".into()]);
        assert_eq!(complex.complex_id, "1");
        assert_eq!(complex.complex_name, "COMPLEX1");
        assert!(complex.contains_chain("A"));
        assert!(complex.contains_chain("B"));
        assert!(!complex.contains_chain("C"));
    }
}
