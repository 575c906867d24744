use serde::Serialize;
use std::fmt;

/// Bond-table entry for one atom: its serial and the serials it is bonded to.
///
/// Built from CONECT records; several records for the same atom are folded into
/// one entry with `bond_to` kept in file order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Connection {
    pub atom: i32,         // Serial of the source atom
    pub bond_to: Vec<i32>, // Bonded serials, in record order
}

impl Connection {
    pub fn new(atom: i32, bond_to: Vec<i32>) -> Self {
        Self { atom, bond_to }
    }

    pub fn bond_count(&self) -> usize {
        self.bond_to.len()
    }

    pub fn is_bonded_to(&self, atom: i32) -> bool {
        self.bond_to.contains(&atom)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let partners: Vec<String> = self.bond_to.iter().map(i32::to_string).collect();
        write!(f, "{} -> [{}]", self.atom, partners.join(", "))
    }
}
