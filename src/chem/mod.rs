//! Element data for crystal featurization
//!
//! Provides atomic-number lookup by symbol and metal classification.
//! Metal classification follows the convention used by crystal-analysis
//! toolkits: alkali, alkaline-earth, transition, post-transition,
//! lanthanide and actinide elements are metals; hydrogen, noble gases,
//! halogens, reactive non-metals and metalloids are not.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Element symbols indexed by atomic number - 1, Z in 1..=103.
const SYMBOLS: [&str; 103] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu",
    "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt",
    "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np",
    "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
];

lazy_static! {
    static ref SYMBOL_TO_NUMBER: HashMap<&'static str, u8> = SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, (i + 1) as u8))
        .collect();
}

/// Look up the atomic number for an element symbol (case-sensitive,
/// standard capitalization, e.g. "Fe").
pub fn atomic_number(symbol: &str) -> Option<u8> {
    SYMBOL_TO_NUMBER.get(symbol).copied()
}

/// Element symbol for an atomic number in 1..=103.
pub fn symbol(number: u8) -> Option<&'static str> {
    if number == 0 {
        return None;
    }
    SYMBOLS.get(number as usize - 1).copied()
}

/// Whether the element with this atomic number is a metal.
///
/// Metalloids (B, Si, Ge, As, Sb, Te) are not metals; Al, Ga, In, Sn, Tl,
/// Pb, Bi and Po are post-transition metals and count.
pub fn is_metal(number: u8) -> bool {
    matches!(
        number,
        3 | 4 | 11..=13 | 19..=31 | 37..=50 | 55..=84 | 87..=103
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("Fe"), Some(26));
        assert_eq!(atomic_number("Zn"), Some(30));
        assert_eq!(atomic_number("U"), Some(92));
        assert_eq!(atomic_number("Xx"), None);
        assert_eq!(atomic_number("fe"), None);
    }

    #[test]
    fn test_symbol_roundtrip() {
        for z in 1..=103u8 {
            let s = symbol(z).unwrap();
            assert_eq!(atomic_number(s), Some(z));
        }
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(104), None);
    }

    #[test]
    fn test_metal_classification() {
        // Typical MOF metal centers
        for s in ["Zn", "Cu", "Fe", "Zr", "Mg", "Al", "Co", "Ni", "Cd"] {
            assert!(is_metal(atomic_number(s).unwrap()), "{} should be a metal", s);
        }
        // Organic linker elements
        for s in ["H", "C", "N", "O", "S", "Cl", "P", "F", "Br"] {
            assert!(!is_metal(atomic_number(s).unwrap()), "{} should not be a metal", s);
        }
        // Metalloids are excluded
        for s in ["B", "Si", "Ge", "As", "Sb", "Te"] {
            assert!(!is_metal(atomic_number(s).unwrap()), "{} is a metalloid", s);
        }
        // Post-transition metals are included
        for s in ["Ga", "In", "Sn", "Pb", "Bi", "Po"] {
            assert!(is_metal(atomic_number(s).unwrap()), "{} is a post-transition metal", s);
        }
        // Noble gases
        assert!(!is_metal(2));
        assert!(!is_metal(86));
    }
}
