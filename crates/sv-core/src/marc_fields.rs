//! MARC field-number and fixed-field code helpers.

use std::collections::HashSet;

pub use sv_config::{left_pad_field_number, zero_fill_marc_field};

const SERIAL_TYPES: [char; 6] = ['m', 'p', '\\', ' ', '-', '|'];
const FORMS: [char; 4] = ['r', '\\', ' ', '-'];

/// 008/21 serial-type codes accepted as "periodical".
pub fn valid_serial_types() -> HashSet<char> {
    SERIAL_TYPES.into_iter().collect()
}

/// 008/23 form codes accepted as "print".
pub fn valid_forms() -> HashSet<char> {
    FORMS.into_iter().collect()
}

/// Sorted copy of a code set, for stable reporting.
pub fn sorted_codes(codes: &HashSet<char>) -> Vec<char> {
    let mut sorted: Vec<char> = codes.iter().copied().collect();
    sorted.sort_unstable();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexported_padding_matches_zero_fill() {
        assert_eq!(left_pad_field_number("4"), "004");
        assert_eq!(zero_fill_marc_field("4"), left_pad_field_number("4"));
    }

    #[test]
    fn code_sets() {
        assert!(valid_serial_types().contains(&'p'));
        assert!(valid_serial_types().contains(&'|'));
        assert!(!valid_serial_types().contains(&'n'));
        assert!(valid_forms().contains(&'r'));
        assert!(!valid_forms().contains(&'o'));
    }

    #[test]
    fn sorted_codes_are_stable() {
        assert_eq!(sorted_codes(&valid_forms()), vec![' ', '-', '\\', 'r']);
    }
}
