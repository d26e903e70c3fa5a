//! Locale-aware ordering for place names.
//!
//! Approximates root-locale collation for the Latin script used by PSGC names:
//! letters compare case-insensitively with diacritics folded (`Piñas` sorts
//! next to `Pinas`), then accents break ties, then case (lowercase first),
//! and finally the raw string so the order is total.

use std::cmp::Ordering;

use crate::model::Named;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    primary: String,
    secondary: Vec<u8>,
    tertiary: Vec<bool>,
}

impl SortKey {
    fn new(s: &str) -> Self {
        let mut primary = String::with_capacity(s.len());
        let mut secondary = Vec::with_capacity(s.len());
        let mut tertiary = Vec::with_capacity(s.len());

        for c in s.chars() {
            if let Some(accent) = combining_accent(c) {
                if let Some(last) = secondary.last_mut() {
                    if *last == 0 {
                        *last = accent;
                    }
                    continue;
                }
            }

            let upper = c.is_uppercase();
            for lower in c.to_lowercase() {
                let (base, accent) = fold(lower);
                primary.push(base);
                secondary.push(accent);
                tertiary.push(upper);
            }
        }

        Self { primary, secondary, tertiary }
    }
}

/// Base letter and accent class for a lowercase char.
fn fold(c: char) -> (char, u8) {
    match c {
        'à' => ('a', 1),
        'á' => ('a', 2),
        'â' => ('a', 3),
        'ã' => ('a', 4),
        'ä' => ('a', 5),
        'å' => ('a', 6),
        'ç' => ('c', 7),
        'è' => ('e', 1),
        'é' => ('e', 2),
        'ê' => ('e', 3),
        'ë' => ('e', 5),
        'ì' => ('i', 1),
        'í' => ('i', 2),
        'î' => ('i', 3),
        'ï' => ('i', 5),
        'ñ' => ('n', 4),
        'ò' => ('o', 1),
        'ó' => ('o', 2),
        'ô' => ('o', 3),
        'õ' => ('o', 4),
        'ö' => ('o', 5),
        'ù' => ('u', 1),
        'ú' => ('u', 2),
        'û' => ('u', 3),
        'ü' => ('u', 5),
        'ý' => ('y', 2),
        'ÿ' => ('y', 5),
        other => (other, 0),
    }
}

/// Accent class of a combining diacritic (U+0300..U+036F), matching `fold`.
fn combining_accent(c: char) -> Option<u8> {
    let accent = match c {
        '\u{300}' => 1,
        '\u{301}' => 2,
        '\u{302}' => 3,
        '\u{303}' => 4,
        '\u{308}' => 5,
        '\u{30a}' => 6,
        '\u{327}' => 7,
        '\u{300}'..='\u{36f}' => 8,
        _ => return None,
    };
    Some(accent)
}

/// Compare two display strings the way a locale-aware UI would.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    SortKey::new(a).cmp(&SortKey::new(b)).then_with(|| a.cmp(b))
}

/// Sort in place, ascending by display name.
pub fn sort_by_name<T: Named>(items: &mut [T]) {
    items.sort_by_cached_key(|item| SortKey::new(item.name()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityOrMunicipality, Province};

    fn names<T: Named>(items: &[T]) -> Vec<&str> {
        items.iter().map(|i| i.name()).collect()
    }

    #[test]
    fn provinces_sorted_by_name() {
        let mut provinces = vec![Province::new("02", "Batanes"), Province::new("01", "Abra")];
        sort_by_name(&mut provinces);
        assert_eq!(names(&provinces), ["Abra", "Batanes"]);
    }

    #[test]
    fn case_does_not_dominate_order() {
        assert_eq!(locale_cmp("aparri", "Baguio"), Ordering::Less);
        assert_eq!(locale_cmp("abra", "Abra"), Ordering::Less);
    }

    #[test]
    fn diacritics_fold_to_base_letter() {
        let mut cities = vec![
            CityOrMunicipality::new("3", "Las Piñas"),
            CityOrMunicipality::new("1", "Laoag"),
            CityOrMunicipality::new("4", "Lasam"),
            CityOrMunicipality::new("2", "Las Pinas"),
        ];
        sort_by_name(&mut cities);
        assert_eq!(names(&cities), ["Laoag", "Las Pinas", "Las Piñas", "Lasam"]);
    }

    #[test]
    fn enye_sorts_with_n_not_after_z() {
        assert_eq!(locale_cmp("Parañaque", "Pasay"), Ordering::Less);
        assert_eq!(locale_cmp("Parañaque", "Paranas"), Ordering::Less);
    }

    #[test]
    fn decomposed_accents_sort_like_precomposed() {
        assert_eq!(SortKey::new("Las Pin\u{303}as"), SortKey::new("Las Piñas"));
        assert_eq!(locale_cmp("Las Pin\u{303}as", "Lasam"), Ordering::Less);
        assert_eq!(locale_cmp("Las Pinas", "Las Pin\u{303}as"), Ordering::Less);
        assert_eq!(locale_cmp("Paran\u{303}aque", "Pasay"), Ordering::Less);
    }

    #[test]
    fn equal_strings_compare_equal() {
        assert_eq!(locale_cmp("Bangued", "Bangued"), Ordering::Equal);
    }

    #[test]
    fn sorted_output_is_ascending() {
        let mut provinces: Vec<Province> = ["Zambales", "ilocos Norte", "Ilocos Sur", "Agusan del Norte", "Éxample"]
            .iter()
            .enumerate()
            .map(|(i, n)| Province::new(i.to_string(), *n))
            .collect();
        sort_by_name(&mut provinces);
        for pair in provinces.windows(2) {
            assert_ne!(locale_cmp(&pair[0].name, &pair[1].name), Ordering::Greater);
        }
    }
}
