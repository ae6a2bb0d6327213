//! Free-text maps address → [`EstablishmentDescriptor`].
//!
//! Each field is an independent lookup. Only `name` keeps the caller's
//! casing; place names come back title-cased from the lexicon.

use adscout_core::{EstablishmentDescriptor, Lexicon};

use crate::error::AddressUnparseable;

const SEGMENT_SEPARATOR: &str = " - ";

/// Brazilian federative-unit codes accepted as the trailing state segment.
const STATE_CODES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

const STREET_PREFIXES: &[&str] = &[
    "r.", "rua ", "av.", "avenida ", "al.", "alameda ", "travessa ", "tv.", "estrada ", "rodovia ",
    "praça ",
];

/// Parses a maps address into a descriptor using `lexicon` for place and
/// category lookups.
///
/// # Errors
///
/// Returns [`AddressUnparseable`] when `raw` is empty or whitespace-only.
pub fn parse_address(
    raw: &str,
    lexicon: &Lexicon,
) -> Result<EstablishmentDescriptor, AddressUnparseable> {
    if raw.trim().is_empty() {
        return Err(AddressUnparseable);
    }

    let lower = raw.to_lowercase();

    let city = lexicon
        .cities
        .iter()
        .find(|c| lower.contains(c.as_str()))
        .map(|c| title_case(c))
        .unwrap_or_default();

    let neighborhood = lexicon
        .neighborhoods
        .iter()
        .find(|n| lower.contains(n.as_str()))
        .map(|n| title_case(n))
        .unwrap_or_default();

    let category = lexicon
        .categories
        .iter()
        .find(|c| c.keywords.iter().any(|k| contains_word(&lower, k)))
        .map(|c| c.name.clone())
        .unwrap_or_default();

    Ok(EstablishmentDescriptor {
        name: extract_name(raw),
        street: extract_street(raw),
        neighborhood,
        city,
        state: extract_state(raw),
        category,
        original_address: raw.to_string(),
    })
}

/// Prefix before the first `" - "`, else before the first comma. Accepted
/// only when strictly between 2 and 100 characters long.
fn extract_name(raw: &str) -> String {
    let candidate = if raw.contains(SEGMENT_SEPARATOR) {
        raw.split(SEGMENT_SEPARATOR).next()
    } else if raw.contains(',') {
        raw.split(',').next()
    } else {
        None
    };

    candidate
        .map(str::trim)
        .filter(|name| {
            let len = name.chars().count();
            len > 2 && len < 100
        })
        .map(str::to_string)
        .unwrap_or_default()
}

fn extract_street(raw: &str) -> String {
    let Some(segment) = raw.split(SEGMENT_SEPARATOR).nth(1) else {
        return String::new();
    };
    let street = segment.split(',').next().unwrap_or_default().trim();
    let lower = street.to_lowercase();
    if STREET_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        street.to_string()
    } else {
        String::new()
    }
}

fn extract_state(raw: &str) -> String {
    if !raw.contains(SEGMENT_SEPARATOR) {
        return String::new();
    }
    let last = raw
        .rsplit(SEGMENT_SEPARATOR)
        .next()
        .and_then(|s| s.split(',').next())
        .unwrap_or_default()
        .trim()
        .to_uppercase();
    if STATE_CODES.contains(&last.as_str()) {
        last
    } else {
        String::new()
    }
}

/// Upper-cases the first letter of every space-separated word.
pub(crate) fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `needle` occurs in `haystack` bounded by non-alphanumeric
/// characters (or the string edges) on both sides.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BALADA: &str = "Balada Mix - R. Barata Ribeiro, 111 - Copacabana, Rio de Janeiro - RJ";

    fn parse(raw: &str) -> EstablishmentDescriptor {
        parse_address(raw, &Lexicon::default()).expect("address should parse")
    }

    #[test]
    fn balada_mix_scenario() {
        let d = parse(BALADA);
        assert_eq!(d.name, "Balada Mix");
        assert_eq!(d.neighborhood, "Copacabana");
        assert_eq!(d.city, "Rio De Janeiro");
        assert_eq!(d.category, "");
        assert_eq!(d.street, "R. Barata Ribeiro");
        assert_eq!(d.state, "RJ");
        assert_eq!(d.original_address, BALADA);
    }

    #[test]
    fn empty_and_blank_addresses_are_unparseable() {
        assert_eq!(parse_address("", &Lexicon::default()), Err(AddressUnparseable));
        assert_eq!(parse_address("   \t", &Lexicon::default()), Err(AddressUnparseable));
    }

    #[test]
    fn name_falls_back_to_comma_prefix() {
        let d = parse("Pizzaria Bella, Rua das Flores 10, São Paulo");
        assert_eq!(d.name, "Pizzaria Bella");
        assert_eq!(d.city, "São Paulo");
        assert_eq!(d.category, "restaurante");
        assert_eq!(d.street, "");
    }

    #[test]
    fn short_dash_prefix_does_not_fall_back_to_comma() {
        let d = parse("AB - Rua X, 10, Centro");
        assert_eq!(d.name, "");
        assert_eq!(d.neighborhood, "Centro");
    }

    #[test]
    fn no_separator_means_no_name() {
        let d = parse("Academia Forte Ipanema");
        assert_eq!(d.name, "");
        assert_eq!(d.neighborhood, "Ipanema");
        assert_eq!(d.category, "academia");
    }

    #[test]
    fn first_city_in_list_order_wins() {
        let d = parse("Loja X - Av. Brasil, Rio de Janeiro e São Paulo");
        assert_eq!(d.city, "Rio De Janeiro");
        assert_eq!(d.street, "Av. Brasil");
        assert_eq!(d.category, "loja");
    }

    #[test]
    fn category_keyword_requires_word_boundary() {
        assert!(contains_word("open bar hoje", "bar"));
        assert!(contains_word("bar", "bar"));
        assert!(contains_word("bar-restaurante", "bar"));
        assert!(!contains_word("r. barata ribeiro", "bar"));
        assert!(!contains_word("sambar", "bar"));
        assert!(!contains_word("anything", ""));
    }

    #[test]
    fn accented_words_keep_their_boundaries() {
        assert!(contains_word("salão da ana", "salão"));
        assert!(!contains_word("salãozinho", "salão"));
    }

    #[test]
    fn title_case_handles_multibyte_initials() {
        assert_eq!(title_case("são bernardo do campo"), "São Bernardo Do Campo");
        assert_eq!(title_case("vila olímpia"), "Vila Olímpia");
    }

    #[test]
    fn unknown_state_code_is_ignored() {
        let d = parse("Hotel Sol - Rua A, 1 - Centro - XX");
        assert_eq!(d.state, "");
        assert_eq!(d.category, "hotel");
    }
}
