use adscout_core::{EstablishmentDescriptor, MatchStrategy};

/// One query to run against the ad source, tagged with the rule that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStrategy {
    pub kind: MatchStrategy,
    pub query: String,
}

/// Builds the ordered query list for a descriptor. A strategy is emitted only
/// when every field it combines is non-empty; an empty list is valid.
#[must_use]
pub fn plan_strategies(target: &EstablishmentDescriptor) -> Vec<SearchStrategy> {
    let name = target.name.as_str();
    let city = target.city.as_str();
    let pairs: [(MatchStrategy, &[&str]); 4] = [
        (MatchStrategy::NameCity, &[name, city]),
        (
            MatchStrategy::NameNeighborhood,
            &[name, target.neighborhood.as_str()],
        ),
        (MatchStrategy::NameOnly, &[name]),
        (MatchStrategy::CategoryCity, &[target.category.as_str(), city]),
    ];

    pairs
        .into_iter()
        .filter(|(_, fields)| fields.iter().all(|f| !f.is_empty()))
        .map(|(kind, fields)| SearchStrategy {
            kind,
            query: fields.join(" "),
        })
        .collect()
}
