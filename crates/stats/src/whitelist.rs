/// Wikidata type IDs with a display name in the entity tables.
pub const WHITELIST: &[(&str, &str)] = &[
    ("Q18336849", "item with given name property"),
    ("Q27096213", "geographic entity"),
    ("Q483394", "genre"),
    ("Q43229", "organization"),
    ("Q17376908", "languoid"),
    ("Q17537576", "creative work"),
    ("Q2424752", "product"),
    ("Q431289", "brand"),
    ("Q43460564", "chemical entity"),
    ("Q16521", "taxon"),
    ("Q9174", "religion"),
    ("Q7257", "ideology"),
    ("Q4164871", "position"),
    ("Q12737077", "occupation"),
    ("Q216353", "title"),
    ("Q11862829", "academic discipline"),
    ("Q21070598", "narrative entity"),
    ("Q618779", "award"),
    ("Q12136", "disease"),
    ("Q4392985", "religious identity"),
    ("Q11514315", "historical period"),
    ("Q1656682", "event"),
    ("Q180684", "conflict"),
    ("Q373899", "record chart"),
    ("Q194465", "annexation"),
    ("Q381072", "crisis"),
    ("Q22222786", "government program"),
    ("Q41710", "ethnic group"),
    ("Q18603729", "dissolution of an administrative territorial entity"),
];

pub fn type_name(type_id: &str) -> Option<&'static str> {
    WHITELIST
        .iter()
        .find(|(id, _)| *id == type_id)
        .map(|(_, name)| *name)
}

/// Display name of `type_id`, or the ID itself when it is not whitelisted.
pub fn resolve_type(type_id: &str) -> &str {
    type_name(type_id).unwrap_or(type_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(resolve_type("Q12136"), "disease");
        assert_eq!(resolve_type("Q5"), "Q5");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<&str> = WHITELIST.iter().map(|(id, _)| *id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), WHITELIST.len());
    }
}
