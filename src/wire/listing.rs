//! Console-equivalent outputs: the same data the footer carries, printed
//! for a player without a browser.
use crate::afford::{AffordanceRecord, VerbDescriptor, VerbKind, VerbRegistry};

use super::records::WireAffordance;

/// The affordance list in wire shape, one record per line.
pub fn affordances_listing(records: &[AffordanceRecord]) -> Result<String, serde_json::Error> {
    let mut out = String::from("[\n");
    for (i, record) in records.iter().enumerate() {
        out.push_str("  ");
        out.push_str(&serde_json::to_string(&WireAffordance::from_record(record))?);
        if i + 1 < records.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("]\n");
    Ok(out)
}

/// The in-scope object names as a JSON list.
pub fn objects_listing(names: &[String]) -> Result<String, serde_json::Error> {
    Ok(format!("{}\n", serde_json::to_string(names)?))
}

/// Every registered verb with bracketed object slots.
pub fn verb_listing(registry: &VerbRegistry) -> String {
    let mut out = String::from("Verbs supported by this game:\n");
    for verb in registry.iter() {
        out.push_str("* ");
        out.push_str(&verb_usage(verb));
        out.push('\n');
    }
    out
}

/// `Look`, `Get [x]`, `Put [x] in [y]`.
pub fn verb_usage(verb: &VerbDescriptor) -> String {
    match verb.kind {
        VerbKind::Intransitive => verb.name.clone(),
        VerbKind::Travel | VerbKind::Transitive => format!("{} [x]", verb.name),
        VerbKind::Topic | VerbKind::Ditransitive => match &verb.preposition {
            Some(prep) => format!("{} [x] {} [y]", verb.name, prep),
            None => format!("{} [x] [y]", verb.name),
        },
        VerbKind::Indeterminate => format!("{} ...", verb.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_are_listed_with_slots() {
        let registry = VerbRegistry::new(vec![
            VerbDescriptor::new("look", "Look", 1, VerbKind::Intransitive),
            VerbDescriptor::new("take", "Get", 2, VerbKind::Transitive),
            VerbDescriptor::new("put_in", "Put", 3, VerbKind::Ditransitive).with_preposition("in"),
            VerbDescriptor::new("wave", "Wave", 4, VerbKind::Ditransitive),
        ]);
        assert_eq!(
            verb_listing(&registry),
            "Verbs supported by this game:\n* Look\n* Get [x]\n* Put [x] in [y]\n* Wave [x] [y]\n"
        );
    }

    #[test]
    fn empty_listings() {
        assert_eq!(affordances_listing(&[]).unwrap(), "[\n]\n");
        assert_eq!(objects_listing(&[]).unwrap(), "[]\n");
    }
}
