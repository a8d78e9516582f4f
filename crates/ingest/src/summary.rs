//! Per-class summary of one ingestion run.

use std::fmt;

/// Mapping from class name to the number of successfully loaded samples.
///
/// Entries appear in vocabulary order, and every class of the vocabulary is
/// present: a class that loaded nothing reports `0` rather than being
/// absent. Computed purely from in-memory state; never re-scans disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    counts: Vec<(String, usize)>,
}

impl Summary {
    pub(crate) fn tally<'a>(classes: &[String], labels: impl Iterator<Item = &'a str>) -> Self {
        let mut counts: Vec<(String, usize)> = classes.iter().map(|class| (class.clone(), 0)).collect();
        for label in labels {
            if let Some((_, count)) = counts.iter_mut().find(|(class, _)| class == label) {
                *count += 1;
            }
        }
        Self { counts }
    }

    /// Number of loaded samples for `class`; `0` for unknown classes.
    pub fn count(&self, class: &str) -> usize {
        self.counts.iter().find(|(name, _)| name == class).map_or(0, |(_, count)| *count)
    }

    /// Total samples across all classes.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Iterate `(class, count)` pairs in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(class, count)| (class.as_str(), *count))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (class, count)) in self.counts.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{class}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tally_counts_in_vocabulary_order() {
        let classes = classes(&["Parasitized", "Uninfected"]);
        let labels = ["Uninfected", "Parasitized", "Uninfected"];
        let summary = Summary::tally(&classes, labels.into_iter());
        assert_eq!(summary.count("Parasitized"), 1);
        assert_eq!(summary.count("Uninfected"), 2);
        assert_eq!(summary.total(), 3);
        let order: Vec<_> = summary.iter().map(|(class, _)| class).collect();
        assert_eq!(order, vec!["Parasitized", "Uninfected"]);
    }

    #[test]
    fn test_empty_classes_still_present_at_zero() {
        let classes = classes(&["Parasitized", "Uninfected"]);
        let summary = Summary::tally(&classes, std::iter::empty());
        assert_eq!(summary.count("Parasitized"), 0);
        assert_eq!(summary.count("Uninfected"), 0);
        assert_eq!(summary.iter().count(), 2);
    }

    #[test]
    fn test_display() {
        let classes = classes(&["Parasitized", "Uninfected"]);
        let summary = Summary::tally(&classes, ["Parasitized"].into_iter());
        assert_eq!(summary.to_string(), "Parasitized: 1, Uninfected: 0");
    }
}
