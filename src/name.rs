/// Types that expose a comparable name.
pub trait HasName {
    fn get_name(&self) -> &str;
}

// Calendars hand out shared patterns
impl<T: HasName + ?Sized> HasName for std::sync::Arc<T> {
    fn get_name(&self) -> &str {
        (**self).get_name()
    }
}

/// Sorting helpers for slices of `T: HasName`.
pub trait SortByName {
    /// Stable, ascending sort by `get_name()`.
    fn sort_by_name(&mut self);
}

impl<T: HasName> SortByName for [T] {
    fn sort_by_name(&mut self) {
        self.sort_by(|a, b| a.get_name().cmp(b.get_name()));
    }
}

impl HasName for crate::schedule::IntradayProfile {
    fn get_name(&self) -> &str {
        self.name()
    }
}

impl HasName for crate::schedule::WeeklyPattern {
    fn get_name(&self) -> &str {
        self.name()
    }
}

impl HasName for crate::schedule::AnnualCalendar {
    fn get_name(&self) -> &str {
        self.name()
    }
}

impl HasName for crate::io::idf::CompactSchedule {
    fn get_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Domain, WeeklyPattern};
    use std::sync::Arc;

    struct Named(String);
    impl HasName for Named {
        fn get_name(&self) -> &str {
            &self.0
        }
    }

    #[test]
    fn test_sort_shared_patterns() {
        let mut patterns: Vec<Arc<WeeklyPattern>> = ["retail", "office", "lab"]
            .into_iter()
            .map(|name| Arc::new(WeeklyPattern::zeros(name, Domain::Real)))
            .collect();
        patterns.as_mut_slice().sort_by_name();
        let names: Vec<&str> = patterns.iter().map(|p| p.get_name()).collect();
        assert_eq!(names, vec!["lab", "office", "retail"]);
    }

    #[test]
    fn test_sort_by_name() {
        let mut items = vec![
            Named("zone_c".to_string()),
            Named("zone_a".to_string()),
            Named("zone_b".to_string()),
        ];
        items.as_mut_slice().sort_by_name();
        assert_eq!(items[0].get_name(), "zone_a");
        assert_eq!(items[1].get_name(), "zone_b");
        assert_eq!(items[2].get_name(), "zone_c");
    }
}
