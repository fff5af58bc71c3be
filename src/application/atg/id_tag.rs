//! `idTagDistribution` (spec.md §4.6 "IdTag distribution").

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::domain::atg::IdTagDistribution;

/// Picks an id tag from a fixed list according to the configured strategy.
pub struct IdTagPicker {
    tags: Vec<String>,
    distribution: IdTagDistribution,
    round_robin_cursor: AtomicUsize,
}

impl IdTagPicker {
    pub fn new(tags: Vec<String>, distribution: IdTagDistribution) -> Self {
        Self {
            tags,
            distribution,
            round_robin_cursor: AtomicUsize::new(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn pick(&self, connector_id: u32) -> Option<String> {
        if self.tags.is_empty() {
            return None;
        }
        let index = match self.distribution {
            IdTagDistribution::Random => rand::thread_rng().gen_range(0..self.tags.len()),
            IdTagDistribution::RoundRobin => self.round_robin_cursor.fetch_add(1, Ordering::SeqCst) % self.tags.len(),
            IdTagDistribution::ConnectorAffinity => connector_id as usize % self.tags.len(),
        };
        self.tags.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_cycles_through_every_tag() {
        let picker = IdTagPicker::new(vec!["A".into(), "B".into(), "C".into()], IdTagDistribution::RoundRobin);
        assert_eq!(picker.pick(0), Some("A".to_string()));
        assert_eq!(picker.pick(0), Some("B".to_string()));
        assert_eq!(picker.pick(0), Some("C".to_string()));
        assert_eq!(picker.pick(0), Some("A".to_string()));
    }

    #[test]
    fn connector_affinity_is_deterministic_modulo() {
        let picker = IdTagPicker::new(vec!["A".into(), "B".into()], IdTagDistribution::ConnectorAffinity);
        assert_eq!(picker.pick(2), Some("A".to_string()));
        assert_eq!(picker.pick(3), Some("B".to_string()));
    }

    #[test]
    fn empty_tag_list_yields_none() {
        let picker = IdTagPicker::new(Vec::new(), IdTagDistribution::Random);
        assert_eq!(picker.pick(1), None);
        assert!(picker.is_empty());
    }
}
