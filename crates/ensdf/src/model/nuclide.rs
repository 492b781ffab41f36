// standard library
use std::collections::BTreeMap;

// nscheme modules
use nscheme_utils::{f, NearestExt};

// internal modules
use crate::model::{values, Level, Transition, TransitionKey};
use crate::nuclide::NuclideId;
use crate::value::{Energy, HalfLife};

// external crates
use serde::Serialize;

/// A nuclide with its levels and the transitions between them
///
/// Levels and transitions live in maps keyed by energy. Transitions refer to
/// their levels by key, and levels keep the keys of the transitions
/// connected to them, so there is no ownership between the two.
#[derive(Debug, Clone, Serialize)]
pub struct Nuclide {
    id: NuclideId,
    #[serde(serialize_with = "values")]
    levels: BTreeMap<Energy, Level>,
    #[serde(serialize_with = "values")]
    transitions: BTreeMap<TransitionKey, Transition>,
}

impl Nuclide {
    /// Nuclide without any levels
    pub fn new(id: NuclideId) -> Self {
        Self {
            id,
            levels: BTreeMap::new(),
            transitions: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NuclideId {
        self.id
    }

    /// All levels by energy
    pub fn levels(&self) -> &BTreeMap<Energy, Level> {
        &self.levels
    }

    /// All transitions by key
    pub fn transitions(&self) -> &BTreeMap<TransitionKey, Transition> {
        &self.transitions
    }

    /// The level at exactly this energy
    pub fn level(&self, energy: &Energy) -> Option<&Level> {
        self.levels.get(energy)
    }

    pub(crate) fn level_mut(&mut self, energy: &Energy) -> Option<&mut Level> {
        self.levels.get_mut(energy)
    }

    /// The transition with this key
    pub fn transition(&self, key: &TransitionKey) -> Option<&Transition> {
        self.transitions.get(key)
    }

    /// Half-lives of the ground state and any isomers, lowest level first
    pub fn half_lives(&self) -> Vec<&HalfLife> {
        self.levels
            .values()
            .filter(|l| l.is_long_lived() && l.half_life.is_valid())
            .map(|l| &l.half_life)
            .collect()
    }

    /// Transitions not linked at both ends
    pub fn orphans(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values().filter(|t| !t.is_placed())
    }

    /// Add a level, `false` if one already exists at the same energy
    ///
    /// The existing level is kept and the new one discarded.
    pub fn add_level(&mut self, level: Level) -> bool {
        if self.levels.contains_key(&level.energy) {
            return false;
        }
        self.levels.insert(level.energy, level);
        true
    }

    /// The level a transition of `gamma` from `from` most likely ends on
    ///
    /// This is the level nearest to `from - gamma` among those strictly
    /// below `from` with the same offset label, ties going to the lower one.
    pub fn lower_level(&self, from: &Energy, gamma: &Energy) -> Option<Energy> {
        let target = *from - *gamma;
        let candidates = self
            .levels
            .range(..*from)
            .filter(|(e, _)| e.offset() == target.offset())
            .map(|(e, _)| (*e, ()))
            .collect::<BTreeMap<Energy, ()>>();

        candidates
            .nearest_key(&target, |a, b| a.distance(b))
            .copied()
    }

    /// Add a transition and link it to its levels
    ///
    /// Ends that do not key an existing level are cleared so the transition
    /// is kept as an orphan rather than pointing nowhere. Returns `None` if a
    /// transition with the same key is already present, the first is kept.
    pub fn register_transition(&mut self, mut transition: Transition) -> Option<TransitionKey> {
        transition.from = transition.from.filter(|e| self.levels.contains_key(e));
        transition.to = transition.to.filter(|e| self.levels.contains_key(e));

        let key = transition.key();
        if self.transitions.contains_key(&key) {
            return None;
        }

        if let Some(level) = transition.from.and_then(|e| self.levels.get_mut(&e)) {
            level.depopulating.insert(key);
        }
        if let Some(level) = transition.to.and_then(|e| self.levels.get_mut(&e)) {
            level.populating.insert(key);
        }

        self.transitions.insert(key, transition);
        Some(key)
    }

    /// Link transitions added before the level they end on existed
    ///
    /// Returns the number of transitions linked.
    pub fn resolve_dangling(&mut self) -> usize {
        let dangling = self
            .transitions
            .iter()
            .filter(|(_, t)| t.to.is_none())
            .filter_map(|(k, t)| t.from.map(|from| (*k, from, t.energy)))
            .collect::<Vec<(TransitionKey, Energy, Energy)>>();

        let mut linked = 0;
        for (key, from, gamma) in dangling {
            let Some(to) = self.lower_level(&from, &gamma) else {
                continue;
            };

            if let Some(transition) = self.transitions.get_mut(&key) {
                transition.to = Some(to);
            }
            if let Some(level) = self.levels.get_mut(&to) {
                level.populating.insert(key);
            }
            linked += 1;
        }

        linked
    }
}

impl std::fmt::Display for Nuclide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Nuclide {}\n", self.id);
        s += &f!("  Levels           {}\n", self.levels.len());
        s += &f!("  Transitions      {}\n", self.transitions.len());
        s += &f!("  Orphans          {}", self.orphans().count());
        for half_life in self.half_lives() {
            s += &f!("\n  Half life        {half_life}");
        }
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gadolinium() -> Nuclide {
        let mut nuclide = Nuclide::new(NuclideId::new(64, 88));
        for kev in [0.0, 344.2789, 615.399, 1109.2] {
            nuclide.add_level(Level::new(Energy::exact(kev)));
        }
        nuclide
    }

    fn gamma(kev: f64, from: f64) -> Transition {
        Transition {
            energy: Energy::exact(kev),
            from: Some(Energy::exact(from)),
            ..Default::default()
        }
    }

    #[test]
    fn lower_level_search() {
        let nuclide = gadolinium();
        let from = Energy::exact(1109.2);

        let to = nuclide.lower_level(&from, &Energy::exact(764.9)).unwrap();
        assert_eq!(to.kev(), 344.2789);

        // never the level itself
        let to = nuclide.lower_level(&from, &Energy::exact(1.0)).unwrap();
        assert_eq!(to.kev(), 615.399);

        assert!(nuclide.lower_level(&Energy::exact(0.0), &Energy::exact(1.0)).is_none());
    }

    #[test]
    fn registration_links_both_ends() {
        let mut nuclide = gadolinium();
        let mut transition = gamma(344.2785, 344.2789);
        transition.to = Some(Energy::exact(0.0));

        let key = nuclide.register_transition(transition.clone()).unwrap();
        assert!(nuclide.level(&Energy::exact(0.0)).unwrap().populating.contains(&key));
        assert!(nuclide
            .level(&Energy::exact(344.2789))
            .unwrap()
            .depopulating
            .contains(&key));

        // same key twice keeps the first
        assert!(nuclide.register_transition(transition).is_none());
        assert_eq!(nuclide.transitions().len(), 1);
    }

    #[test]
    fn unknown_levels_make_orphans() {
        let mut nuclide = gadolinium();
        let mut transition = gamma(100.0, 2000.0);
        transition.to = Some(Energy::exact(1900.0));

        let key = nuclide.register_transition(transition).unwrap();
        assert_eq!(key.from, None);
        assert_eq!(nuclide.orphans().count(), 1);
    }

    #[test]
    fn dangling_resolution() {
        let mut nuclide = Nuclide::new(NuclideId::new(64, 88));
        nuclide.add_level(Level::new(Energy::exact(344.2789)));

        // registered before the ground state exists
        let key = nuclide.register_transition(gamma(344.2785, 344.2789)).unwrap();
        assert!(nuclide.transition(&key).unwrap().to.is_none());

        nuclide.add_level(Level::new(Energy::exact(0.0)));
        assert_eq!(nuclide.resolve_dangling(), 1);
        assert_eq!(nuclide.transition(&key).unwrap().to, Some(Energy::exact(0.0)));
        assert_eq!(nuclide.orphans().count(), 0);
    }
}
