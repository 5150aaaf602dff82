use crate::containers::IdVec;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::DomainId;

/// For every domain, the propagators which are notified when it changes.
#[derive(Debug, Default)]
pub(crate) struct WatchListManager {
    watchers: IdVec<DomainId, Vec<PropagatorId>>,
}

impl WatchListManager {
    pub(crate) fn watch(&mut self, domain: DomainId, propagator: PropagatorId) {
        self.watchers.grow_to(domain, vec![]);

        let watchers = &mut self.watchers[domain];
        if !watchers.contains(&propagator) {
            watchers.push(propagator);
        }
    }

    pub(crate) fn get_watchers(&self, domain: DomainId) -> &[PropagatorId] {
        if domain.id as usize >= self.watchers.len() {
            return &[];
        }

        &self.watchers[domain]
    }
}
