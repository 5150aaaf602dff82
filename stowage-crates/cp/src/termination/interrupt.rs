use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers once a shared flag is raised, e.g. by another search
/// thread which already reached a conclusion or by an OS signal handler.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Interrupt { flag }
    }

    /// The flag observed by this condition.
    pub fn flag(&self) -> &Arc<AtomicBool> {
        &self.flag
    }

    pub fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl TerminationCondition for Interrupt {
    fn should_stop(&mut self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raising_a_clone_stops_the_original() {
        let mut interrupt = Interrupt::default();
        let other = interrupt.clone();

        assert!(!interrupt.should_stop());
        other.raise();
        assert!(interrupt.should_stop());
    }
}
