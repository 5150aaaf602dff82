use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;
use stowage_cp::termination::TerminationCondition;

/// Raised by SIGINT or SIGTERM.
///
/// The loading checker holds the same flag, so a packing model which is being solved when the
/// signal arrives stops as well and the route is reported with an unknown status.
#[derive(Clone, Debug)]
pub(crate) struct OsSignal {
    raised: Arc<AtomicBool>,
}

impl OsSignal {
    pub(crate) fn install() -> OsSignal {
        let raised = Arc::new(AtomicBool::new(false));

        for signal in [SIGINT, SIGTERM] {
            let _ = signal_hook::flag::register(signal, Arc::clone(&raised))
                .expect("the stowage binary can always register its signal handlers");
        }

        OsSignal { raised }
    }

    /// The flag to hand to [`stowage_loading::LoadingChecker::set_interrupt`].
    pub(crate) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.raised)
    }
}

impl TerminationCondition for OsSignal {
    fn should_stop(&mut self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }
}
