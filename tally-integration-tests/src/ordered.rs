//! Registration order tests
//!
//! Cases run strictly in the order they were registered, one after another.

use std::sync::atomic::{AtomicUsize, Ordering};
use tally::{check_eq, Registry};

// Global counter for tracking execution order
static ORDER_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn register(registry: &mut Registry) {
    registry
        .suite("ordered")
        .add("step_1_init", || {
            let val = ORDER_COUNTER.fetch_add(1, Ordering::SeqCst);
            check_eq!(0, val, "step_1_init should run first");
            Ok(())
        })
        .add("step_2_setup", || {
            let val = ORDER_COUNTER.fetch_add(1, Ordering::SeqCst);
            check_eq!(1, val, "step_2_setup should run second");
            Ok(())
        })
        .add("step_3_verify", || {
            let val = ORDER_COUNTER.fetch_add(1, Ordering::SeqCst);
            check_eq!(2, val, "step_3_verify should run third");
            Ok(())
        });
}
