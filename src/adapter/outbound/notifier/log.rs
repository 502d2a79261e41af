use tracing::{info, warn};

use crate::port::{Event, Notifier};

/// Mirrors flow notifications into the tracing log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::Submitted(e) => {
                info!(
                    flow = %e.flow_id,
                    operation = %e.operation,
                    tx = %e.reference,
                    "Transaction Pending"
                );
            }
            Event::Confirmed(e) => {
                info!(
                    flow = %e.flow_id,
                    operation = %e.operation,
                    tx = %e.reference,
                    block = ?e.block_number,
                    explorer = e.explorer_url.as_deref().unwrap_or("-"),
                    "Transaction Successful"
                );
            }
            Event::Failed(e) => {
                warn!(
                    flow = %e.flow_id,
                    operation = %e.operation,
                    tx = %e.reference,
                    reason = %e.reason,
                    "Transaction Failed"
                );
            }
        }
    }
}
