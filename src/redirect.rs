/// Forwarding from a referrer page to the pending target
use crate::debug_log::DebugLog;
use crate::error::Result;
use crate::host::ForwardingPage;
use crate::scheduler::{Scheduler, TaskId};
use crate::site::SiteRecord;

/// Where the script was injected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pub hostname: String,
    pub path: String,
}

impl PageLocation {
    pub fn new(hostname: &str, path: &str) -> Self {
        PageLocation {
            hostname: hostname.to_string(),
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page is not one of the registry sites
    Unmatched,
    /// A registry site visited directly, nothing pending
    DirectVisit(SiteRecord),
    /// Navigation to `target` is scheduled as `task`
    Forwarding {
        site: SiteRecord,
        target: String,
        task: TaskId,
    },
}

/// Relax the referrer policy, then click a hidden link to `target` after `delay_ms`
pub fn forward(
    page: &dyn ForwardingPage,
    scheduler: &dyn Scheduler,
    log: &DebugLog,
    policy: &str,
    target: &str,
    delay_ms: u32,
) -> Result<TaskId> {
    page.insert_referrer_policy(policy)?;
    log.log(format!("Added referrer meta tag ({})", policy));

    let link = page.attach_hidden_link(target)?;
    log.log("Created hidden link");

    let log = log.clone();
    let task = scheduler.schedule(
        delay_ms,
        Box::new(move || match link.activate() {
            Ok(()) => log.log("Triggered link click"),
            Err(e) => log.log(format!("Link click failed: {}", e)),
        }),
    );
    Ok(task)
}
