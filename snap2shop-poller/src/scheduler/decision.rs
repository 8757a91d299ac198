//! Continue-or-stop rule applied after every fetch

use snap2shop_core::domain::index::Status;

/// What the session does after a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Schedule another fetch after the poll interval
    Continue,
    /// End the session
    Stop,
}

/// Decides whether a polling session continues.
///
/// `fetched` is `None` when the fetch failed; failures never end a session.
/// `initial` marks the first successful fetch of a session: it only keeps
/// the session alive when the job is pending (anything but `done`, `error`
/// or `no_jobs`) or when `force` is set. After that the session runs until
/// a terminal status is observed.
pub fn next_step(fetched: Option<&Status>, initial: bool, force: bool) -> Step {
    let Some(status) = fetched else {
        return Step::Continue;
    };

    if initial {
        if force || !(status.is_terminal() || *status == Status::NoJobs) {
            Step::Continue
        } else {
            Step::Stop
        }
    } else if status.is_terminal() {
        Step::Stop
    } else {
        Step::Continue
    }
}
