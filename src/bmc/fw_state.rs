//! Firmware update state machine.
//!
//! Each device owns one [`FwStateLock`]. Update orchestration moves it out of
//! [`FwState::Normal`] with [`FwStateLock::enter`] and back with
//! [`FwStateLock::exit`]; register accessors hold the shared side of the same
//! lock for the duration of a handshake register transaction, so no such
//! transaction can straddle a transition.

use spin::{RwLock, RwLockWriteGuard};

use crate::bmc::BmcError;

/// Firmware update phase of a BMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FwState {
    /// No update in progress.
    #[default]
    Normal,
    /// An image is being prepared; the handshake registers are still usable.
    SecUpdatePrepare,
    /// Secure update owns the handshake registers.
    SecUpdate,
}

impl FwState {
    /// Returns true if handshake registers must not be touched in this state.
    #[inline]
    pub fn gates_handshake(self) -> bool {
        matches!(self, FwState::SecUpdate)
    }
}

/// Reader/writer protected [`FwState`].
#[derive(Debug, Default)]
pub struct FwStateLock {
    state: RwLock<FwState>,
}

impl FwStateLock {
    pub const fn new() -> Self {
        Self {
            state: RwLock::new(FwState::Normal),
        }
    }

    // Announces the writer before waiting, so new readers back off while the
    // in-flight ones drain.
    fn write(&self) -> RwLockWriteGuard<'_, FwState> {
        self.state.upgradeable_read().upgrade()
    }

    /// Moves from `Normal` into `new_state`.
    ///
    /// Re-entering the state that is already active succeeds without change.
    ///
    /// # Errors
    /// * [`BmcError::InvalidArgument`] - if `new_state` is `Normal`
    /// * [`BmcError::Busy`] - if a different update phase is active
    pub fn enter(&self, new_state: FwState) -> Result<(), BmcError> {
        self.transition(new_state).map(|_| ())
    }

    // Returns true if this call left `Normal`.
    fn transition(&self, new_state: FwState) -> Result<bool, BmcError> {
        if new_state == FwState::Normal {
            return Err(BmcError::InvalidArgument);
        }

        let mut state = self.write();
        match *state {
            FwState::Normal => {
                log::debug!("firmware state {:?} -> {:?}", *state, new_state);
                *state = new_state;
                Ok(true)
            }
            current if current == new_state => Ok(false),
            current => {
                log::debug!("firmware state {current:?} blocks {new_state:?}");
                Err(BmcError::Busy)
            }
        }
    }

    /// Returns to `Normal` regardless of the current state.
    pub fn exit(&self) {
        let mut state = self.write();
        if *state != FwState::Normal {
            log::debug!("firmware state {:?} -> Normal", *state);
        }
        *state = FwState::Normal;
    }

    /// Enters `new_state` and returns a guard that exits when dropped.
    ///
    /// If `new_state` was already active, the guard does not own the phase and
    /// dropping it leaves the state alone; see [`FwStateGuard::owns_state`].
    pub fn enter_guarded(&self, new_state: FwState) -> Result<FwStateGuard<'_>, BmcError> {
        let owns = self.transition(new_state)?;
        Ok(FwStateGuard { lock: self, owns })
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> FwState {
        *self.state.read()
    }

    /// Runs `f` with the state held shared.
    ///
    /// Transitions wait until `f` returns.
    pub fn with_shared<R>(&self, f: impl FnOnce(FwState) -> R) -> R {
        let state = self.state.read();
        f(*state)
    }
}

/// Keeps a firmware update phase active until dropped.
#[must_use = "dropping the guard immediately returns the device to Normal"]
pub struct FwStateGuard<'a> {
    lock: &'a FwStateLock,
    owns: bool,
}

impl FwStateGuard<'_> {
    /// Returns true if dropping the guard returns the device to `Normal`.
    pub fn owns_state(&self) -> bool {
        self.owns
    }
}

impl core::fmt::Debug for FwStateGuard<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FwStateGuard")
            .field("owns", &self.owns)
            .finish_non_exhaustive()
    }
}

impl Drop for FwStateGuard<'_> {
    fn drop(&mut self) {
        if self.owns {
            self.lock.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_normal() {
        assert_eq!(FwStateLock::new().current(), FwState::Normal);
    }

    #[test]
    fn entering_normal_is_rejected() {
        let lock = FwStateLock::new();
        assert_eq!(lock.enter(FwState::Normal), Err(BmcError::InvalidArgument));

        lock.enter(FwState::SecUpdate).unwrap();
        assert_eq!(lock.enter(FwState::Normal), Err(BmcError::InvalidArgument));
        assert_eq!(lock.current(), FwState::SecUpdate);
    }

    #[test]
    fn reentering_same_state_is_idempotent() {
        let lock = FwStateLock::new();
        assert_eq!(lock.enter(FwState::SecUpdate), Ok(()));
        assert_eq!(lock.enter(FwState::SecUpdate), Ok(()));
        assert_eq!(lock.current(), FwState::SecUpdate);
    }

    #[test]
    fn conflicting_phase_is_busy_and_keeps_state() {
        let lock = FwStateLock::new();
        lock.enter(FwState::SecUpdatePrepare).unwrap();

        assert_eq!(lock.enter(FwState::SecUpdate), Err(BmcError::Busy));
        assert_eq!(lock.current(), FwState::SecUpdatePrepare);
    }

    #[test]
    fn exit_allows_reentry() {
        let lock = FwStateLock::new();
        lock.enter(FwState::SecUpdate).unwrap();
        lock.exit();
        assert_eq!(lock.current(), FwState::Normal);

        lock.enter(FwState::SecUpdate).unwrap();
        assert_eq!(lock.current(), FwState::SecUpdate);
    }

    #[test]
    fn exit_from_normal_is_harmless() {
        let lock = FwStateLock::new();
        lock.exit();
        lock.exit();
        assert_eq!(lock.current(), FwState::Normal);
    }

    #[test]
    fn guard_exits_on_drop() {
        let lock = FwStateLock::new();
        {
            let _guard = lock.enter_guarded(FwState::SecUpdate).unwrap();
            assert_eq!(lock.current(), FwState::SecUpdate);
            assert_eq!(lock.enter(FwState::SecUpdatePrepare), Err(BmcError::Busy));
        }
        assert_eq!(lock.current(), FwState::Normal);
    }

    #[test]
    fn failed_guarded_enter_leaves_state_alone() {
        let lock = FwStateLock::new();
        lock.enter(FwState::SecUpdatePrepare).unwrap();

        assert_eq!(
            lock.enter_guarded(FwState::SecUpdate).unwrap_err(),
            BmcError::Busy
        );
        assert_eq!(lock.current(), FwState::SecUpdatePrepare);
    }

    #[test]
    fn guard_over_active_state_does_not_exit() {
        let lock = FwStateLock::new();
        lock.enter(FwState::SecUpdate).unwrap();
        {
            let guard = lock.enter_guarded(FwState::SecUpdate).unwrap();
            assert!(!guard.owns_state());
        }
        assert_eq!(lock.current(), FwState::SecUpdate);

        lock.exit();
        let guard = lock.enter_guarded(FwState::SecUpdate).unwrap();
        assert!(guard.owns_state());
        drop(guard);
        assert_eq!(lock.current(), FwState::Normal);
    }

    #[test]
    fn only_sec_update_gates_handshake() {
        assert!(!FwState::Normal.gates_handshake());
        assert!(!FwState::SecUpdatePrepare.gates_handshake());
        assert!(FwState::SecUpdate.gates_handshake());
    }
}
