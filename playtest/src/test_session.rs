use lazy_static::lazy_static;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use tracing::debug;

lazy_static! {
    static ref TEST_SESSION: TestSession = TestSession::new();
}

/// Lets one scenario run at a time, whatever the test harness threading.
pub struct TestSession {
    lock: Arc<(Mutex<bool>, Condvar)>,
}

#[derive(Debug)]
pub struct TestSessionGuard {
    _private: (),
}

impl TestSession {
    fn new() -> Self {
        Self {
            lock: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn enter() -> TestSessionGuard {
        TEST_SESSION.enter_test();
        TestSessionGuard { _private: () }
    }

    fn enter_test(&self) {
        let (lock, cond) = &*self.lock.clone();
        let mut is_test_running = cond
            .wait_while(
                lock.lock().unwrap_or_else(PoisonError::into_inner),
                |is_test_running| *is_test_running,
            )
            .unwrap_or_else(PoisonError::into_inner);
        *is_test_running = true;
        debug!("scenario session entered");
    }

    fn exit_test(&self) {
        let (lock, cond) = &*self.lock.clone();
        let mut is_test_running = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *is_test_running = false;

        cond.notify_one();
    }
}

impl Drop for TestSessionGuard {
    fn drop(&mut self) {
        TEST_SESSION.exit_test();
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}
