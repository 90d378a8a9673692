//! # 读者-写者准入
//!
//! 以会话为粒度：准入在打开时取得，在关闭时归还，读写调用本身不经过这里。
//! 任意多个只读会话可以并存；读写会话独占，与其它任何会话都互斥。
//!
//! 不做写者防饿：只要读者源源不断地加入，等待中的写者就可能一直等下去。

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::AccessMode;

/// 一个文件当前的准入状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    #[default]
    Idle,
    /// 若干只读会话，计数至少为 1
    Shared(usize),
    /// 唯一的读写会话
    Exclusive,
}

#[derive(Debug, Default)]
struct State {
    access: AccessState,
    /// 已解析到该文件、尚未取得准入的打开请求数
    pending: usize,
}

#[derive(Debug, Default)]
pub struct Admission {
    state: Mutex<State>,
    released: Condvar,
}

impl Admission {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一次即将到来的[`Admission::enter`]，使文件在等待期间不会被删除
    pub fn reserve(&self) {
        self.lock().pending += 1;
    }

    /// 阻塞直到按`mode`取得准入，须先[`Admission::reserve`]
    pub fn enter(&self, mode: AccessMode) {
        let mut state = self.lock();
        debug_assert!(state.pending > 0, "enter without reservation");

        loop {
            let next = match (mode, state.access) {
                (AccessMode::ReadOnly, AccessState::Idle) => Some(AccessState::Shared(1)),
                // 后来的读者直接加入读者群
                (AccessMode::ReadOnly, AccessState::Shared(readers)) => {
                    Some(AccessState::Shared(readers + 1))
                }
                (AccessMode::ReadWrite, AccessState::Idle) => Some(AccessState::Exclusive),
                _ => None,
            };

            if let Some(next) = next {
                log::debug!("admission {:?} -> {next:?}", state.access);
                state.access = next;
                state.pending -= 1;
                return;
            }

            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// 归还按`mode`取得的准入
    pub fn leave(&self, mode: AccessMode) {
        let mut state = self.lock();
        let next = match (mode, state.access) {
            (AccessMode::ReadOnly, AccessState::Shared(1)) => AccessState::Idle,
            (AccessMode::ReadOnly, AccessState::Shared(readers)) => {
                AccessState::Shared(readers - 1)
            }
            (AccessMode::ReadWrite, AccessState::Exclusive) => AccessState::Idle,
            (mode, access) => unreachable!("{mode:?} session leaves {access:?}"),
        };

        log::debug!("admission {:?} -> {next:?}", state.access);
        state.access = next;
        if next == AccessState::Idle {
            self.released.notify_all();
        }
    }

    #[inline]
    pub fn access(&self) -> AccessState {
        self.lock().access
    }

    /// 既没有会话，也没有正在等待的打开请求
    pub fn is_idle(&self) -> bool {
        let state = self.lock();
        state.access == AccessState::Idle && state.pending == 0
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
