#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// One kind per auth call; at most one of each is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    AdminLogin,
    PinLogin,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in `LoginState`, mutated only by the reducer).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    /// Clears the task if `id` is the active one. A `false` return means the
    /// completion is stale and must be dropped.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tasks {
    pub admin_login: TaskState,
    pub pin_login: TaskState,
    pub forgot_password: TaskState,
    pub verify_otp: TaskState,
    pub reset_password: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::AdminLogin => &self.admin_login,
            TaskKind::PinLogin => &self.pin_login,
            TaskKind::ForgotPassword => &self.forgot_password,
            TaskKind::VerifyOtp => &self.verify_otp,
            TaskKind::ResetPassword => &self.reset_password,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::AdminLogin => &mut self.admin_login,
            TaskKind::PinLogin => &mut self.pin_login,
            TaskKind::ForgotPassword => &mut self.forgot_password,
            TaskKind::VerifyOtp => &mut self.verify_otp,
            TaskKind::ResetPassword => &mut self.reset_password,
        }
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
