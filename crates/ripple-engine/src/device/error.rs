use std::fmt;

/// What the frame driver should do after a surface acquisition error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; drawing resumes next frame.
    Reconfigured,
    /// Transient error; drop this frame.
    SkipFrame,
    /// Unrecoverable (commonly OOM); the session exits.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}

impl fmt::Display for SurfaceErrorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SurfaceErrorAction::Reconfigured => "reconfigured",
            SurfaceErrorAction::SkipFrame => "skip frame",
            SurfaceErrorAction::Fatal => "fatal",
        };
        f.write_str(s)
    }
}
