use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerState {
    Running,
    Stopped,
}

impl ContainerState {
    /// Maps LXD's status string; everything but `Running` counts as stopped.
    pub fn from_lxd_status(status: &str) -> Self {
        if status == "Running" {
            Self::Running
        } else {
            Self::Stopped
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
