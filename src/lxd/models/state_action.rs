use crate::lxd::{LxdError, LxdResult};
use std::fmt;
use std::str::FromStr;

/// Actions accepted by `PUT /containers/<name>/state`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LxdStateAction {
    Stop,
    Start,
    Restart,
    Freeze,
    Unfreeze,
}

impl LxdStateAction {
    pub const ALL: [Self; 5] = [
        Self::Stop,
        Self::Start,
        Self::Restart,
        Self::Freeze,
        Self::Unfreeze,
    ];

    pub const TIMEOUT: u32 = 30;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Start => "start",
            Self::Restart => "restart",
            Self::Freeze => "freeze",
            Self::Unfreeze => "unfreeze",
        }
    }

    /// Start and restart never force; everything else always does.
    pub fn force(&self) -> bool {
        !matches!(self, Self::Start | Self::Restart)
    }
}

impl FromStr for LxdStateAction {
    type Err = LxdError;

    fn from_str(s: &str) -> LxdResult<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| LxdError::InvalidAction(s.into()))
    }
}

impl fmt::Display for LxdStateAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions as pa;
    use test_case::test_case;

    #[test_case("stop", LxdStateAction::Stop, true)]
    #[test_case("start", LxdStateAction::Start, false)]
    #[test_case("restart", LxdStateAction::Restart, false)]
    #[test_case("freeze", LxdStateAction::Freeze, true)]
    #[test_case("unfreeze", LxdStateAction::Unfreeze, true)]
    fn parse(s: &str, expected: LxdStateAction, force: bool) {
        let actual: LxdStateAction = s.parse().unwrap();

        pa::assert_eq!(expected, actual);
        pa::assert_eq!(force, actual.force());
    }

    #[test_case("pause")]
    #[test_case("Stop")]
    #[test_case("")]
    fn given_unknown_action(s: &str) {
        pa::assert_eq!(
            LxdError::InvalidAction(s.into()),
            s.parse::<LxdStateAction>().unwrap_err()
        );
    }
}
