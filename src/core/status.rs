use std::fmt::{Display, Formatter};

/// Charger state as far as the decision is concerned.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum ChargerStatus {
    Unknown,
    Waiting,
    WaitingForCar,
    Charging,
    Ready,
    Paused,
    Scheduled,
    Discharging,
    Error,
    Disconnected,
    Locked,
    LockedWaiting,
    Updating,
}

impl ChargerStatus {
    /// Map the vendor status code.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            164 | 180 | 183..=189 => Self::Waiting,
            181 => Self::WaitingForCar,
            193..=195 => Self::Charging,
            161 | 162 => Self::Ready,
            178 | 182 => Self::Paused,
            177 | 179 => Self::Scheduled,
            196 => Self::Discharging,
            14 | 15 => Self::Error,
            0 | 163 => Self::Disconnected,
            165 | 209 => Self::Locked,
            210 => Self::LockedWaiting,
            166 => Self::Updating,
            _ => Self::Unknown,
        }
    }
}

impl Display for ChargerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Waiting => write!(f, "Waiting"),
            Self::WaitingForCar => write!(f, "Waiting for car"),
            Self::Charging => write!(f, "Charging"),
            Self::Ready => write!(f, "Ready"),
            Self::Paused => write!(f, "Paused"),
            Self::Scheduled => write!(f, "Scheduled"),
            Self::Discharging => write!(f, "Discharging"),
            Self::Error => write!(f, "Error"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Locked => write!(f, "Locked"),
            Self::LockedWaiting => write!(f, "Locked, waiting"),
            Self::Updating => write!(f, "Updating"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(ChargerStatus::from_code(164), ChargerStatus::Waiting);
        assert_eq!(ChargerStatus::from_code(189), ChargerStatus::Waiting);
        assert_eq!(ChargerStatus::from_code(181), ChargerStatus::WaitingForCar);
        assert_eq!(ChargerStatus::from_code(194), ChargerStatus::Charging);
        assert_eq!(ChargerStatus::from_code(182), ChargerStatus::Paused);
        assert_eq!(ChargerStatus::from_code(179), ChargerStatus::Scheduled);
        assert_eq!(ChargerStatus::from_code(0), ChargerStatus::Disconnected);
        assert_eq!(ChargerStatus::from_code(165), ChargerStatus::Locked);
        assert_eq!(ChargerStatus::from_code(209), ChargerStatus::Locked);
        assert_eq!(ChargerStatus::from_code(210), ChargerStatus::LockedWaiting);
        assert_eq!(ChargerStatus::from_code(166), ChargerStatus::Updating);
    }

    #[test]
    fn test_unmapped_code_is_unknown() {
        assert_eq!(ChargerStatus::from_code(-1), ChargerStatus::Unknown);
        assert_eq!(ChargerStatus::from_code(190), ChargerStatus::Unknown);
        assert_eq!(ChargerStatus::from_code(1000), ChargerStatus::Unknown);
    }
}
