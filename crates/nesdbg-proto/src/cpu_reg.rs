use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// 6502 registers addressable by `CpuRegRd` / `CpuRegWr`.
///
/// The program counter is exposed as two 8-bit halves.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, EnumString, IntoStaticStr, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CpuRegister {
    /// Program counter, low byte.
    Pcl = 0x00,
    /// Program counter, high byte.
    Pch = 0x01,
    /// Accumulator.
    #[strum(to_string = "ac", serialize = "a")]
    Ac = 0x02,
    X = 0x03,
    Y = 0x04,
    /// Processor status.
    P = 0x05,
    /// Stack pointer.
    S = 0x06,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn register_ids_are_locked() {
        let ids: Vec<u8> = CpuRegister::iter().map(|r| r as u8).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(CpuRegister::from_repr(7), None);
    }

    #[test]
    fn register_names_parse() {
        assert_eq!("pcl".parse::<CpuRegister>(), Ok(CpuRegister::Pcl));
        assert_eq!("A".parse::<CpuRegister>(), Ok(CpuRegister::Ac));
        assert_eq!("ac".parse::<CpuRegister>(), Ok(CpuRegister::Ac));
        assert_eq!("S".parse::<CpuRegister>(), Ok(CpuRegister::S));
        assert_eq!(CpuRegister::Ac.to_string(), "ac");
        assert!("pc".parse::<CpuRegister>().is_err());
    }
}
