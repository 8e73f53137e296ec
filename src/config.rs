//! Construction time configuration of the chipset.
use crate::definitions::cpu;

/// Selects between the two historical interpretations of the shift,
/// jump with offset and register block opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// The behaviour most programs written after the 1990s expect.
    Modern,
    /// The behaviour of the original COSMAC VIP interpreter.
    Legacy,
}

impl Default for Compatibility {
    fn default() -> Self {
        Compatibility::Modern
    }
}

impl Compatibility {
    /// 8XY6 / 8XYE copy `VY` into `VX` before shifting.
    pub fn shift_reads_vy(self) -> bool {
        matches!(self, Compatibility::Legacy)
    }

    /// The register BNNN adds to `NNN`.
    pub fn jump_offset_register(self, x: usize) -> usize {
        match self {
            Compatibility::Legacy => 0x0,
            Compatibility::Modern => x,
        }
    }

    /// FX55 / FX65 leave the index register pointing behind the block.
    pub fn block_transfer_moves_index(self) -> bool {
        matches!(self, Compatibility::Legacy)
    }

    /// A short name used by the front end.
    pub fn name(self) -> &'static str {
        match self {
            Compatibility::Modern => "modern",
            Compatibility::Legacy => "legacy",
        }
    }
}

/// The configuration a [`ChipSet`](crate::chip8::ChipSet) is built with. It can not be changed
/// for the lifetime of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub compatibility: Compatibility,
    /// Cycles per second the [`runner`](crate::runner) drives the machine at.
    pub hertz: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compatibility: Compatibility::default(),
            hertz: cpu::HERTZ,
        }
    }
}

impl Config {
    pub fn legacy() -> Self {
        Self {
            compatibility: Compatibility::Legacy,
            ..Self::default()
        }
    }

    pub fn with_hertz(mut self, hertz: u64) -> Self {
        self.hertz = hertz.max(1);
        self
    }

    pub fn is_legacy(&self) -> bool {
        self.compatibility == Compatibility::Legacy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_modern() {
        let config = Config::default();
        assert!(!config.is_legacy());
        assert_eq!(config.hertz, cpu::HERTZ);
    }

    #[test]
    fn test_quirk_decision_points() {
        let modern = Compatibility::Modern;
        let legacy = Compatibility::Legacy;

        assert!(!modern.shift_reads_vy());
        assert!(legacy.shift_reads_vy());

        assert_eq!(modern.jump_offset_register(0xA), 0xA);
        assert_eq!(legacy.jump_offset_register(0xA), 0x0);

        assert!(!modern.block_transfer_moves_index());
        assert!(legacy.block_transfer_moves_index());
    }

    #[test]
    fn test_hertz_is_never_zero() {
        assert_eq!(Config::legacy().with_hertz(0).hertz, 1);
        assert!(Config::legacy().with_hertz(500).is_legacy());
    }
}
