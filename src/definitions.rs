/// The definitions

pub mod memory {
    /// The size of the chipset ram
    pub const SIZE: usize = 0x1000; // 4096

    /// opcode information
    pub mod opcodes {
        /// The step used for calculating the program counter increments
        pub const SIZE: u16 = 2;
    }
}

/// The definitions for the cpu
pub mod cpu {
    /// The starting point for the program
    pub const PROGRAM_COUNTER: usize = 0x0200;
    /// The largest program that fits behind the program counter start.
    pub const PROGRAM_MAX_SIZE: usize = super::memory::SIZE - PROGRAM_COUNTER;
    /// The amount of cycles per second used when nothing else is configured.
    pub const HERTZ: u64 = 60;

    /// The definitions needed for the register
    pub mod register {
        /// The size of the chip set registers
        pub const SIZE: usize = 16;
        /// The last entry of the registers, used as flag register `VF`
        pub const LAST: usize = SIZE - 1;
    }

    /// The stack definitions
    pub mod stack {
        /// The count of nesting entries
        pub const SIZE: usize = 16;
    }

    /// Fx1E sets `VF` once the index register grows past this value.
    pub const INDEX_OVERFLOW: u16 = 1000;
}

/// The display definitions
pub mod display {
    /// The amount of pixels per row
    pub const WIDTH: usize = 64;
    /// The amount of rows
    pub const HEIGHT: usize = 32;
    /// The amount of pixels the display has
    pub const RESOLUTION: usize = WIDTH * HEIGHT;
    /// The amount of pixels a single sprite row covers
    pub const SPRITE_WIDTH: usize = 8;

    /// The fontset information
    pub mod fontset {
        /// Is the location of the beginning to the font in memory
        pub const LOCATION: usize = 0x000;
        /// The amount of bytes a single glyph takes up
        pub const GLYPH_SIZE: usize = 5;
        /// The font set character to be rendered on the screen
        pub const FONTSET: [u8; 80] = [
            0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
            0x20, 0x60, 0x20, 0x20, 0x70, // 1
            0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
            0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
            0x90, 0x90, 0xF0, 0x10, 0x10, // 4
            0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
            0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
            0xF0, 0x10, 0x20, 0x40, 0x40, // 7
            0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
            0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
            0xF0, 0x90, 0xF0, 0x90, 0x90, // A
            0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
            0xF0, 0x80, 0x80, 0x80, 0xF0, // C
            0xE0, 0x90, 0x90, 0x90, 0xE0, // D
            0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
            0xF0, 0x80, 0xF0, 0x80, 0x80, // F
        ];
    }
}

/// The definitions needed for correct keyboard definitions.
pub mod keyboard {
    /// all the different keyboard entries
    pub const SIZE: usize = 16;
    /// The physical key bound to each hex key, indexed by the hex key value.
    pub const LAYOUT: [char; SIZE] = [
        'x', '1', '2', '3', 'q', 'w', 'e', 'a', 's', 'd', 'z', 'c', '4', 'r', 'f', 'v',
    ];

    /// Maps a physical key to its hex key, the lookup is case insensitive.
    ///
    /// # Example
    /// ```rust
    /// # use chip::definitions::keyboard::key_index;
    /// assert_eq!(key_index('X'), Some(0x0));
    /// assert_eq!(key_index('4'), Some(0xC));
    /// assert_eq!(key_index('p'), None);
    /// ```
    pub fn key_index(key: char) -> Option<usize> {
        let key = key.to_ascii_lowercase();
        LAYOUT.iter().position(|&k| k == key)
    }
}
