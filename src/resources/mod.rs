use std::{fs, path::Path};

use crate::{definitions::cpu, RomError};

#[derive(Clone, Debug)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw program, it will be copied as is to the start of the program memory
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data, programs that do not fit into
    /// memory are rejected.
    ///
    /// # Example
    /// ```rust
    /// # use chip::resources::Rom;
    /// let rom = Rom::new("jump", vec![0x12, 0x00]).expect("fits into memory");
    /// assert_eq!(rom.get_data(), &[0x12, 0x00]);
    /// assert!(Rom::new("huge", vec![0; 0x1000]).is_err());
    /// ```
    pub fn new(name: &str, data: Vec<u8>) -> Result<Self, RomError> {
        if data.len() > cpu::PROGRAM_MAX_SIZE {
            return Err(RomError::TooLarge {
                len: data.len(),
                max: cpu::PROGRAM_MAX_SIZE,
            });
        }

        Ok(Rom {
            name: name.to_string(),
            data: data.into_boxed_slice(),
        })
    }

    /// Will read the whole file as a program, the file name is used as rom name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_stem()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::debug!("read {} bytes from {}", data.len(), path.display());
        Self::new(&name, data)
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_rom_max_size() {
        let rom = Rom::new("full", vec![0xAA; cpu::PROGRAM_MAX_SIZE]);
        assert!(rom.is_ok());

        let rom = Rom::new("overflow", vec![0xAA; cpu::PROGRAM_MAX_SIZE + 1]);
        match rom {
            Err(RomError::TooLarge { len, max }) => {
                assert_eq!(len, 0xE01);
                assert_eq!(max, 0xE00);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_rom_from_file() {
        let path = std::env::temp_dir().join(format!("chip8-rom-{}.ch8", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        }

        let rom = Rom::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(rom.get_data(), &[0x00, 0xE0, 0x12, 0x00]);
        assert!(rom.get_name().starts_with("chip8-rom-"));
    }

    #[test]
    fn test_rom_missing_file() {
        let rom = Rom::from_file("/this/path/does/not/exist.ch8");
        assert!(matches!(rom, Err(RomError::Io(_))));
    }
}
