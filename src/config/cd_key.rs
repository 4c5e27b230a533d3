use crate::error::Result;
use log::debug;
use rand::Rng;

/// Registry locations the game reads its CD key from (64-bit view first,
/// then the WOW6432Node view for 32-bit installs).
#[cfg(windows)]
const CD_KEY_REGISTRY_PATHS: [&str; 2] = [
    "SOFTWARE\\Electronic Arts\\Electronic Arts\\Red Alert 3\\ergc",
    "SOFTWARE\\WOW6432Node\\Electronic Arts\\Electronic Arts\\Red Alert 3\\ergc",
];

/// Length of the pseudo-random key the game expects.
const CD_KEY_LENGTH: usize = 20;

/// Generates a fresh pseudo-random hexadecimal CD key.
///
/// The private server does not verify keys; a random one merely satisfies
/// the game's startup check. Generated fresh on every launch attempt.
pub fn generate_cd_key() -> String {
    let mut rng = rand::thread_rng();
    (0..CD_KEY_LENGTH)
        .map(|_| format!("{:X}", rng.gen_range(0..16u8)))
        .collect()
}

/// Writes a freshly generated CD key into the first writable registry
/// location. Best-effort by contract: the caller discards the error.
#[cfg(windows)]
pub fn write_cd_key() -> Result<()> {
    use std::io;

    let key = generate_cd_key();
    let mut last_error: Option<io::Error> = None;
    for path in CD_KEY_REGISTRY_PATHS {
        match write_registry_default_value(path, &key) {
            Ok(()) => {
                debug!("CdKey: wrote key under HKLM\\{}", path);
                return Ok(());
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(crate::error::AppError::Io(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "no registry path accepted the key")
    })))
}

/// No registry off Windows; the game only runs there (or under Wine, where
/// the Windows build of this launcher is the one in play).
#[cfg(not(windows))]
pub fn write_cd_key() -> Result<()> {
    debug!("CdKey: no registry on this platform, skipping key write");
    Ok(())
}

#[cfg(windows)]
fn write_registry_default_value(subkey: &str, value: &str) -> std::io::Result<()> {
    use std::io;
    use windows::core::PCWSTR;
    use windows::Win32::System::Registry::{
        RegCloseKey, RegCreateKeyExW, RegSetValueExW, HKEY, HKEY_LOCAL_MACHINE, KEY_WRITE,
        REG_OPTION_NON_VOLATILE, REG_SZ,
    };

    let subkey_w: Vec<u16> = subkey.encode_utf16().chain(std::iter::once(0)).collect();
    let value_w: Vec<u16> = value.encode_utf16().chain(std::iter::once(0)).collect();
    // REG_SZ payload is the UTF-16 bytes including the terminating NUL.
    let value_bytes: Vec<u8> = value_w.iter().flat_map(|c| c.to_le_bytes()).collect();

    unsafe {
        let mut hkey = HKEY::default();
        RegCreateKeyExW(
            HKEY_LOCAL_MACHINE,
            PCWSTR(subkey_w.as_ptr()),
            None,
            PCWSTR::null(),
            REG_OPTION_NON_VOLATILE,
            KEY_WRITE,
            None,
            &mut hkey,
            None,
        )
        .ok()
        .map_err(|e| io::Error::new(io::ErrorKind::PermissionDenied, e))?;

        let result = RegSetValueExW(hkey, PCWSTR::null(), None, REG_SZ, Some(&value_bytes));
        let _ = RegCloseKey(hkey);
        result
            .ok()
            .map_err(|e| io::Error::new(io::ErrorKind::PermissionDenied, e))?;
    }
    Ok(())
}
