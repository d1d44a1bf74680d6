//! `PlantUML` text encoding.
//!
//! The server accepts diagram source in the URL as raw DEFLATE data written
//! with a URL-safe base64 variant (`0-9A-Za-z-_`). Trailing partial groups are
//! filled with `0`, so the token length is always a multiple of four.

use std::io::Write;

use base64::Engine;
use base64::alphabet::Alphabet;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::NO_PAD;
use flate2::Compression;
use flate2::write::DeflateEncoder;

const PLANTUML_ALPHABET: Alphabet =
    match Alphabet::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid PlantUML alphabet"),
    };

pub(crate) const PLANTUML_ENGINE: GeneralPurpose = GeneralPurpose::new(&PLANTUML_ALPHABET, NO_PAD);

/// Encode diagram source into a `PlantUML` URL token.
///
/// # Errors
///
/// Returns an error if compression fails.
pub fn encode(code: &str) -> std::io::Result<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(code.as_bytes())?;
    let compressed = encoder.finish()?;

    let mut token = PLANTUML_ENGINE.encode(compressed);
    while token.len() % 4 != 0 {
        token.push('0');
    }
    Ok(token)
}
