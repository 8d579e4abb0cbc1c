//! Photo location decoding and sidecar path derivation.

use std::path::{Path, PathBuf};

use crate::db::Photo;

const FILE_SCHEME: &str = "file://";

/// Decode an F-Spot directory URI into a filesystem path.
///
/// Each `%XX` escape stands for the character U+00XX and raw characters are
/// kept as they are. If every resulting character fits in Latin-1, those
/// bytes are decoded as UTF-8. This also repairs URIs that were stored with
/// raw double-encoded text such as `MÃ¼nchen`.
///
/// Otherwise the escapes are read as bytes of the raw UTF-8 text. If that is
/// not valid UTF-8 either, the undecoded bytes become the path on Unix, so
/// files with non-UTF-8 names are still found.
pub fn decode_uri_path(uri: &str) -> PathBuf {
    let raw = uri.strip_prefix(FILE_SCHEME).unwrap_or(uri);

    if let Some(latin1) = latin1_bytes(raw) {
        if let Ok(path) = String::from_utf8(latin1) {
            return PathBuf::from(path);
        }
    }

    match String::from_utf8(percent_decode(raw)) {
        Ok(path) => PathBuf::from(path),
        Err(e) => path_from_bytes(e.into_bytes()),
    }
}

/// Absolute path of the photo file on disk.
pub fn photo_path(photo: &Photo) -> PathBuf {
    decode_uri_path(&photo.base_uri).join(&photo.filename)
}

/// Sidecar path for a photo: the full file name plus `.<extension>`.
pub fn sidecar_path(photo_path: &Path, extension: &str) -> PathBuf {
    let mut path = photo_path.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(bytes.into_iter().map(char::from).collect::<String>())
}

/// The unescaped text as Latin-1 bytes, or `None` if it holds a character
/// above U+00FF.
fn latin1_bytes(input: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '%' {
            if let Some(b) = escape_at(input.as_bytes(), i) {
                out.push(b);
                chars.next();
                chars.next();
                continue;
            }
        }
        out.push(u8::try_from(u32::from(c)).ok()?);
    }
    Some(out)
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if let Some(b) = escape_at(bytes, i) {
            out.push(b);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Value of a `%XX` escape starting at `i`.
fn escape_at(bytes: &[u8], i: usize) -> Option<u8> {
    if bytes[i] != b'%' || i + 2 >= bytes.len() {
        return None;
    }
    Some(hex_value(bytes[i + 1])? << 4 | hex_value(bytes[i + 2])?)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
