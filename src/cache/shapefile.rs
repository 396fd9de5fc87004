//! Shapefile main-file header (`.shp`, 100 bytes).
//!
//! Only the header is read: the declared file length is compared with the
//! on-disk length to spot a file that is still being written, and the
//! bounding box frames the map. Feature geometry is left to the renderer.

use std::io::Read;
use std::path::Path;

/// Size of the fixed `.shp` header.
pub const HEADER_LEN: usize = 100;

const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;

/// Axis-aligned bounding box in the file's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum x (longitude for geographic data).
    pub xmin: f64,
    /// Minimum y (latitude for geographic data).
    pub ymin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Maximum y.
    pub ymax: f64,
}

impl Bounds {
    /// Center as `(lat, lon)`, i.e. `(y, x)`.
    pub fn center_lat_lon(&self) -> (f64, f64) {
        ((self.ymin + self.ymax) / 2.0, (self.xmin + self.xmax) / 2.0)
    }

    /// Returns `true` if the box lies within longitude/latitude ranges and is not inverted.
    pub fn is_geographic(&self) -> bool {
        let finite = [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.xmin <= self.xmax
            && self.ymin <= self.ymax
            && self.xmin >= -180.0
            && self.xmax <= 180.0
            && self.ymin >= -90.0
            && self.ymax <= 90.0
    }
}

/// Parsed `.shp` header fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapefileHeader {
    /// File length in bytes as declared by the header.
    pub declared_len: u64,
    /// Shape type code (5 = polygon).
    pub shape_type: i32,
    /// Bounding box of all shapes.
    pub bounds: Bounds,
}

/// Parse a header from its first 100 bytes.
///
/// Returns `None` if the file code or version do not match.
pub fn parse_header(bytes: &[u8; HEADER_LEN]) -> Option<ShapefileHeader> {
    let be_i32 = |at: usize| i32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    let le_i32 = |at: usize| i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    let le_f64 = |at: usize| {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[at..at + 8]);
        f64::from_le_bytes(buf)
    };

    if be_i32(0) != FILE_CODE || le_i32(28) != VERSION {
        return None;
    }
    // Length is counted in 16-bit words.
    let words = u64::try_from(be_i32(24)).ok()?;

    Some(ShapefileHeader {
        declared_len: words * 2,
        shape_type: le_i32(32),
        bounds: Bounds {
            xmin: le_f64(36),
            ymin: le_f64(44),
            xmax: le_f64(52),
            ymax: le_f64(60),
        },
    })
}

/// Read and parse the header of the file at `path`.
///
/// Returns `None` if the file is shorter than a header or the header is not
/// a shapefile header.
pub fn read_header(path: &Path) -> std::io::Result<Option<ShapefileHeader>> {
    let mut file = std::fs::File::open(path)?;
    read_header_from(&mut file)
}

/// Read and parse a header from the start of `reader`.
pub fn read_header_from(reader: &mut impl Read) -> std::io::Result<Option<ShapefileHeader>> {
    let mut buf = [0u8; HEADER_LEN];
    match reader.read_exact(&mut buf) {
        Ok(()) => Ok(parse_header(&buf)),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

/// Returns `true` if `reader` starts with a valid header whose declared
/// length equals `len`.
///
/// `len` must describe the same open file the header is read from.
pub fn is_complete(reader: &mut impl Read, len: u64) -> bool {
    match read_header_from(reader) {
        Ok(Some(header)) => header.declared_len == len,
        _ => false,
    }
}

/// Build a header for a file of `len` bytes. Test fixture helper.
#[cfg(test)]
pub(crate) fn encode_header(len: u64, bounds: Bounds) -> [u8; HEADER_LEN] {
    let mut buf = [0u8; HEADER_LEN];
    buf[0..4].copy_from_slice(&FILE_CODE.to_be_bytes());
    let words = i32::try_from(len / 2).unwrap_or(i32::MAX);
    buf[24..28].copy_from_slice(&words.to_be_bytes());
    buf[28..32].copy_from_slice(&VERSION.to_le_bytes());
    buf[32..36].copy_from_slice(&5i32.to_le_bytes());
    buf[36..44].copy_from_slice(&bounds.xmin.to_le_bytes());
    buf[44..52].copy_from_slice(&bounds.ymin.to_le_bytes());
    buf[52..60].copy_from_slice(&bounds.xmax.to_le_bytes());
    buf[60..68].copy_from_slice(&bounds.ymax.to_le_bytes());
    buf
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const CONUS: Bounds = Bounds {
        xmin: -125.0,
        ymin: 24.0,
        xmax: -66.0,
        ymax: 50.0,
    };

    #[test]
    fn header_round_trips_through_parser() {
        let header = parse_header(&encode_header(240, CONUS)).expect("valid header");
        assert_eq!(header.declared_len, 240);
        assert_eq!(header.shape_type, 5);
        assert_eq!(header.bounds, CONUS);
    }

    #[test]
    fn wrong_file_code_is_rejected() {
        let mut bytes = encode_header(100, CONUS);
        bytes[3] = 0;
        assert!(parse_header(&bytes).is_none());
    }

    #[test]
    fn short_file_has_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1_short.shp");
        std::fs::write(&path, [0u8; 40]).unwrap();
        assert!(read_header(&path).unwrap().is_none());
        assert!(!is_complete(&mut std::fs::File::open(&path).unwrap(), 40));
    }

    #[test]
    fn truncated_file_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1_trunc.shp");
        let mut bytes = encode_header(300, CONUS).to_vec();
        bytes.extend_from_slice(&[0u8; 50]);
        std::fs::write(&path, &bytes).unwrap();
        assert!(!is_complete(&mut bytes.as_slice(), bytes.len() as u64));
    }

    #[test]
    fn complete_when_declared_length_matches() {
        let mut bytes = encode_header(120, CONUS).to_vec();
        bytes.extend_from_slice(&[0u8; 20]);
        assert!(is_complete(&mut bytes.as_slice(), 120));
        assert!(!is_complete(&mut bytes.as_slice(), 140));
    }

    #[test]
    fn center_and_geographic_check() {
        let (lat, lon) = CONUS.center_lat_lon();
        assert!((lat - 37.0).abs() < f64::EPSILON);
        assert!((lon + 95.5).abs() < f64::EPSILON);
        assert!(CONUS.is_geographic());

        let projected = Bounds {
            xmin: -2_000_000.0,
            ymin: -1_500_000.0,
            xmax: 2_500_000.0,
            ymax: 1_500_000.0,
        };
        assert!(!projected.is_geographic());
    }
}
