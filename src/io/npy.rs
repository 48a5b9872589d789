//! Minimal reader and writer for NumPy `.npy` float arrays
//!
//! Layout:
//! - 6 byte magic `\x93NUMPY`
//! - 1 byte major version, 1 byte minor version
//! - header length: u16 (version 1) or u32 (versions 2 and 3), little endian
//! - header: Python dict literal with `descr`, `fortran_order` and `shape`,
//!   space padded and newline terminated so the data starts on a 64 byte boundary
//! - raw array data

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TrackError};

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

/// A decoded array, always in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl NpyArray {
    /// Row count and row width of a 2-D array
    pub fn dims_2d(&self) -> Option<(usize, usize)> {
        match self.shape[..] {
            [rows, columns] => Some((rows, columns)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dtype {
    F4 { big_endian: bool },
    F8 { big_endian: bool },
}

impl Dtype {
    fn parse(descr: &str) -> Result<Self> {
        let (order, kind) = descr
            .split_at_checked(1)
            .ok_or_else(|| invalid(format!("unknown byte order in dtype {descr:?}")))?;
        let big_endian = match order {
            "<" | "|" | "=" => false,
            ">" => true,
            _ => return Err(invalid(format!("unknown byte order in dtype {descr:?}"))),
        };
        match kind {
            "f4" => Ok(Dtype::F4 { big_endian }),
            "f8" => Ok(Dtype::F8 { big_endian }),
            _ => Err(invalid(format!("unsupported dtype {descr:?}"))),
        }
    }

    fn size(self) -> usize {
        match self {
            Dtype::F4 { .. } => 4,
            Dtype::F8 { .. } => 8,
        }
    }

    fn decode(self, bytes: &[u8]) -> f64 {
        match self {
            Dtype::F4 { big_endian } => {
                let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
                let value = if big_endian {
                    f32::from_be_bytes(raw)
                } else {
                    f32::from_le_bytes(raw)
                };
                f64::from(value)
            }
            Dtype::F8 { big_endian } => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                if big_endian {
                    f64::from_be_bytes(raw)
                } else {
                    f64::from_le_bytes(raw)
                }
            }
        }
    }
}

/// Read an `.npy` file from disk
pub fn read_npy(path: &Path) -> Result<NpyArray> {
    let bytes = std::fs::read(path).map_err(|source| TrackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_npy(&bytes)
}

/// Decode an in-memory `.npy` buffer
pub fn parse_npy(bytes: &[u8]) -> Result<NpyArray> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(invalid("missing NUMPY magic".to_string()));
    }

    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(invalid("truncated header length".to_string()));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            (len as usize, 12)
        }
        _ => return Err(invalid(format!("unsupported format version {major}"))),
    };

    let data_start = header_start + header_len;
    let header = bytes
        .get(header_start..data_start)
        .ok_or_else(|| invalid("truncated header".to_string()))?;
    let header = std::str::from_utf8(header).map_err(|e| invalid(e.to_string()))?;

    let dtype = Dtype::parse(&header_string(header, "descr")?)?;
    let fortran_order = header_bool(header, "fortran_order")?;
    let shape = header_shape(header)?;

    let too_large = || invalid(format!("shape {shape:?} is too large"));
    let count = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(too_large)?;
    let byte_len = count.checked_mul(dtype.size()).ok_or_else(too_large)?;
    let payload = &bytes[data_start..];
    if payload.len() < byte_len {
        return Err(invalid(format!(
            "expected {} values, file holds {}",
            count,
            payload.len() / dtype.size()
        )));
    }

    let mut data: Vec<f64> = payload
        .chunks_exact(dtype.size())
        .take(count)
        .map(|chunk| dtype.decode(chunk))
        .collect();

    if fortran_order && let [rows, columns] = shape[..] {
        data = (0..rows * columns)
            .map(|i| data[(i % columns) * rows + i / columns])
            .collect();
    }

    Ok(NpyArray { shape, data })
}

/// Write a 2-D little-endian `f8` array
///
/// # Arguments
/// * `path` - Output file path
/// * `values` - Row-major values
/// * `columns` - Row width; `values.len()` must be a multiple of it
pub fn write_npy(path: &Path, values: &[f64], columns: usize) -> Result<()> {
    if columns == 0 || values.len() % columns != 0 {
        return Err(TrackError::InvalidWaypointFormat { found: columns });
    }
    let rows = values.len() / columns;

    let io_err = |source: std::io::Error| TrackError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let mut header =
        format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({rows}, {columns}), }}");
    // Pad so magic + version + length + header is a multiple of 64, newline last
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    header.extend(std::iter::repeat_n(' ', padding));
    header.push('\n');

    writer.write_all(MAGIC).map_err(io_err)?;
    writer.write_all(&[1, 0]).map_err(io_err)?;
    writer
        .write_all(&(header.len() as u16).to_le_bytes())
        .map_err(io_err)?;
    writer.write_all(header.as_bytes()).map_err(io_err)?;

    for value in values {
        writer.write_all(&value.to_le_bytes()).map_err(io_err)?;
    }

    writer.flush().map_err(io_err)?;

    Ok(())
}

fn invalid(message: String) -> TrackError {
    TrackError::InvalidNpy(message)
}

/// Text following `'key':` in the header dict
fn header_value<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let pattern = format!("'{key}':");
    let start = header
        .find(&pattern)
        .ok_or_else(|| invalid(format!("header has no {key:?} entry")))?;
    Ok(header[start + pattern.len()..].trim_start())
}

fn header_string(header: &str, key: &str) -> Result<String> {
    let value = header_value(header, key)?;
    let quote = value
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| invalid(format!("{key:?} is not a string")))?;
    let rest = &value[1..];
    let end = rest
        .find(quote)
        .ok_or_else(|| invalid(format!("unterminated {key:?} string")))?;
    Ok(rest[..end].to_string())
}

fn header_bool(header: &str, key: &str) -> Result<bool> {
    let value = header_value(header, key)?;
    if value.starts_with("True") {
        Ok(true)
    } else if value.starts_with("False") {
        Ok(false)
    } else {
        Err(invalid(format!("{key:?} is not a boolean")))
    }
}

fn header_shape(header: &str) -> Result<Vec<usize>> {
    let value = header_value(header, "shape")?;
    let inner = value
        .strip_prefix('(')
        .and_then(|v| v.split_once(')'))
        .map(|(inner, _)| inner)
        .ok_or_else(|| invalid("shape is not a tuple".to_string()))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|e| invalid(format!("bad shape dimension {dim:?}: {e}")))
        })
        .collect()
}
