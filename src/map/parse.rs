//! Text grid → `TileMap`.
//!
//! ```text
//! # comment
//! [1,1,1,1],
//! [1,p,2,1],   // trailing comments are fine too
//! [1,1,1,1],
//! ```
//!
//! Cells may be separated by whitespace, commas or brackets, so a JS/JSON
//! style array literal pastes in unchanged.  Lines without cells are
//! skipped.

use std::{fs, io, path::Path};

use glam::{IVec2, ivec2};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::world::{TileKind, TileMap};

/// Map shipped with the crate.
pub const DEFAULT_MAP: &str = include_str!("../../maps/default.map");

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("map has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell code `{code}` at row {row}, column {col}")]
    UnknownCode { row: usize, col: usize, code: String },

    #[error("no spawn marker `p` in map")]
    NoSpawn,

    #[error("second spawn marker at {second}, first was at {first}")]
    DuplicateSpawn { first: IVec2, second: IVec2 },
}

/*=======================================================================*/
/*                              Public API                               */
/*=======================================================================*/

/// Read and parse a map file.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<TileMap, MapError> {
    let text = fs::read_to_string(path)?;
    parse_map(&text)
}

/// Parse the built-in [`DEFAULT_MAP`].
pub fn default_map() -> Result<TileMap, MapError> {
    parse_map(DEFAULT_MAP)
}

/// Parse a map description.  Nothing is returned unless every row is
/// valid, so a simulation never starts from a half-read grid.
pub fn parse_map(text: &str) -> Result<TileMap, MapError> {
    static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,\[\]]+").unwrap());

    let mut tiles = Vec::new();
    let mut width = None;
    let mut spawn: Option<IVec2> = None;
    let mut row = 0usize;

    for line in text.lines() {
        let line = strip_comment(line);
        let cells: Vec<&str> = SEPARATORS.split(line).filter(|t| !t.is_empty()).collect();
        if cells.is_empty() {
            continue;
        }

        let expected = *width.get_or_insert(cells.len());
        if cells.len() != expected {
            return Err(MapError::Ragged {
                row,
                expected,
                found: cells.len(),
            });
        }

        for (col, code) in cells.into_iter().enumerate() {
            let tile = match code {
                "0" => TileKind::Empty,
                "1" => TileKind::Wall,
                "2" => TileKind::Door,
                "p" | "P" => {
                    let here = ivec2(col as i32, row as i32);
                    if let Some(first) = spawn {
                        return Err(MapError::DuplicateSpawn {
                            first,
                            second: here,
                        });
                    }
                    spawn = Some(here);
                    TileKind::Empty
                }
                _ => {
                    return Err(MapError::UnknownCode {
                        row,
                        col,
                        code: code.to_owned(),
                    });
                }
            };
            tiles.push(tile);
        }
        row += 1;
    }

    let width = width.ok_or(MapError::Empty)?;
    let spawn = spawn.ok_or(MapError::NoSpawn)?;
    let map = TileMap::from_parts(width as i32, row as i32, tiles, spawn);

    log::info!(
        "map loaded: {}x{} cells, spawn {}, {} door(s)",
        map.width(),
        map.height(),
        spawn,
        map.cells_of(TileKind::Door).count()
    );
    Ok(map)
}

fn strip_comment(line: &str) -> &str {
    let cut = [line.find('#'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}

/*=======================================================================*/
/*                                Tests                                  */
/*=======================================================================*/
