//! Directed "can attack" relation between regions
//!
//! Text format: one line per region. The first number on a line is the
//! region, every further number is a region it can attack. Any non-digit
//! character separates numbers, so `3: 1, 4, 5` and `3 1 4 5` read the same.

use crate::core::error::MapLoadError;
use crate::core::types::RegionId;

/// One parsed adjacency line, ids not yet range-checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyEntry {
    /// 1-based source line, for error reporting
    pub line: usize,
    pub region: u32,
    pub neighbors: Vec<u32>,
}

impl AdjacencyEntry {
    pub fn new(region: u32, neighbors: Vec<u32>) -> Self {
        Self {
            line: 0,
            region,
            neighbors,
        }
    }
}

/// Parse adjacency text; blank (digit-free) lines are skipped
pub fn parse_adjacency(text: &str) -> Result<Vec<AdjacencyEntry>, MapLoadError> {
    let mut entries = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let mut numbers = raw
            .split(|c: char| !c.is_ascii_digit())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<u32>().map_err(|e| MapLoadError::MalformedAdjacency {
                    line,
                    reason: format!("'{}': {}", token, e),
                })
            });

        let Some(region) = numbers.next().transpose()? else {
            continue;
        };
        let neighbors = numbers.collect::<Result<Vec<_>, _>>()?;

        entries.push(AdjacencyEntry {
            line,
            region,
            neighbors,
        });
    }

    Ok(entries)
}

/// Adjacency lists indexed by region id (slot 0 unused)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyTable {
    edges: Vec<Vec<RegionId>>,
}

impl AdjacencyTable {
    /// Build the table for regions `1..=countries`
    ///
    /// Neighbours are appended in the order given; duplicates and
    /// asymmetric edges are kept. Any id outside `1..=countries` rejects
    /// the whole table.
    pub fn build(entries: &[AdjacencyEntry], countries: u16) -> Result<Self, MapLoadError> {
        let check = |line: usize, id: u32| -> Result<RegionId, MapLoadError> {
            if id == 0 || id > countries as u32 {
                return Err(MapLoadError::RegionOutOfRange {
                    line,
                    id,
                    countries,
                });
            }
            Ok(RegionId(id as u16))
        };

        let mut edges = vec![Vec::new(); countries as usize + 1];
        for entry in entries {
            let region = check(entry.line, entry.region)?;
            for &neighbor in &entry.neighbors {
                let neighbor = check(entry.line, neighbor)?;
                edges[region.index()].push(neighbor);
            }
        }

        Ok(Self { edges })
    }

    /// Regions `region` can attack; empty for unknown ids
    pub fn neighbors_of(&self, region: RegionId) -> &[RegionId] {
        self.edges
            .get(region.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_any_separator() {
        let entries = parse_adjacency("1: 2, 3\n\n2 1\n3-1-2-2\n").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].region, 1);
        assert_eq!(entries[0].neighbors, vec![2, 3]);
        assert_eq!(entries[1].line, 3);
        assert_eq!(entries[2].neighbors, vec![1, 2, 2]);
    }

    #[test]
    fn test_parse_overflow_is_malformed() {
        let err = parse_adjacency("1 99999999999\n").unwrap_err();
        assert!(matches!(err, MapLoadError::MalformedAdjacency { line: 1, .. }));
    }

    #[test]
    fn test_build_keeps_order_and_duplicates() {
        let entries = vec![
            AdjacencyEntry::new(1, vec![3, 2]),
            AdjacencyEntry::new(1, vec![3]),
        ];
        let table = AdjacencyTable::build(&entries, 3).unwrap();
        assert_eq!(table.neighbors_of(RegionId(1)), &[RegionId(3), RegionId(2), RegionId(3)]);
        assert!(table.neighbors_of(RegionId(2)).is_empty());
        assert!(table.neighbors_of(RegionId(3)).is_empty());
        assert_eq!(table.edge_count(), 3);
    }

    #[test]
    fn test_build_rejects_out_of_range() {
        let err = AdjacencyTable::build(&[AdjacencyEntry::new(1, vec![4])], 3).unwrap_err();
        assert!(matches!(err, MapLoadError::RegionOutOfRange { id: 4, countries: 3, .. }));

        let err = AdjacencyTable::build(&[AdjacencyEntry::new(0, vec![1])], 3).unwrap_err();
        assert!(matches!(err, MapLoadError::RegionOutOfRange { id: 0, .. }));
    }

    #[test]
    fn test_entries_in_any_order() {
        let entries = vec![AdjacencyEntry::new(2, vec![1]), AdjacencyEntry::new(1, vec![2])];
        let table = AdjacencyTable::build(&entries, 2).unwrap();
        assert_eq!(table.neighbors_of(RegionId(1)), &[RegionId(2)]);
        assert_eq!(table.neighbors_of(RegionId(2)), &[RegionId(1)]);
        assert_eq!(table.edge_count(), 2);
    }
}
