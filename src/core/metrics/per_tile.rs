use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default)]
pub struct PosStat {
    pub sum: u64,
    pub count: u64,
}

/// Per-tile per-position quality accumulation. Only means are ever
/// finalized, so a (sum, count) pair per position is enough.
#[derive(Clone, Debug, Default)]
pub struct TileQual {
    tiles: HashMap<String, Vec<PosStat>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PerTileRow {
    pub tile: String,
    pub mean_by_pos: Vec<f64>,
}

impl TileQual {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tile: &str, qual: &[u8]) {
        let stats = self.tiles.entry(tile.to_string()).or_default();
        if stats.len() < qual.len() {
            stats.resize(qual.len(), PosStat::default());
        }
        for (i, &q) in qual.iter().enumerate() {
            stats[i].sum += q as u64;
            stats[i].count += 1;
        }
    }

    pub fn merge(&mut self, other: &TileQual) {
        for (tile, stats) in &other.tiles {
            let target = self.tiles.entry(tile.clone()).or_default();
            if target.len() < stats.len() {
                target.resize(stats.len(), PosStat::default());
            }
            for (i, s) in stats.iter().enumerate() {
                target[i].sum += s.sum;
                target[i].count += s.count;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Mean quality per position for every tile, tiles sorted by key.
    pub fn mean_grid(&self) -> Vec<PerTileRow> {
        let mut keys: Vec<&String> = self.tiles.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|tile| {
                let stats = &self.tiles[tile];
                let mean_by_pos = stats
                    .iter()
                    .map(|s| {
                        if s.count == 0 {
                            0.0
                        } else {
                            s.sum as f64 / s.count as f64
                        }
                    })
                    .collect();
                PerTileRow {
                    tile: tile.clone(),
                    mean_by_pos,
                }
            })
            .collect()
    }
}
