use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::AxisSet,
        error::{ColrError, ColrResult},
        units::ot_round,
    },
    variation::scalar::VariableScalar,
};

/// Opaque (pre-optimize) or physical (post-optimize) delta-set address:
/// `outer << 16 | inner`.
pub type VarIdx = u32;

/// Marker for "this field does not vary".
pub const NO_VARIATION_INDEX: VarIdx = 0xFFFF_FFFF;

const MAX_ITEMS_PER_DATA: usize = 0xFFFF;

/// Split an address into `(outer, inner)`.
pub fn split_var_idx(idx: VarIdx) -> (usize, usize) {
    ((idx >> 16) as usize, (idx & 0xFFFF) as usize)
}

fn join_var_idx(outer: usize, inner: usize) -> VarIdx {
    ((outer as u32) << 16) | (inner as u32)
}

/// Tent on one axis, in normalized coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionAxis {
    /// Region start.
    pub start: f64,
    /// Peak, where the region contributes its full delta.
    pub peak: f64,
    /// Region end.
    pub end: f64,
}

impl RegionAxis {
    /// True when start, peak and end coincide: the axis does not shape the region.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.peak && self.peak == self.end
    }
}

/// One region of the design space: a tent per axis, in axis order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarRegion {
    /// Per-axis tents.
    pub axes: Vec<RegionAxis>,
}

impl VarRegion {
    /// Normalized location where the region peaks.
    pub fn peak(&self) -> Vec<f64> {
        self.axes.iter().map(|a| a.peak).collect()
    }

    /// How much of a delta on this region applies at normalized `loc`.
    pub fn scalar_at(&self, loc: &[f64]) -> f64 {
        let mut scalar = 1.0;
        for (tent, &v) in self.axes.iter().zip(loc) {
            let RegionAxis { start, peak, end } = *tent;
            // malformed or zero-peak tents do not restrict the region
            if start > peak || peak > end || (start < 0.0 && end > 0.0) || peak == 0.0 {
                continue;
            }
            if v == peak {
                continue;
            }
            if v <= start || end <= v {
                return 0.0;
            }
            scalar *= if v < peak {
                (v - start) / (peak - start)
            } else {
                (end - v) / (end - peak)
            };
        }
        scalar
    }
}

/// A block of delta rows sharing one region list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VarData {
    /// Indices into [`VarStore::regions`], one per row column.
    pub region_indices: Vec<u16>,
    /// Delta rows, one delta per region.
    pub items: Vec<Vec<i32>>,
}

/// A finished item variation store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VarStore {
    /// Number of axes every region spans.
    pub axis_count: usize,
    /// Region list.
    pub regions: Vec<VarRegion>,
    /// Delta blocks addressed by `outer`.
    pub data: Vec<VarData>,
}

impl VarStore {
    /// Resolve an address into its block and delta row.
    pub fn item(&self, idx: VarIdx) -> ColrResult<(&VarData, &[i32])> {
        let (outer, inner) = split_var_idx(idx);
        let data = self.data.get(outer).ok_or_else(|| {
            ColrError::lookup(format!("variation address {idx:#010x}: no VarData {outer}"))
        })?;
        let row = data.items.get(inner).ok_or_else(|| {
            ColrError::lookup(format!(
                "variation address {idx:#010x}: VarData {outer} has no item {inner}"
            ))
        })?;
        Ok((data, row))
    }

    /// Compact the store: drop zero deltas and unused regions, merge identical rows.
    ///
    /// Returns the old-to-new address map; rows without any delta map to
    /// [`NO_VARIATION_INDEX`].
    pub fn optimize(&mut self) -> BTreeMap<VarIdx, VarIdx> {
        let mut map = BTreeMap::new();
        // (old region list, deltas) per surviving item, in address order
        let mut items: Vec<(VarIdx, Vec<(u16, i32)>)> = Vec::new();
        for (outer, data) in self.data.iter().enumerate() {
            for (inner, row) in data.items.iter().enumerate() {
                let columns: Vec<(u16, i32)> = data
                    .region_indices
                    .iter()
                    .copied()
                    .zip(row.iter().copied())
                    .filter(|&(_, d)| d != 0)
                    .collect();
                let idx = join_var_idx(outer, inner);
                if columns.is_empty() {
                    map.insert(idx, NO_VARIATION_INDEX);
                } else {
                    items.push((idx, columns));
                }
            }
        }

        let mut used: Vec<u16> = items
            .iter()
            .flat_map(|(_, cols)| cols.iter().map(|&(r, _)| r))
            .collect();
        used.sort_unstable();
        used.dedup();
        let renumber: HashMap<u16, u16> = used
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new as u16))
            .collect();

        let mut groups: BTreeMap<Vec<u16>, Vec<(VarIdx, Vec<i32>)>> = BTreeMap::new();
        for (idx, mut cols) in items {
            for col in &mut cols {
                col.0 = renumber[&col.0];
            }
            cols.sort_by_key(|&(r, _)| r);
            let (regions, row): (Vec<u16>, Vec<i32>) = cols.into_iter().unzip();
            groups.entry(regions).or_default().push((idx, row));
        }

        let mut data: Vec<VarData> = Vec::new();
        for (region_indices, rows) in groups {
            let mut seen: HashMap<Vec<i32>, VarIdx> = HashMap::new();
            for (old, row) in rows {
                if let Some(&new) = seen.get(&row) {
                    map.insert(old, new);
                    continue;
                }
                let needs_block = data.last().is_none_or(|d| {
                    d.region_indices != region_indices || d.items.len() >= MAX_ITEMS_PER_DATA
                });
                if needs_block {
                    data.push(VarData {
                        region_indices: region_indices.clone(),
                        items: Vec::new(),
                    });
                }
                let outer = data.len() - 1;
                let block = &mut data[outer];
                let new = join_var_idx(outer, block.items.len());
                block.items.push(row.clone());
                seen.insert(row, new);
                map.insert(old, new);
            }
        }

        self.regions = used
            .iter()
            .map(|&old| self.regions[old as usize].clone())
            .collect();
        self.data = data;
        map
    }
}

/// Variation-store backend consumed by the variation pool.
pub trait VarStoreBackend {
    /// Accumulate the regions and deltas of `scalar`; return the rounded
    /// default (storage units) and an opaque address.
    fn submit(&mut self, scalar: &VariableScalar) -> ColrResult<(f64, VarIdx)>;

    /// Snapshot the accumulated store.
    fn finish(&mut self) -> VarStore;
}

/// In-memory backend that builds an item variation store incrementally.
#[derive(Debug)]
pub struct OnlineVarStoreBuilder {
    axes: AxisSet,
    regions: Vec<VarRegion>,
    data: Vec<VarData>,
    // region list -> index of the VarData currently accepting rows
    open_data: HashMap<Vec<u16>, usize>,
    row_cache: HashMap<(usize, Vec<i32>), usize>,
}

impl OnlineVarStoreBuilder {
    /// Backend over `axes`.
    pub fn new(axes: AxisSet) -> Self {
        Self {
            axes,
            regions: Vec::new(),
            data: Vec::new(),
            open_data: HashMap::new(),
            row_cache: HashMap::new(),
        }
    }

    fn region_index(&mut self, region: VarRegion) -> ColrResult<u16> {
        if let Some(i) = self.regions.iter().position(|r| *r == region) {
            return Ok(i as u16);
        }
        if self.regions.len() >= usize::from(u16::MAX) {
            return Err(ColrError::range("variation store region list is full"));
        }
        self.regions.push(region);
        Ok((self.regions.len() - 1) as u16)
    }

    fn store_row(&mut self, region_indices: Vec<u16>, row: Vec<i32>) -> VarIdx {
        let outer = match self.open_data.get(&region_indices) {
            Some(&outer) if self.data[outer].items.len() < MAX_ITEMS_PER_DATA => outer,
            _ => {
                self.data.push(VarData {
                    region_indices: region_indices.clone(),
                    items: Vec::new(),
                });
                let outer = self.data.len() - 1;
                self.open_data.insert(region_indices, outer);
                outer
            }
        };
        if let Some(&inner) = self.row_cache.get(&(outer, row.clone())) {
            return join_var_idx(outer, inner);
        }
        let inner = self.data[outer].items.len();
        self.data[outer].items.push(row.clone());
        self.row_cache.insert((outer, row), inner);
        join_var_idx(outer, inner)
    }
}

impl VarStoreBackend for OnlineVarStoreBuilder {
    fn submit(&mut self, scalar: &VariableScalar) -> ColrResult<(f64, VarIdx)> {
        let default_location = self.axes.default_location();
        let mut masters: Vec<Master> = Vec::with_capacity(scalar.values().len());
        masters.push(Master {
            loc: vec![0.0; self.axes.len()],
            value: scalar.default_value(),
        });
        for (location, value) in scalar.values() {
            if *location == default_location {
                continue;
            }
            let loc: Vec<f64> = self
                .axes
                .iter()
                .zip(location.coords())
                .map(|(axis, (_, v))| axis.normalize(*v))
                .collect();
            // user locations can collapse onto the same normalized point
            match masters.iter_mut().find(|m| m.loc == loc) {
                Some(m) => m.value = *value,
                None => masters.push(Master { loc, value: *value }),
            }
        }
        masters[1..].sort_by(master_order);

        let supports = compute_supports(&masters);
        let deltas = compute_deltas(&masters, &supports);
        // defaults and deltas both land in 32-bit slots, whatever the unit
        stored_i32(deltas[0], "value")?;
        let row = deltas[1..]
            .iter()
            .map(|&d| stored_i32(d, "delta"))
            .collect::<ColrResult<Vec<_>>>()?;

        let mut region_indices = Vec::with_capacity(masters.len() - 1);
        for support in &supports[1..] {
            let region = VarRegion {
                axes: support
                    .iter()
                    .map(|tent| match *tent {
                        Some((start, peak, end)) => RegionAxis { start, peak, end },
                        None => RegionAxis::default(),
                    })
                    .collect(),
            };
            region_indices.push(self.region_index(region)?);
        }
        let idx = self.store_row(region_indices, row);
        Ok((deltas[0], idx))
    }

    fn finish(&mut self) -> VarStore {
        VarStore {
            axis_count: self.axes.len(),
            regions: self.regions.clone(),
            data: self.data.clone(),
        }
    }
}

struct Master {
    loc: Vec<f64>,
    value: f64,
}

type Tent = Option<(f64, f64, f64)>;

// Fewer participating axes first, then by axis order, direction and distance.
fn master_order(a: &Master, b: &Master) -> std::cmp::Ordering {
    let key = |m: &Master| -> Vec<(usize, f64, f64)> {
        m.loc
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, v.signum(), v.abs()))
            .collect()
    };
    let (ka, kb) = (key(a), key(b));
    ka.len().cmp(&kb.len()).then_with(|| {
        for (x, y) in ka.iter().zip(&kb) {
            let ord = x
                .0
                .cmp(&y.0)
                .then(x.1.total_cmp(&y.1))
                .then(x.2.total_cmp(&y.2));
            if ord.is_ne() {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    })
}

fn compute_supports(masters: &[Master]) -> Vec<Vec<Tent>> {
    let axis_count = masters.first().map_or(0, |m| m.loc.len());
    let mut min_v = vec![0.0f64; axis_count];
    let mut max_v = vec![0.0f64; axis_count];
    for m in masters {
        for (i, &v) in m.loc.iter().enumerate() {
            min_v[i] = min_v[i].min(v);
            max_v[i] = max_v[i].max(v);
        }
    }

    let mut supports: Vec<Vec<Tent>> = Vec::with_capacity(masters.len());
    for (i, master) in masters.iter().enumerate() {
        let mut region: Vec<Tent> = master
            .loc
            .iter()
            .enumerate()
            .map(|(axis, &v)| {
                if v > 0.0 {
                    Some((0.0, v, max_v[axis]))
                } else if v < 0.0 {
                    Some((min_v[axis], v, 0.0))
                } else {
                    None
                }
            })
            .collect();

        for prev in &masters[..i] {
            // only masters on exactly the same axes, inside the current box, split it
            let same_axes = prev
                .loc
                .iter()
                .zip(&region)
                .all(|(&v, tent)| (v != 0.0) == tent.is_some());
            if !same_axes {
                continue;
            }
            let inside = prev.loc.iter().zip(&region).all(|(&v, tent)| match *tent {
                Some((lower, peak, upper)) => v == peak || (lower < v && v < upper),
                None => true,
            });
            if !inside {
                continue;
            }

            let mut best_ratio = -1.0;
            let mut best: Vec<(usize, (f64, f64, f64))> = Vec::new();
            for (axis, &val) in prev.loc.iter().enumerate() {
                let Some((lower, peak, upper)) = region[axis] else {
                    continue;
                };
                let (triple, ratio) = if val < peak {
                    ((val, peak, upper), (val - peak) / (lower - peak))
                } else if peak < val {
                    ((lower, peak, val), (val - peak) / (upper - peak))
                } else {
                    continue;
                };
                if ratio > best_ratio {
                    best.clear();
                    best_ratio = ratio;
                }
                if ratio == best_ratio {
                    best.push((axis, triple));
                }
            }
            for (axis, triple) in best {
                region[axis] = Some(triple);
            }
        }
        supports.push(region);
    }
    supports
}

fn support_scalar(loc: &[f64], support: &[Tent]) -> f64 {
    let mut scalar = 1.0;
    for (&v, tent) in loc.iter().zip(support) {
        let Some((lower, peak, upper)) = *tent else {
            continue;
        };
        if peak == 0.0 || v == peak {
            continue;
        }
        if v <= lower || upper <= v {
            return 0.0;
        }
        scalar *= if v < peak {
            (v - lower) / (peak - lower)
        } else {
            (v - upper) / (peak - upper)
        };
    }
    scalar
}

fn stored_i32(v: f64, what: &str) -> ColrResult<i32> {
    if v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Ok(v as i32)
    } else {
        Err(ColrError::range(format!(
            "{what} {v} does not fit 32-bit variation storage"
        )))
    }
}

fn compute_deltas(masters: &[Master], supports: &[Vec<Tent>]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(masters.len());
    for master in masters {
        let mut delta = master.value;
        for (j, prev_delta) in out.iter().enumerate() {
            let s = support_scalar(&master.loc, &supports[j]);
            if s != 0.0 {
                delta -= s * prev_delta;
            }
        }
        out.push(ot_round(delta));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/variation/store.rs"]
mod tests;
